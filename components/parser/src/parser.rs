//! Recursive-descent JavaScript parser.
//!
//! Covers the statement and expression subset the runtime core
//! exercises: declarations, functions, control flow (`if`, `while`,
//! `do`/`while`, `for`, `for-in`, `try`/`catch`/`finally`), object and
//! array literals, member/index access, calls, `new`, the operator set,
//! `delete` and `typeof`. Classes, modules, destructuring, template
//! literals, generators and async functions are not part of the subset.

use crate::ast::{
    AssignmentOp, BinaryOp, CatchClause, DeclarationKind, Declarator, Expression, LogicalOp,
    ObjectProperty, Program, Statement, UnaryOp, UpdateOp,
};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use core_types::SourcePosition;

/// Result alias for parser operations.
type ParseResult<T> = Result<T, ParseError>;

/// A recursive-descent parser over a token stream.
///
/// # Examples
///
/// ```
/// use parser::Parser;
///
/// let program = Parser::new("let x = 1 + 2;").parse_program().unwrap();
/// assert_eq!(program.statements.len(), 1);
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    previous_line: usize,
}

impl Parser {
    /// Creates a parser for the given source text.
    pub fn new(source: &str) -> Self {
        let mut tokens = Lexer::new(source).tokenize();
        let end_position = tokens
            .last()
            .map(|token| token.position)
            .unwrap_or(SourcePosition::new(1, 1));
        tokens.push(Token::new(TokenType::Eof, "", end_position));
        Parser {
            tokens,
            position: 0,
            previous_line: 1,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_type(&self, offset: usize) -> TokenType {
        self.tokens
            .get(self.position + offset)
            .map(|token| token.token_type)
            .unwrap_or(TokenType::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        self.previous_line = token.position.line;
        token
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current().token_type == token_type
    }

    fn matches(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType) -> ParseResult<Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&format!("expected {:?}", token_type)))
        }
    }

    fn unexpected_token(&self, context: &str) -> ParseError {
        let token = self.current();
        let what = if token.token_type == TokenType::Eof {
            "end of input".to_string()
        } else {
            format!("token '{}'", token.value)
        };
        ParseError::new(
            format!("Unexpected {} ({})", what, context),
            token.position,
        )
    }

    /// Semicolons may be omitted before `}`, at end of input, or at a
    /// line break.
    fn consume_statement_terminator(&mut self) -> ParseResult<()> {
        if self.matches(TokenType::Semicolon) {
            return Ok(());
        }
        if self.check(TokenType::CurlyClose) || self.check(TokenType::Eof) {
            return Ok(());
        }
        if self.current().position.line > self.previous_line {
            return Ok(());
        }
        Err(self.unexpected_token("expected ';'"))
    }

    /// Parses a complete program.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        let mut strict = false;
        let mut in_prologue = true;
        while !self.check(TokenType::Eof) {
            let statement = self.parse_statement()?;
            if in_prologue {
                match &statement {
                    Statement::ExpressionStatement(Expression::StringLiteral(directive)) => {
                        if directive == "use strict" {
                            strict = true;
                        }
                    }
                    _ => in_prologue = false,
                }
            }
            statements.push(statement);
        }
        Ok(Program { statements, strict })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().token_type {
            TokenType::Let | TokenType::Const | TokenType::Var => {
                let statement = self.parse_variable_declaration(true)?;
                self.consume_statement_terminator()?;
                Ok(statement)
            }
            TokenType::Function => self.parse_function_declaration(),
            TokenType::CurlyOpen => {
                // `{ "key": ... }` at statement level is far more likely an
                // object literal typed at the REPL than a block with a
                // (unsupported) label; reparse it as an expression.
                if self.looks_like_object_literal() {
                    let expression = self.parse_expression(true)?;
                    self.consume_statement_terminator()?;
                    Ok(Statement::ExpressionStatement(expression))
                } else {
                    Ok(Statement::Block(self.parse_block()?))
                }
            }
            TokenType::If => self.parse_if_statement(),
            TokenType::While => self.parse_while_statement(),
            TokenType::Do => self.parse_do_while_statement(),
            TokenType::For => self.parse_for_statement(),
            TokenType::Return => {
                self.advance();
                let argument = if self.check(TokenType::Semicolon)
                    || self.check(TokenType::CurlyClose)
                    || self.check(TokenType::Eof)
                    || self.current().position.line > self.previous_line
                {
                    None
                } else {
                    Some(self.parse_expression(true)?)
                };
                self.consume_statement_terminator()?;
                Ok(Statement::Return(argument))
            }
            TokenType::Throw => {
                self.advance();
                let argument = self.parse_expression(true)?;
                self.consume_statement_terminator()?;
                Ok(Statement::Throw(argument))
            }
            TokenType::Try => self.parse_try_statement(),
            TokenType::Break => {
                self.advance();
                self.consume_statement_terminator()?;
                Ok(Statement::Break)
            }
            TokenType::Continue => {
                self.advance();
                self.consume_statement_terminator()?;
                Ok(Statement::Continue)
            }
            TokenType::Semicolon => {
                self.advance();
                Ok(Statement::Empty)
            }
            _ => {
                let expression = self.parse_expression(true)?;
                self.consume_statement_terminator()?;
                Ok(Statement::ExpressionStatement(expression))
            }
        }
    }

    fn looks_like_object_literal(&self) -> bool {
        debug_assert!(self.check(TokenType::CurlyOpen));
        matches!(
            self.peek_type(1),
            TokenType::StringLiteral | TokenType::NumericLiteral
        ) && self.peek_type(2) == TokenType::Colon
            || self.peek_type(1).is_identifier_name() && self.peek_type(2) == TokenType::Colon
    }

    fn parse_variable_declaration(&mut self, in_allowed: bool) -> ParseResult<Statement> {
        let kind = match self.advance().token_type {
            TokenType::Let => DeclarationKind::Let,
            TokenType::Const => DeclarationKind::Const,
            TokenType::Var => DeclarationKind::Var,
            _ => unreachable!(),
        };
        let mut declarations = Vec::new();
        loop {
            let name = self.expect(TokenType::Identifier)?.value;
            let init = if self.matches(TokenType::Equals) {
                Some(self.parse_assignment_expression(in_allowed)?)
            } else {
                None
            };
            declarations.push(Declarator { name, init });
            if !self.matches(TokenType::Comma) {
                break;
            }
        }
        Ok(Statement::VariableDeclaration { kind, declarations })
    }

    fn parse_function_declaration(&mut self) -> ParseResult<Statement> {
        self.expect(TokenType::Function)?;
        let name = self.expect(TokenType::Identifier)?.value;
        let parameters = self.parse_parameter_list()?;
        let body = self.parse_block()?;
        Ok(Statement::FunctionDeclaration {
            name,
            parameters,
            body,
        })
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<String>> {
        self.expect(TokenType::ParenOpen)?;
        let mut parameters = Vec::new();
        if !self.check(TokenType::ParenClose) {
            loop {
                parameters.push(self.expect(TokenType::Identifier)?.value);
                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenType::ParenClose)?;
        Ok(parameters)
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect(TokenType::CurlyOpen)?;
        let mut statements = Vec::new();
        while !self.check(TokenType::CurlyClose) && !self.check(TokenType::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenType::CurlyClose)?;
        Ok(statements)
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenType::If)?;
        self.expect(TokenType::ParenOpen)?;
        let test = self.parse_expression(true)?;
        self.expect(TokenType::ParenClose)?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.matches(TokenType::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenType::While)?;
        self.expect(TokenType::ParenOpen)?;
        let test = self.parse_expression(true)?;
        self.expect(TokenType::ParenClose)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { test, body })
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenType::Do)?;
        let body = Box::new(self.parse_statement()?);
        self.expect(TokenType::While)?;
        self.expect(TokenType::ParenOpen)?;
        let test = self.parse_expression(true)?;
        self.expect(TokenType::ParenClose)?;
        self.consume_statement_terminator()?;
        Ok(Statement::DoWhile { body, test })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenType::For)?;
        self.expect(TokenType::ParenOpen)?;

        // Distinguish `for (x in o)` / `for (let x in o)` from the
        // classic three-clause form.
        match self.current().token_type {
            TokenType::Let | TokenType::Const | TokenType::Var => {
                let declaration = self.parse_variable_declaration(false)?;
                let Statement::VariableDeclaration { kind, declarations } = &declaration else {
                    unreachable!()
                };
                if self.check(TokenType::In) {
                    if declarations.len() != 1 || declarations[0].init.is_some() {
                        return Err(self.unexpected_token("invalid for-in binding"));
                    }
                    let kind = *kind;
                    let binding = declarations[0].name.clone();
                    self.advance();
                    let object = self.parse_expression(true)?;
                    self.expect(TokenType::ParenClose)?;
                    let body = Box::new(self.parse_statement()?);
                    return Ok(Statement::ForIn {
                        declaration_kind: Some(kind),
                        binding,
                        object,
                        body,
                    });
                }
                self.expect(TokenType::Semicolon)?;
                self.parse_for_rest(Some(Box::new(declaration)))
            }
            TokenType::Semicolon => {
                self.advance();
                self.parse_for_rest(None)
            }
            _ => {
                let init = self.parse_expression(false)?;
                if self.check(TokenType::In) {
                    let Expression::Identifier { name, .. } = init else {
                        return Err(self.unexpected_token("invalid for-in binding"));
                    };
                    self.advance();
                    let object = self.parse_expression(true)?;
                    self.expect(TokenType::ParenClose)?;
                    let body = Box::new(self.parse_statement()?);
                    return Ok(Statement::ForIn {
                        declaration_kind: None,
                        binding: name,
                        object,
                        body,
                    });
                }
                self.expect(TokenType::Semicolon)?;
                self.parse_for_rest(Some(Box::new(Statement::ExpressionStatement(init))))
            }
        }
    }

    fn parse_for_rest(&mut self, init: Option<Box<Statement>>) -> ParseResult<Statement> {
        let test = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expression(true)?)
        };
        self.expect(TokenType::Semicolon)?;
        let update = if self.check(TokenType::ParenClose) {
            None
        } else {
            Some(self.parse_expression(true)?)
        };
        self.expect(TokenType::ParenClose)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For {
            init,
            test,
            update,
            body,
        })
    }

    fn parse_try_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenType::Try)?;
        let block = self.parse_block()?;
        let handler = if self.matches(TokenType::Catch) {
            let parameter = if self.matches(TokenType::ParenOpen) {
                let name = self.expect(TokenType::Identifier)?.value;
                self.expect(TokenType::ParenClose)?;
                Some(name)
            } else {
                None
            };
            Some(CatchClause {
                parameter,
                body: self.parse_block()?,
            })
        } else {
            None
        };
        let finalizer = if self.matches(TokenType::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected_token("expected 'catch' or 'finally'"));
        }
        Ok(Statement::Try {
            block,
            handler,
            finalizer,
        })
    }

    fn parse_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        self.parse_assignment_expression(in_allowed)
    }

    fn parse_assignment_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        let lhs = self.parse_conditional_expression(in_allowed)?;
        let op = match self.current().token_type {
            TokenType::Equals => AssignmentOp::Assign,
            TokenType::PlusEquals => AssignmentOp::AdditionAssign,
            TokenType::MinusEquals => AssignmentOp::SubtractionAssign,
            TokenType::AsteriskEquals => AssignmentOp::MultiplicationAssign,
            TokenType::SlashEquals => AssignmentOp::DivisionAssign,
            TokenType::PercentEquals => AssignmentOp::ModuloAssign,
            _ => return Ok(lhs),
        };
        if !matches!(
            lhs,
            Expression::Identifier { .. } | Expression::Member { .. } | Expression::Index { .. }
        ) {
            return Err(self.unexpected_token("invalid assignment target"));
        }
        self.advance();
        let value = self.parse_assignment_expression(in_allowed)?;
        Ok(Expression::Assignment {
            op,
            target: Box::new(lhs),
            value: Box::new(value),
        })
    }

    fn parse_conditional_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        let test = self.parse_binary_expression(0, in_allowed)?;
        if !self.matches(TokenType::QuestionMark) {
            return Ok(test);
        }
        let consequent = self.parse_assignment_expression(true)?;
        self.expect(TokenType::Colon)?;
        let alternate = self.parse_assignment_expression(in_allowed)?;
        Ok(Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn binary_precedence(&self, token_type: TokenType, in_allowed: bool) -> Option<u8> {
        let precedence = match token_type {
            TokenType::DoublePipe => 1,
            TokenType::DoubleAmpersand => 2,
            TokenType::Pipe => 3,
            TokenType::Caret => 4,
            TokenType::Ampersand => 5,
            TokenType::EqualsEquals
            | TokenType::ExclamationMarkEquals
            | TokenType::EqualsEqualsEquals
            | TokenType::ExclamationMarkEqualsEquals => 6,
            TokenType::LessThan
            | TokenType::LessThanEquals
            | TokenType::GreaterThan
            | TokenType::GreaterThanEquals
            | TokenType::Instanceof => 7,
            TokenType::In => {
                if !in_allowed {
                    return None;
                }
                7
            }
            TokenType::ShiftLeft | TokenType::ShiftRight | TokenType::UnsignedShiftRight => 8,
            TokenType::Plus | TokenType::Minus => 9,
            TokenType::Asterisk | TokenType::Slash | TokenType::Percent => 10,
            TokenType::DoubleAsterisk => 11,
            _ => return None,
        };
        Some(precedence)
    }

    fn parse_binary_expression(
        &mut self,
        min_precedence: u8,
        in_allowed: bool,
    ) -> ParseResult<Expression> {
        let mut lhs = self.parse_unary_expression(in_allowed)?;
        while let Some(precedence) = self.binary_precedence(self.current().token_type, in_allowed)
        {
            if precedence < min_precedence {
                break;
            }
            let token_type = self.advance().token_type;
            // `**` is right-associative; everything else is left.
            let next_min = if token_type == TokenType::DoubleAsterisk {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.parse_binary_expression(next_min, in_allowed)?;
            lhs = match token_type {
                TokenType::DoublePipe => Expression::Logical {
                    op: LogicalOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                TokenType::DoubleAmpersand => Expression::Logical {
                    op: LogicalOp::And,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                other => Expression::Binary {
                    op: Self::binary_op_for(other),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }
        Ok(lhs)
    }

    fn binary_op_for(token_type: TokenType) -> BinaryOp {
        match token_type {
            TokenType::Plus => BinaryOp::Addition,
            TokenType::Minus => BinaryOp::Subtraction,
            TokenType::Asterisk => BinaryOp::Multiplication,
            TokenType::Slash => BinaryOp::Division,
            TokenType::Percent => BinaryOp::Modulo,
            TokenType::DoubleAsterisk => BinaryOp::Exponentiation,
            TokenType::EqualsEquals => BinaryOp::LooseEquals,
            TokenType::ExclamationMarkEquals => BinaryOp::LooseNotEquals,
            TokenType::EqualsEqualsEquals => BinaryOp::StrictEquals,
            TokenType::ExclamationMarkEqualsEquals => BinaryOp::StrictNotEquals,
            TokenType::LessThan => BinaryOp::LessThan,
            TokenType::LessThanEquals => BinaryOp::LessThanEquals,
            TokenType::GreaterThan => BinaryOp::GreaterThan,
            TokenType::GreaterThanEquals => BinaryOp::GreaterThanEquals,
            TokenType::Ampersand => BinaryOp::BitwiseAnd,
            TokenType::Pipe => BinaryOp::BitwiseOr,
            TokenType::Caret => BinaryOp::BitwiseXor,
            TokenType::ShiftLeft => BinaryOp::LeftShift,
            TokenType::ShiftRight => BinaryOp::RightShift,
            TokenType::UnsignedShiftRight => BinaryOp::UnsignedRightShift,
            TokenType::In => BinaryOp::In,
            TokenType::Instanceof => BinaryOp::InstanceOf,
            _ => unreachable!("not a binary operator: {:?}", token_type),
        }
    }

    fn parse_unary_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        let op = match self.current().token_type {
            TokenType::Minus => Some(UnaryOp::Minus),
            TokenType::Plus => Some(UnaryOp::Plus),
            TokenType::ExclamationMark => Some(UnaryOp::Not),
            TokenType::Tilde => Some(UnaryOp::BitwiseNot),
            TokenType::Typeof => Some(UnaryOp::Typeof),
            TokenType::Void => Some(UnaryOp::Void),
            TokenType::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary_expression(in_allowed)?;
            return Ok(Expression::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        if self.check(TokenType::PlusPlus) || self.check(TokenType::MinusMinus) {
            let op = if self.advance().token_type == TokenType::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            let target = self.parse_unary_expression(in_allowed)?;
            return Ok(Expression::Update {
                op,
                prefix: true,
                target: Box::new(target),
            });
        }
        self.parse_postfix_expression(in_allowed)
    }

    fn parse_postfix_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        let expression = self.parse_call_expression(in_allowed)?;
        if self.check(TokenType::PlusPlus) || self.check(TokenType::MinusMinus) {
            let op = if self.advance().token_type == TokenType::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            return Ok(Expression::Update {
                op,
                prefix: false,
                target: Box::new(expression),
            });
        }
        Ok(expression)
    }

    fn parse_call_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        let mut expression = if self.check(TokenType::New) {
            self.parse_new_expression(in_allowed)?
        } else {
            self.parse_primary_expression(in_allowed)?
        };
        loop {
            match self.current().token_type {
                TokenType::Period => {
                    self.advance();
                    if !self.current().token_type.is_identifier_name() {
                        return Err(self.unexpected_token("expected property name after '.'"));
                    }
                    let property = self.advance().value;
                    expression = Expression::Member {
                        object: Box::new(expression),
                        property,
                    };
                }
                TokenType::BracketOpen => {
                    self.advance();
                    let index = self.parse_expression(true)?;
                    self.expect(TokenType::BracketClose)?;
                    expression = Expression::Index {
                        object: Box::new(expression),
                        index: Box::new(index),
                    };
                }
                TokenType::ParenOpen => {
                    let position = self.current().position;
                    let arguments = self.parse_arguments()?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        arguments,
                        position,
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }

    fn parse_new_expression(&mut self, in_allowed: bool) -> ParseResult<Expression> {
        self.expect(TokenType::New)?;
        let mut callee = if self.check(TokenType::New) {
            self.parse_new_expression(in_allowed)?
        } else {
            self.parse_primary_expression(in_allowed)?
        };
        loop {
            match self.current().token_type {
                TokenType::Period => {
                    self.advance();
                    if !self.current().token_type.is_identifier_name() {
                        return Err(self.unexpected_token("expected property name after '.'"));
                    }
                    let property = self.advance().value;
                    callee = Expression::Member {
                        object: Box::new(callee),
                        property,
                    };
                }
                TokenType::BracketOpen => {
                    self.advance();
                    let index = self.parse_expression(true)?;
                    self.expect(TokenType::BracketClose)?;
                    callee = Expression::Index {
                        object: Box::new(callee),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        let arguments = if self.check(TokenType::ParenOpen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expression::New {
            callee: Box::new(callee),
            arguments,
        })
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        self.expect(TokenType::ParenOpen)?;
        let mut arguments = Vec::new();
        if !self.check(TokenType::ParenClose) {
            loop {
                arguments.push(self.parse_assignment_expression(true)?);
                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenType::ParenClose)?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self, _in_allowed: bool) -> ParseResult<Expression> {
        match self.current().token_type {
            TokenType::NumericLiteral => {
                let token = self.advance();
                Ok(Expression::NumericLiteral(token.double_value()))
            }
            TokenType::BigIntLiteral => {
                let token = self.advance();
                Ok(Expression::BigIntLiteral(token.value))
            }
            TokenType::StringLiteral => {
                let token = self.advance();
                Ok(Expression::StringLiteral(token.value))
            }
            TokenType::UnterminatedStringLiteral => {
                Err(self.unexpected_token("unterminated string literal"))
            }
            TokenType::BoolLiteral => {
                let token = self.advance();
                Ok(Expression::BooleanLiteral(token.value == "true"))
            }
            TokenType::NullLiteral => {
                self.advance();
                Ok(Expression::NullLiteral)
            }
            TokenType::Identifier => {
                let token = self.advance();
                Ok(Expression::Identifier {
                    name: token.value,
                    position: token.position,
                })
            }
            TokenType::This => {
                self.advance();
                Ok(Expression::This)
            }
            TokenType::ParenOpen => {
                self.advance();
                let expression = self.parse_expression(true)?;
                self.expect(TokenType::ParenClose)?;
                Ok(expression)
            }
            TokenType::CurlyOpen => self.parse_object_expression(),
            TokenType::BracketOpen => self.parse_array_expression(),
            TokenType::Function => {
                self.advance();
                let name = if self.check(TokenType::Identifier) {
                    Some(self.advance().value)
                } else {
                    None
                };
                let parameters = self.parse_parameter_list()?;
                let body = self.parse_block()?;
                Ok(Expression::FunctionExpression {
                    name,
                    parameters,
                    body,
                })
            }
            _ => Err(self.unexpected_token("expected expression")),
        }
    }

    fn parse_object_expression(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::CurlyOpen)?;
        let mut properties = Vec::new();
        while !self.check(TokenType::CurlyClose) {
            let key = match self.current().token_type {
                TokenType::StringLiteral => self.advance().value,
                TokenType::NumericLiteral => {
                    let token = self.advance();
                    core_types::number_to_js_string(token.double_value())
                }
                token_type if token_type.is_identifier_name() => self.advance().value,
                _ => return Err(self.unexpected_token("expected property key")),
            };
            let value = if self.matches(TokenType::Colon) {
                self.parse_assignment_expression(true)?
            } else {
                // Shorthand `{ name }`.
                Expression::Identifier {
                    name: key.clone(),
                    position: self.current().position,
                }
            };
            properties.push(ObjectProperty { key, value });
            if !self.matches(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::CurlyClose)?;
        Ok(Expression::ObjectExpression(properties))
    }

    fn parse_array_expression(&mut self) -> ParseResult<Expression> {
        self.expect(TokenType::BracketOpen)?;
        let mut elements = Vec::new();
        while !self.check(TokenType::BracketClose) {
            if self.matches(TokenType::Comma) {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_assignment_expression(true)?));
            if !self.matches(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::BracketClose)?;
        Ok(Expression::ArrayExpression(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse_program().unwrap()
    }

    #[test]
    fn test_variable_declaration() {
        let program = parse("let x = 1, y;");
        let Statement::VariableDeclaration { kind, declarations } = &program.statements[0] else {
            panic!("expected declaration");
        };
        assert_eq!(*kind, DeclarationKind::Let);
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].name, "x");
        assert!(declarations[1].init.is_none());
    }

    #[test]
    fn test_precedence() {
        let program = parse("1 + 2 * 3;");
        let Statement::ExpressionStatement(Expression::Binary { op, rhs, .. }) =
            &program.statements[0]
        else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Addition);
        assert!(matches!(
            **rhs,
            Expression::Binary {
                op: BinaryOp::Multiplication,
                ..
            }
        ));
    }

    #[test]
    fn test_exponentiation_right_associative() {
        let program = parse("2 ** 3 ** 2;");
        let Statement::ExpressionStatement(Expression::Binary { op, rhs, .. }) =
            &program.statements[0]
        else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Exponentiation);
        assert!(matches!(
            **rhs,
            Expression::Binary {
                op: BinaryOp::Exponentiation,
                ..
            }
        ));
    }

    #[test]
    fn test_member_chain() {
        let program = parse("a.b.c(1)[2];");
        let Statement::ExpressionStatement(Expression::Index { object, .. }) =
            &program.statements[0]
        else {
            panic!("expected index expression");
        };
        assert!(matches!(**object, Expression::Call { .. }));
    }

    #[test]
    fn test_object_literal_statement_heuristic() {
        let program = parse("{ \"a\": 1 }");
        assert!(matches!(
            program.statements[0],
            Statement::ExpressionStatement(Expression::ObjectExpression(_))
        ));
        // A plain `{}` stays a block.
        let program = parse("{}");
        assert!(matches!(program.statements[0], Statement::Block(_)));
    }

    #[test]
    fn test_for_in() {
        let program = parse("for (let k in a) {}");
        let Statement::ForIn {
            declaration_kind,
            binding,
            ..
        } = &program.statements[0]
        else {
            panic!("expected for-in");
        };
        assert_eq!(*declaration_kind, Some(DeclarationKind::Let));
        assert_eq!(binding, "k");
    }

    #[test]
    fn test_for_classic() {
        let program = parse("for (let i = 0; i < 10; i++) {}");
        assert!(matches!(program.statements[0], Statement::For { .. }));
    }

    #[test]
    fn test_try_catch_finally() {
        let program = parse("try { a; } catch (e) { b; } finally { c; }");
        let Statement::Try {
            handler, finalizer, ..
        } = &program.statements[0]
        else {
            panic!("expected try");
        };
        assert_eq!(handler.as_ref().unwrap().parameter.as_deref(), Some("e"));
        assert!(finalizer.is_some());
    }

    #[test]
    fn test_use_strict_directive() {
        assert!(parse("\"use strict\"; let x = 1;").strict);
        assert!(!parse("let x = 1;").strict);
    }

    #[test]
    fn test_new_expression() {
        let program = parse("new Error(\"boom\");");
        let Statement::ExpressionStatement(Expression::New { arguments, .. }) =
            &program.statements[0]
        else {
            panic!("expected new expression");
        };
        assert_eq!(arguments.len(), 1);
    }

    #[test]
    fn test_delete_unary() {
        let program = parse("delete a.x;");
        let Statement::ExpressionStatement(Expression::Unary { op, operand }) =
            &program.statements[0]
        else {
            panic!("expected unary expression");
        };
        assert_eq!(*op, UnaryOp::Delete);
        assert!(matches!(**operand, Expression::Member { .. }));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let error = Parser::new("let = 1;").parse_program().unwrap_err();
        assert!(error.message.contains("Unexpected"));
        assert_eq!(error.position.line, 1);
    }

    #[test]
    fn test_semicolon_insertion_at_line_break() {
        let program = parse("let a = 1\nlet b = 2");
        assert_eq!(program.statements.len(), 2);
    }
}
