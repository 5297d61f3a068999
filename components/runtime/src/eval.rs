//! The AST evaluator.
//!
//! Statement execution threads a completion through the tree so `break`,
//! `continue` and `return` unwind block structure without exceptions;
//! thrown JavaScript values travel as `Err` per the runtime-wide result
//! convention. The evaluator roots every intermediate value that has to
//! survive a later allocation on the interpreter's temporary stack -
//! collection can strike at any allocation point, including inside a
//! getter three calls deep.

use crate::conversions::PreferredType;
use crate::exception::JsResult;
use crate::interpreter::{Interpreter, ScopeKind};
use crate::object::{self, ObjectKind, ScriptFunction};
use crate::property_key::PropertyName;
use core_types::{ErrorKind, Value};
use num_traits::ToPrimitive;
use parser::ast::{
    AssignmentOp, BinaryOp, DeclarationKind, Expression, LogicalOp, Program, Statement, UnaryOp,
    UpdateOp,
};
use std::rc::Rc;

/// How a statement finished.
enum Completion {
    Normal(Value),
    Return(Value),
    Break,
    Continue,
}

/// An assignable location.
enum Reference {
    Variable(String),
    Property(Value, PropertyName),
}

impl Interpreter {
    pub(crate) fn execute_program(&mut self, program: &Program) -> JsResult<Value> {
        self.hoist_function_declarations(&program.statements)?;
        let mut last = Value::Undefined;
        for statement in &program.statements {
            self.check_interrupt()?;
            match self.execute_statement(statement)? {
                Completion::Normal(value) => {
                    if !value.is_empty() {
                        last = value;
                    }
                }
                Completion::Return(value) => return Ok(value),
                Completion::Break | Completion::Continue => break,
            }
        }
        Ok(last)
    }

    pub(crate) fn execute_function_body(&mut self, body: &[Statement]) -> JsResult<Value> {
        self.hoist_function_declarations(body)?;
        for statement in body {
            self.check_interrupt()?;
            match self.execute_statement(statement)? {
                Completion::Return(value) => return Ok(value),
                Completion::Normal(_) | Completion::Break | Completion::Continue => {}
            }
        }
        Ok(Value::Undefined)
    }

    fn check_interrupt(&mut self) -> JsResult<()> {
        if self.take_pending_interrupt() {
            return Err(self.throw_error(ErrorKind::Error, "Received SIGINT"));
        }
        Ok(())
    }

    fn hoist_function_declarations(&mut self, statements: &[Statement]) -> JsResult<()> {
        for statement in statements {
            if let Statement::FunctionDeclaration {
                name,
                parameters,
                body,
            } = statement
            {
                let function = self.create_script_function(name.clone(), parameters, body)?;
                self.declare_variable(name, DeclarationKind::Var, function)?;
            }
        }
        Ok(())
    }

    fn execute_statement(&mut self, statement: &Statement) -> JsResult<Completion> {
        match statement {
            Statement::VariableDeclaration { kind, declarations } => {
                for declarator in declarations {
                    let value = match &declarator.init {
                        Some(init) => self.eval_expression(init)?,
                        None => Value::Undefined,
                    };
                    self.declare_variable(&declarator.name, *kind, value)?;
                }
                Ok(Completion::Normal(Value::Empty))
            }
            // Bound during hoisting.
            Statement::FunctionDeclaration { .. } => Ok(Completion::Normal(Value::Empty)),
            Statement::ExpressionStatement(expression) => {
                let value = self.eval_expression(expression)?;
                Ok(Completion::Normal(value))
            }
            Statement::Block(statements) => self.execute_block(statements),
            Statement::If {
                test,
                consequent,
                alternate,
            } => {
                let test_value = self.eval_expression(test)?;
                if self.to_boolean(test_value) {
                    self.execute_statement(consequent)
                } else if let Some(alternate) = alternate {
                    self.execute_statement(alternate)
                } else {
                    Ok(Completion::Normal(Value::Empty))
                }
            }
            Statement::While { test, body } => {
                loop {
                    self.check_interrupt()?;
                    let test_value = self.eval_expression(test)?;
                    if !self.to_boolean(test_value) {
                        break;
                    }
                    match self.execute_statement(body)? {
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                        Completion::Normal(_) | Completion::Continue => {}
                    }
                }
                Ok(Completion::Normal(Value::Empty))
            }
            Statement::DoWhile { body, test } => {
                loop {
                    self.check_interrupt()?;
                    match self.execute_statement(body)? {
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                        Completion::Normal(_) | Completion::Continue => {}
                    }
                    let test_value = self.eval_expression(test)?;
                    if !self.to_boolean(test_value) {
                        break;
                    }
                }
                Ok(Completion::Normal(Value::Empty))
            }
            Statement::For {
                init,
                test,
                update,
                body,
            } => {
                self.push_scope(ScopeKind::Block);
                let result = self.execute_for(init, test, update, body);
                self.pop_scope();
                result
            }
            Statement::ForIn {
                declaration_kind,
                binding,
                object,
                body,
            } => {
                self.push_scope(ScopeKind::Block);
                let result = self.execute_for_in(*declaration_kind, binding, object, body);
                self.pop_scope();
                result
            }
            Statement::Return(argument) => {
                let value = match argument {
                    Some(expression) => self.eval_expression(expression)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Statement::Throw(expression) => {
                let value = self.eval_expression(expression)?;
                Err(self.throw_value(value))
            }
            Statement::Try {
                block,
                handler,
                finalizer,
            } => self.execute_try(block, handler.as_ref(), finalizer.as_deref()),
            Statement::Break => Ok(Completion::Break),
            Statement::Continue => Ok(Completion::Continue),
            Statement::Empty => Ok(Completion::Normal(Value::Empty)),
        }
    }

    fn execute_block(&mut self, statements: &[Statement]) -> JsResult<Completion> {
        self.push_scope(ScopeKind::Block);
        let result = self.execute_block_body(statements);
        self.pop_scope();
        result
    }

    fn execute_block_body(&mut self, statements: &[Statement]) -> JsResult<Completion> {
        self.hoist_function_declarations(statements)?;
        let mut last = Value::Empty;
        for statement in statements {
            match self.execute_statement(statement)? {
                Completion::Normal(value) => {
                    if !value.is_empty() {
                        last = value;
                    }
                }
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_for(
        &mut self,
        init: &Option<Box<Statement>>,
        test: &Option<Expression>,
        update: &Option<Expression>,
        body: &Statement,
    ) -> JsResult<Completion> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }
        loop {
            self.check_interrupt()?;
            if let Some(test) = test {
                let test_value = self.eval_expression(test)?;
                if !self.to_boolean(test_value) {
                    break;
                }
            }
            match self.execute_statement(body)? {
                Completion::Break => break,
                Completion::Return(value) => return Ok(Completion::Return(value)),
                Completion::Normal(_) | Completion::Continue => {}
            }
            if let Some(update) = update {
                self.eval_expression(update)?;
            }
        }
        Ok(Completion::Normal(Value::Empty))
    }

    fn execute_for_in(
        &mut self,
        declaration_kind: Option<DeclarationKind>,
        binding: &str,
        object_expression: &Expression,
        body: &Statement,
    ) -> JsResult<Completion> {
        let object_value = self.eval_expression(object_expression)?;
        if object_value.is_nullish() {
            return Ok(Completion::Normal(Value::Empty));
        }
        let mark = self.temporaries_mark();
        self.push_temporary(object_value);
        let object = self.to_object(object_value)?;
        let keys = object::own_property_keys(self.heap(), object, true);
        if let Some(kind) = declaration_kind {
            self.declare_variable(binding, kind, Value::Undefined)?;
        }
        for key in keys {
            self.check_interrupt()?;
            let key_value = self.js_string(key);
            self.set_variable(binding, key_value)?;
            match self.execute_statement(body)? {
                Completion::Break => break,
                Completion::Return(value) => {
                    self.truncate_temporaries(mark);
                    return Ok(Completion::Return(value));
                }
                Completion::Normal(_) | Completion::Continue => {}
            }
        }
        self.truncate_temporaries(mark);
        Ok(Completion::Normal(Value::Empty))
    }

    fn execute_try(
        &mut self,
        block: &[Statement],
        handler: Option<&parser::ast::CatchClause>,
        finalizer: Option<&[Statement]>,
    ) -> JsResult<Completion> {
        let mut outcome = self.execute_block(block);
        if let (Err(exception), Some(handler)) = (&outcome, handler) {
            let thrown = exception.value;
            self.clear_exception();
            self.push_scope(ScopeKind::Block);
            if let Some(parameter) = &handler.parameter {
                self.declare_variable(parameter, DeclarationKind::Let, thrown)?;
            }
            outcome = self.execute_block_body(&handler.body);
            self.pop_scope();
        }
        if let Some(finalizer) = finalizer {
            // An abrupt finally replaces whatever the try/catch produced.
            match self.execute_block(finalizer)? {
                Completion::Normal(_) => {}
                abrupt => return Ok(abrupt),
            }
        }
        outcome
    }

    // -- Expressions -------------------------------------------------------

    pub(crate) fn eval_expression(&mut self, expression: &Expression) -> JsResult<Value> {
        match expression {
            Expression::NumericLiteral(number) => Ok(Value::Number(*number)),
            Expression::BigIntLiteral(digits) => match crate::JsBigInt::parse(digits) {
                Some(value) => Ok(self.js_bigint(value)),
                None => Err(self.throw_error(
                    ErrorKind::SyntaxError,
                    format!("Invalid BigInt literal: {}", digits),
                )),
            },
            Expression::StringLiteral(text) => Ok(self.js_string(text.clone())),
            Expression::BooleanLiteral(boolean) => Ok(Value::Boolean(*boolean)),
            Expression::NullLiteral => Ok(Value::Null),
            Expression::Identifier { name, position } => match self.get_variable(name)? {
                Some(value) => Ok(value),
                None => Err(self.throw_error(
                    ErrorKind::ReferenceError,
                    format!("'{}' is not defined ({})", name, position),
                )),
            },
            Expression::This => Ok(self.this_value()),
            Expression::ObjectExpression(properties) => {
                let prototype = self.global_data().object_prototype;
                let object = self.create_object(Some(prototype), ObjectKind::Plain);
                let mark = self.temporaries_mark();
                self.push_temporary(Value::Object(object));
                for property in properties {
                    let value = self.eval_expression(&property.value)?;
                    self.put_property(object, &PropertyName::from_string(&*property.key), value)?;
                }
                self.truncate_temporaries(mark);
                Ok(Value::Object(object))
            }
            Expression::ArrayExpression(elements) => {
                let array = self.array_create(Vec::new());
                let mark = self.temporaries_mark();
                self.push_temporary(Value::Object(array));
                for (index, element) in elements.iter().enumerate() {
                    let Some(element) = element else {
                        continue;
                    };
                    let value = self.eval_expression(element)?;
                    self.put_property(array, &PropertyName::Index(index as u32), value)?;
                }
                self.truncate_temporaries(mark);
                Ok(Value::Object(array))
            }
            Expression::FunctionExpression {
                name,
                parameters,
                body,
            } => self.create_script_function(name.clone().unwrap_or_default(), parameters, body),
            Expression::Member { object, property } => {
                let base = self.eval_expression(object)?;
                self.get_member(base, &PropertyName::from_string(&**property))
            }
            Expression::Index { object, index } => {
                let base = self.eval_expression(object)?;
                let mark = self.temporaries_mark();
                self.push_temporary(base);
                let index_value = self.eval_expression(index)?;
                let name = self.to_property_name(index_value)?;
                let result = self.get_member(base, &name);
                self.truncate_temporaries(mark);
                result
            }
            Expression::Call {
                callee,
                arguments,
                position,
            } => self.eval_call(callee, arguments, *position),
            Expression::New { callee, arguments } => {
                let function = self.eval_expression(callee)?;
                let mark = self.temporaries_mark();
                self.push_temporary(function);
                let argument_values = self.eval_arguments(arguments)?;
                let result = match function {
                    Value::Object(handle) if self.heap().object(handle).is_function() => {
                        self.construct(handle, argument_values)
                    }
                    _ => {
                        let text = self.to_string_without_side_effects(function);
                        Err(self
                            .throw_error(ErrorKind::TypeError, format!("{} is not a constructor", text)))
                    }
                };
                self.truncate_temporaries(mark);
                result
            }
            Expression::Assignment { op, target, value } => self.eval_assignment(*op, target, value),
            Expression::Update { op, prefix, target } => self.eval_update(*op, *prefix, target),
            Expression::Binary { op, lhs, rhs } => {
                let left = self.eval_expression(lhs)?;
                let mark = self.temporaries_mark();
                self.push_temporary(left);
                let right = self.eval_expression(rhs)?;
                self.push_temporary(right);
                let result = self.apply_binary(*op, left, right);
                self.truncate_temporaries(mark);
                result
            }
            Expression::Logical { op, lhs, rhs } => {
                let left = self.eval_expression(lhs)?;
                let left_truthy = self.to_boolean(left);
                match op {
                    LogicalOp::And if !left_truthy => Ok(left),
                    LogicalOp::Or if left_truthy => Ok(left),
                    _ => self.eval_expression(rhs),
                }
            }
            Expression::Unary { op, operand } => self.eval_unary(*op, operand),
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let test_value = self.eval_expression(test)?;
                if self.to_boolean(test_value) {
                    self.eval_expression(consequent)
                } else {
                    self.eval_expression(alternate)
                }
            }
        }
    }

    fn eval_arguments(&mut self, arguments: &[Expression]) -> JsResult<Vec<Value>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = self.eval_expression(argument)?;
            // Root each argument; evaluating the next one may collect.
            self.push_temporary(value);
            values.push(value);
        }
        Ok(values)
    }

    fn eval_call(
        &mut self,
        callee: &Expression,
        arguments: &[Expression],
        position: core_types::SourcePosition,
    ) -> JsResult<Value> {
        let mark = self.temporaries_mark();
        let (function, this_value) = match callee {
            Expression::Member { object, property } => {
                let base = self.eval_expression(object)?;
                self.push_temporary(base);
                let function = self.get_member(base, &PropertyName::from_string(&**property))?;
                (function, base)
            }
            Expression::Index { object, index } => {
                let base = self.eval_expression(object)?;
                self.push_temporary(base);
                let index_value = self.eval_expression(index)?;
                let name = self.to_property_name(index_value)?;
                let function = self.get_member(base, &name)?;
                (function, base)
            }
            other => {
                let function = self.eval_expression(other)?;
                (function, Value::Object(self.global_object()))
            }
        };
        self.push_temporary(function);
        let result = match function {
            Value::Object(handle) if self.heap().object(handle).is_function() => {
                let argument_values = self.eval_arguments(arguments)?;
                self.call_function(handle, this_value, argument_values)
            }
            _ => {
                let text = self.to_string_without_side_effects(function);
                Err(self.throw_error(
                    ErrorKind::TypeError,
                    format!("{} is not a function ({})", text, position),
                ))
            }
        };
        self.truncate_temporaries(mark);
        result
    }

    fn get_member(&mut self, base: Value, name: &PropertyName) -> JsResult<Value> {
        if base.is_nullish() {
            let base_text = self.to_string_without_side_effects(base);
            return Err(self.throw_error(
                ErrorKind::TypeError,
                format!("Cannot read property '{}' of {}", name, base_text),
            ));
        }
        let mark = self.temporaries_mark();
        self.push_temporary(base);
        let object = self.to_object(base)?;
        self.push_temporary(Value::Object(object));
        let result = self.get_property(object, name);
        self.truncate_temporaries(mark);
        result
    }

    fn resolve_reference(&mut self, target: &Expression) -> JsResult<Reference> {
        match target {
            Expression::Identifier { name, .. } => Ok(Reference::Variable(name.clone())),
            Expression::Member { object, property } => {
                let base = self.eval_expression(object)?;
                Ok(Reference::Property(base, PropertyName::from_string(&**property)))
            }
            Expression::Index { object, index } => {
                let base = self.eval_expression(object)?;
                let mark = self.temporaries_mark();
                self.push_temporary(base);
                let index_value = self.eval_expression(index)?;
                let name = self.to_property_name(index_value)?;
                self.truncate_temporaries(mark);
                Ok(Reference::Property(base, name))
            }
            _ => Err(self.throw_error(ErrorKind::SyntaxError, "Invalid assignment target")),
        }
    }

    fn read_reference(&mut self, reference: &Reference) -> JsResult<Value> {
        match reference {
            Reference::Variable(name) => match self.get_variable(name)? {
                Some(value) => Ok(value),
                None => Err(self.throw_error(
                    ErrorKind::ReferenceError,
                    format!("'{}' is not defined", name),
                )),
            },
            Reference::Property(base, name) => self.get_member(*base, name),
        }
    }

    fn write_reference(&mut self, reference: &Reference, value: Value) -> JsResult<()> {
        match reference {
            Reference::Variable(name) => self.set_variable(name, value),
            Reference::Property(base, name) => match base {
                Value::Object(handle) => self.put_property(*handle, name, value),
                base if base.is_nullish() => {
                    let base_text = self.to_string_without_side_effects(*base);
                    Err(self.throw_error(
                        ErrorKind::TypeError,
                        format!("Cannot set property '{}' of {}", name, base_text),
                    ))
                }
                // Property writes on other primitives evaporate; strict
                // mode makes them observable.
                _ => {
                    if self.in_strict_mode() {
                        Err(self.throw_error(
                            ErrorKind::TypeError,
                            format!("Cannot create property '{}' on a primitive", name),
                        ))
                    } else {
                        Ok(())
                    }
                }
            },
        }
    }

    fn eval_assignment(
        &mut self,
        op: AssignmentOp,
        target: &Expression,
        value: &Expression,
    ) -> JsResult<Value> {
        let mark = self.temporaries_mark();
        let reference = self.resolve_reference(target)?;
        if let Reference::Property(base, _) = &reference {
            self.push_temporary(*base);
        }
        let result = match op {
            AssignmentOp::Assign => self.eval_expression(value)?,
            compound => {
                let old_value = self.read_reference(&reference)?;
                self.push_temporary(old_value);
                let rhs = self.eval_expression(value)?;
                self.push_temporary(rhs);
                let binary_op = match compound {
                    AssignmentOp::AdditionAssign => BinaryOp::Addition,
                    AssignmentOp::SubtractionAssign => BinaryOp::Subtraction,
                    AssignmentOp::MultiplicationAssign => BinaryOp::Multiplication,
                    AssignmentOp::DivisionAssign => BinaryOp::Division,
                    AssignmentOp::ModuloAssign => BinaryOp::Modulo,
                    AssignmentOp::Assign => unreachable!(),
                };
                self.apply_binary(binary_op, old_value, rhs)?
            }
        };
        self.push_temporary(result);
        self.write_reference(&reference, result)?;
        self.truncate_temporaries(mark);
        Ok(result)
    }

    fn eval_update(&mut self, op: UpdateOp, prefix: bool, target: &Expression) -> JsResult<Value> {
        let mark = self.temporaries_mark();
        let reference = self.resolve_reference(target)?;
        if let Reference::Property(base, _) = &reference {
            self.push_temporary(*base);
        }
        let old_value = self.read_reference(&reference)?;
        let old_number = self.to_number(old_value)?;
        let new_number = match op {
            UpdateOp::Increment => old_number + 1.0,
            UpdateOp::Decrement => old_number - 1.0,
        };
        self.write_reference(&reference, Value::Number(new_number))?;
        self.truncate_temporaries(mark);
        Ok(Value::Number(if prefix { new_number } else { old_number }))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expression) -> JsResult<Value> {
        // `typeof missing` and `delete target` inspect the reference
        // rather than the value.
        match op {
            UnaryOp::Typeof => {
                if let Expression::Identifier { name, .. } = operand {
                    return match self.get_variable(name)? {
                        Some(value) => {
                            let type_name = self.typeof_value(value);
                            Ok(self.js_string(type_name))
                        }
                        None => Ok(self.js_string("undefined")),
                    };
                }
                let value = self.eval_expression(operand)?;
                let type_name = self.typeof_value(value);
                return Ok(self.js_string(type_name));
            }
            UnaryOp::Delete => {
                return match operand {
                    Expression::Member { .. } | Expression::Index { .. } => {
                        let reference = self.resolve_reference(operand)?;
                        let Reference::Property(base, name) = reference else {
                            unreachable!()
                        };
                        let mark = self.temporaries_mark();
                        self.push_temporary(base);
                        let object = self.to_object(base)?;
                        let result = self.delete_property(object, &name);
                        self.truncate_temporaries(mark);
                        result.map(Value::Boolean)
                    }
                    Expression::Identifier { name, .. } => {
                        let global = self.global_object();
                        let deleted =
                            self.delete_property(global, &PropertyName::from_string(&**name))?;
                        Ok(Value::Boolean(deleted))
                    }
                    _ => {
                        self.eval_expression(operand)?;
                        Ok(Value::Boolean(true))
                    }
                };
            }
            _ => {}
        }

        let value = self.eval_expression(operand)?;
        match op {
            UnaryOp::Minus => {
                if let Value::BigInt(handle) = value {
                    let negated = -self.heap().bigint(handle).value().clone();
                    return Ok(self.js_bigint(negated));
                }
                Ok(Value::Number(-self.to_number(value)?))
            }
            UnaryOp::Plus => Ok(Value::Number(self.to_number(value)?)),
            UnaryOp::Not => Ok(Value::Boolean(!self.to_boolean(value))),
            UnaryOp::BitwiseNot => Ok(Value::Number(!self.to_i32(value)? as f64)),
            UnaryOp::Void => Ok(Value::Undefined),
            UnaryOp::Typeof | UnaryOp::Delete => unreachable!("handled above"),
        }
    }

    fn apply_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> JsResult<Value> {
        match op {
            BinaryOp::Addition => self.eval_addition(lhs, rhs),
            BinaryOp::Subtraction
            | BinaryOp::Multiplication
            | BinaryOp::Division
            | BinaryOp::Modulo
            | BinaryOp::Exponentiation => self.eval_numeric_operator(op, lhs, rhs),
            BinaryOp::StrictEquals => Ok(Value::Boolean(self.strict_equals(lhs, rhs))),
            BinaryOp::StrictNotEquals => Ok(Value::Boolean(!self.strict_equals(lhs, rhs))),
            BinaryOp::LooseEquals => Ok(Value::Boolean(self.loose_equals(lhs, rhs)?)),
            BinaryOp::LooseNotEquals => Ok(Value::Boolean(!self.loose_equals(lhs, rhs)?)),
            BinaryOp::LessThan => {
                let relation = self.abstract_less_than(lhs, rhs)?;
                Ok(Value::Boolean(relation.unwrap_or(false)))
            }
            BinaryOp::GreaterThan => {
                let relation = self.abstract_less_than(rhs, lhs)?;
                Ok(Value::Boolean(relation.unwrap_or(false)))
            }
            BinaryOp::LessThanEquals => {
                let relation = self.abstract_less_than(rhs, lhs)?;
                Ok(Value::Boolean(!relation.unwrap_or(true)))
            }
            BinaryOp::GreaterThanEquals => {
                let relation = self.abstract_less_than(lhs, rhs)?;
                Ok(Value::Boolean(!relation.unwrap_or(true)))
            }
            BinaryOp::BitwiseAnd => {
                let result = self.to_i32(lhs)? & self.to_i32(rhs)?;
                Ok(Value::Number(result as f64))
            }
            BinaryOp::BitwiseOr => {
                let result = self.to_i32(lhs)? | self.to_i32(rhs)?;
                Ok(Value::Number(result as f64))
            }
            BinaryOp::BitwiseXor => {
                let result = self.to_i32(lhs)? ^ self.to_i32(rhs)?;
                Ok(Value::Number(result as f64))
            }
            BinaryOp::LeftShift => {
                let result = self.to_i32(lhs)? << (self.to_u32(rhs)? & 31);
                Ok(Value::Number(result as f64))
            }
            BinaryOp::RightShift => {
                let result = self.to_i32(lhs)? >> (self.to_u32(rhs)? & 31);
                Ok(Value::Number(result as f64))
            }
            BinaryOp::UnsignedRightShift => {
                let result = self.to_u32(lhs)? >> (self.to_u32(rhs)? & 31);
                Ok(Value::Number(result as f64))
            }
            BinaryOp::In => {
                let Value::Object(object) = rhs else {
                    return Err(self.throw_error(
                        ErrorKind::TypeError,
                        "'in' operator needs an object on its right side",
                    ));
                };
                let name = self.to_property_name(lhs)?;
                Ok(Value::Boolean(self.has_property(object, &name)?))
            }
            BinaryOp::InstanceOf => self.eval_instance_of(lhs, rhs),
        }
    }

    fn eval_addition(&mut self, lhs: Value, rhs: Value) -> JsResult<Value> {
        let left = self.to_primitive(lhs, PreferredType::Default)?;
        let mark = self.temporaries_mark();
        self.push_temporary(left);
        let right = self.to_primitive(rhs, PreferredType::Default)?;
        self.push_temporary(right);
        let result = if left.is_string() || right.is_string() {
            let mut text = self.to_string(left)?;
            text.push_str(&self.to_string(right)?);
            Ok(self.js_string(text))
        } else if let (Value::BigInt(a), Value::BigInt(b)) = (left, right) {
            let sum = self.heap().bigint(a).value() + self.heap().bigint(b).value();
            Ok(self.js_bigint(sum))
        } else if left.is_bigint() || right.is_bigint() {
            Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot mix BigInt and other types in addition",
            ))
        } else {
            let a = self.to_number(left)?;
            let b = self.to_number(right)?;
            Ok(Value::Number(a + b))
        };
        self.truncate_temporaries(mark);
        result
    }

    fn eval_numeric_operator(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> JsResult<Value> {
        if let (Value::BigInt(a), Value::BigInt(b)) = (lhs, rhs) {
            let a = self.heap().bigint(a).value().clone();
            let b = self.heap().bigint(b).value().clone();
            let result = match op {
                BinaryOp::Subtraction => a - b,
                BinaryOp::Multiplication => a * b,
                BinaryOp::Division => {
                    if b == num_bigint::BigInt::from(0) {
                        return Err(self.throw_error(ErrorKind::RangeError, "Division by zero"));
                    }
                    a / b
                }
                BinaryOp::Modulo => {
                    if b == num_bigint::BigInt::from(0) {
                        return Err(self.throw_error(ErrorKind::RangeError, "Division by zero"));
                    }
                    a % b
                }
                BinaryOp::Exponentiation => {
                    let Some(exponent) = b.to_u32() else {
                        return Err(self.throw_error(
                            ErrorKind::RangeError,
                            "BigInt exponent must be a non-negative integer",
                        ));
                    };
                    a.pow(exponent)
                }
                _ => unreachable!(),
            };
            return Ok(self.js_bigint(result));
        }
        if lhs.is_bigint() || rhs.is_bigint() {
            return Err(self.throw_error(
                ErrorKind::TypeError,
                "Cannot mix BigInt and other types in arithmetic",
            ));
        }
        let a = self.to_number(lhs)?;
        let b = self.to_number(rhs)?;
        let result = match op {
            BinaryOp::Subtraction => a - b,
            BinaryOp::Multiplication => a * b,
            BinaryOp::Division => a / b,
            BinaryOp::Modulo => a % b,
            BinaryOp::Exponentiation => a.powf(b),
            _ => unreachable!(),
        };
        Ok(Value::Number(result))
    }

    fn eval_instance_of(&mut self, lhs: Value, rhs: Value) -> JsResult<Value> {
        let Value::Object(function) = rhs else {
            return Err(self.throw_error(
                ErrorKind::TypeError,
                "Right-hand side of 'instanceof' is not callable",
            ));
        };
        if !self.heap().object(function).is_function() {
            return Err(self.throw_error(
                ErrorKind::TypeError,
                "Right-hand side of 'instanceof' is not callable",
            ));
        }
        let Value::Object(mut current) = lhs else {
            return Ok(Value::Boolean(false));
        };
        let prototype =
            self.get_property(function, &PropertyName::String("prototype".to_string()))?;
        let Value::Object(prototype) = prototype else {
            return Err(self.throw_error(
                ErrorKind::TypeError,
                "Function has no usable prototype for 'instanceof'",
            ));
        };
        while let Some(ancestor) = object::prototype_of(self.heap(), current) {
            if ancestor == prototype {
                return Ok(Value::Boolean(true));
            }
            current = ancestor;
        }
        Ok(Value::Boolean(false))
    }

    /// Creates a function object for a declaration or expression,
    /// wiring the `prototype`/`constructor` pair.
    pub(crate) fn create_script_function(
        &mut self,
        name: String,
        parameters: &[String],
        body: &[Statement],
    ) -> JsResult<Value> {
        let function_prototype = self.global_data().function_prototype;
        let function = self.create_object(
            Some(function_prototype),
            ObjectKind::Function(ScriptFunction {
                name: name.clone(),
                parameters: parameters.to_vec(),
                body: Rc::new(body.to_vec()),
            }),
        );
        let mark = self.temporaries_mark();
        self.push_temporary(Value::Object(function));

        let name_value = self.js_string(name);
        self.define_property(
            function,
            &PropertyName::String("name".to_string()),
            name_value,
            core_types::PropertyAttributes::CONFIGURABLE,
        )?;
        self.define_property(
            function,
            &PropertyName::String("length".to_string()),
            Value::Number(parameters.len() as f64),
            core_types::PropertyAttributes::CONFIGURABLE,
        )?;

        let object_prototype = self.global_data().object_prototype;
        let prototype_object = self.create_object(Some(object_prototype), ObjectKind::Plain);
        self.push_temporary(Value::Object(prototype_object));
        self.define_property(
            prototype_object,
            &PropertyName::String("constructor".to_string()),
            Value::Object(function),
            core_types::PropertyAttributes::WRITABLE | core_types::PropertyAttributes::CONFIGURABLE,
        )?;
        self.define_property(
            function,
            &PropertyName::String("prototype".to_string()),
            Value::Object(prototype_object),
            core_types::PropertyAttributes::WRITABLE,
        )?;
        self.truncate_temporaries(mark);
        Ok(Value::Object(function))
    }
}
