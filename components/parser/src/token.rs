//! Token definitions for the JavaScript lexer.

use core_types::SourcePosition;

/// The type of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TokenType {
    // Sentinels
    Eof,
    Invalid,

    // Literals and names
    Identifier,
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    UnterminatedStringLiteral,
    BoolLiteral,
    NullLiteral,

    // Punctuation
    BracketOpen,
    BracketClose,
    CurlyOpen,
    CurlyClose,
    ParenOpen,
    ParenClose,
    Comma,
    Semicolon,
    Colon,
    Period,

    // Operators
    Ampersand,
    Asterisk,
    Caret,
    DoubleAmpersand,
    DoubleAsterisk,
    DoublePipe,
    Equals,
    EqualsEquals,
    EqualsEqualsEquals,
    ExclamationMark,
    ExclamationMarkEquals,
    ExclamationMarkEqualsEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    Minus,
    MinusEquals,
    MinusMinus,
    Percent,
    PercentEquals,
    Pipe,
    Plus,
    PlusEquals,
    PlusPlus,
    QuestionMark,
    ShiftLeft,
    ShiftRight,
    Slash,
    SlashEquals,
    AsteriskEquals,
    Tilde,
    UnsignedShiftRight,

    // Keywords
    Break,
    Catch,
    Const,
    Continue,
    Delete,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    In,
    Instanceof,
    Let,
    New,
    Return,
    This,
    Throw,
    Try,
    Typeof,
    Var,
    Void,
    While,
}

/// Display category of a token, used by the REPL syntax highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    /// Invalid or unterminated input
    Invalid,
    /// Numeric and bigint literals
    Number,
    /// String literals
    String,
    /// Brackets, separators and operators
    Punctuation,
    /// `true`, `false`, `null`
    Literal,
    /// Declaration and operator keywords
    Keyword,
    /// Control-flow keywords
    ControlKeyword,
    /// Identifiers
    Identifier,
}

impl TokenType {
    /// True for identifiers and every keyword, i.e. anything that can
    /// appear as a property name after `.`.
    pub fn is_identifier_name(self) -> bool {
        matches!(
            self,
            TokenType::Identifier
                | TokenType::BoolLiteral
                | TokenType::NullLiteral
                | TokenType::Break
                | TokenType::Catch
                | TokenType::Const
                | TokenType::Continue
                | TokenType::Delete
                | TokenType::Do
                | TokenType::Else
                | TokenType::Finally
                | TokenType::For
                | TokenType::Function
                | TokenType::If
                | TokenType::In
                | TokenType::Instanceof
                | TokenType::Let
                | TokenType::New
                | TokenType::Return
                | TokenType::This
                | TokenType::Throw
                | TokenType::Try
                | TokenType::Typeof
                | TokenType::Var
                | TokenType::Void
                | TokenType::While
        )
    }

    /// The highlighting category of this token type.
    pub fn category(self) -> TokenCategory {
        use TokenType::*;
        match self {
            Invalid | UnterminatedStringLiteral => TokenCategory::Invalid,
            NumericLiteral | BigIntLiteral => TokenCategory::Number,
            StringLiteral => TokenCategory::String,
            BoolLiteral | NullLiteral => TokenCategory::Literal,
            Const | Delete | Function | In | Instanceof | Let | New | This | Throw | Typeof
            | Var | Void => TokenCategory::Keyword,
            Break | Catch | Continue | Do | Else | Finally | For | If | Return | Try | While => {
                TokenCategory::ControlKeyword
            }
            Identifier => TokenCategory::Identifier,
            _ => TokenCategory::Punctuation,
        }
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token type
    pub token_type: TokenType,
    /// The source text of the token (string literals are unescaped)
    pub value: String,
    /// Position of the first character of the token
    pub position: SourcePosition,
}

impl Token {
    /// Creates a new token.
    pub fn new(token_type: TokenType, value: impl Into<String>, position: SourcePosition) -> Self {
        Token {
            token_type,
            value: value.into(),
            position,
        }
    }

    /// Numeric value of a `NumericLiteral` token.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-numeric token.
    pub fn double_value(&self) -> f64 {
        assert_eq!(self.token_type, TokenType::NumericLiteral);
        let text = &self.value;
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return u64::from_str_radix(hex, 16).map(|v| v as f64).unwrap_or(f64::NAN);
        }
        if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
            return u64::from_str_radix(oct, 8).map(|v| v as f64).unwrap_or(f64::NAN);
        }
        if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
            return u64::from_str_radix(bin, 2).map(|v| v as f64).unwrap_or(f64::NAN);
        }
        text.parse().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_name_includes_keywords() {
        assert!(TokenType::Identifier.is_identifier_name());
        assert!(TokenType::Delete.is_identifier_name());
        assert!(!TokenType::CurlyOpen.is_identifier_name());
    }

    #[test]
    fn test_double_value_radixes() {
        let position = SourcePosition::new(1, 1);
        assert_eq!(
            Token::new(TokenType::NumericLiteral, "0x10", position).double_value(),
            16.0
        );
        assert_eq!(
            Token::new(TokenType::NumericLiteral, "0b101", position).double_value(),
            5.0
        );
        assert_eq!(
            Token::new(TokenType::NumericLiteral, "0o17", position).double_value(),
            15.0
        );
        assert_eq!(
            Token::new(TokenType::NumericLiteral, "1.5e2", position).double_value(),
            150.0
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(TokenType::NumericLiteral.category(), TokenCategory::Number);
        assert_eq!(TokenType::If.category(), TokenCategory::ControlKeyword);
        assert_eq!(TokenType::Let.category(), TokenCategory::Keyword);
        assert_eq!(TokenType::Comma.category(), TokenCategory::Punctuation);
    }
}
