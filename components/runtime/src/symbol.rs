//! Symbol cells.

/// A symbol cell.
///
/// Every allocation is a distinct symbol; equality between symbol values
/// is handle identity, never description comparison.
#[derive(Debug, Clone)]
pub struct JsSymbol {
    description: Option<String>,
}

impl JsSymbol {
    /// Creates a symbol with an optional description.
    pub fn new(description: Option<String>) -> Self {
        JsSymbol { description }
    }

    /// The description passed to `Symbol()`, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The `Symbol(description)` display form.
    pub fn to_display_string(&self) -> String {
        format!("Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string() {
        assert_eq!(
            JsSymbol::new(Some("foo".to_string())).to_display_string(),
            "Symbol(foo)"
        );
        assert_eq!(JsSymbol::new(None).to_display_string(), "Symbol()");
    }
}
