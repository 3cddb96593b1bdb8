use thiserror::Error;

/// Every way tokenising, parsing or evaluating a program can fail.
///
/// One variant per kind of failure; the message carries the detail.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// The token stream does not form exactly one well-bracketed expression.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// An identifier was used without a binding, or a binding name is unusable.
    #[error("name error: {0}")]
    Name(String),
    /// The program is well formed but can't be evaluated.
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by a builtin procedure about the arguments it was handed.
///
/// The evaluator never lets one of these escape as-is; it wraps it into
/// [`Error::Evaluation`] naming the builtin that complained.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ArgumentError {
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: &'static str, found: usize },
    #[error("expected {expected}, got {found}")]
    Type { expected: &'static str, found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
}

impl Error {
    /// Convenience for the `Error::Syntax` variant.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Convenience for the `Error::Name` variant.
    pub fn name(message: impl Into<String>) -> Self {
        Self::Name(message.into())
    }

    /// Convenience for the `Error::Evaluation` variant.
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_their_stage() {
        assert_eq!(
            Error::syntax("unexpected close parenthesis").to_string(),
            "syntax error: unexpected close parenthesis"
        );
        assert_eq!(
            Error::name("unbound identifier \"x\"").to_string(),
            "name error: unbound identifier \"x\""
        );
    }

    #[test]
    fn argument_error_messages() {
        assert_eq!(
            ArgumentError::Arity {
                expected: "at least 2",
                found: 1
            }
            .to_string(),
            "expected at least 2 argument(s), got 1"
        );
        assert_eq!(ArgumentError::DivisionByZero.to_string(), "division by zero");
    }
}
