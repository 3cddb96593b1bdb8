use std::{
    cmp::Ordering,
    fmt::{self, Display},
};

use crate::stack::ensure_sufficient_stack;

// AST NODES

/// A numeric literal. Integers stay integers until they meet a float.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            // Precision loss above 2^53 is accepted, same as any mixed-type arithmetic.
            #[allow(clippy::cast_precision_loss)]
            Self::Int(int) => int as f64,
            Self::Float(float) => float,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(int) => int == 0,
            Self::Float(float) => float == 0.0,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(ours), Self::Int(theirs)) => ours == theirs,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(ours), Self::Int(theirs)) => Some(ours.cmp(theirs)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{int}"),
            // Debug keeps the trailing `.0`, so floats read back as floats.
            Self::Float(float) => write!(f, "{float:?}"),
        }
    }
}

/// An s-expression: the one node type for both code and quoted data.
///
/// Nesting is only bounded by memory, so none of the trait impls below recurse on the
/// plain thread stack. `Drop` flattens nested lists onto a worklist instead of recursing.
#[derive(Debug)]
pub enum Expression {
    Number(Number),
    Symbol(String),
    List(Vec<Expression>),
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| match self {
            Self::Number(num) => Self::Number(*num),
            Self::Symbol(name) => Self::Symbol(name.clone()),
            Self::List(exprs) => Self::List(exprs.clone()),
        })
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (Self::Number(ours), Self::Number(theirs)) => ours == theirs,
            (Self::Symbol(ours), Self::Symbol(theirs)) => ours == theirs,
            (Self::List(ours), Self::List(theirs)) => ours == theirs,
            _ => false,
        })
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let Self::List(exprs) = self else {
            return;
        };
        let mut pending = std::mem::take(exprs);
        while let Some(mut expr) = pending.pop() {
            if let Self::List(inner) = &mut expr {
                pending.append(inner);
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Number(num) => write!(f, "{num}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::List(exprs) => {
                write!(f, "(")?;
                for (idx, expr) in exprs.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{expr}")?;
                }
                write!(f, ")")
            }
        })
    }
}

/// Classify a single non-parenthesis token.
///
/// Anything that reads as an `i64` is an integer, then anything that reads as a finite
/// `f64` is a float. The rest (including `inf` and `nan`) are symbols.
pub fn number_or_symbol(token: &str) -> Expression {
    if let Ok(int) = token.parse::<i64>() {
        Expression::Number(Number::Int(int))
    } else if let Ok(float) = token.parse::<f64>()
        && float.is_finite()
    {
        Expression::Number(Number::Float(float))
    } else {
        Expression::Symbol(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_integer() {
        assert_eq!(number_or_symbol("42"), Expression::Number(Number::Int(42)));
        assert_eq!(number_or_symbol("-7"), Expression::Number(Number::Int(-7)));
    }

    #[test]
    fn classify_float() {
        assert_eq!(
            number_or_symbol("-867.5309"),
            Expression::Number(Number::Float(-867.5309))
        );
    }

    #[test]
    fn classify_symbols() {
        for token in ["+", "-", "equal?", "#t", "bare-name", "inf", "NaN", "1-2"] {
            assert_eq!(number_or_symbol(token), Expression::Symbol(token.to_string()));
        }
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(Number::Int(2), Number::Float(2.0));
        assert!(Number::Int(2) < Number::Float(2.5));
        assert!(Number::Float(-1.0) < Number::Int(0));
    }

    #[test]
    fn display_round_trips_floats() {
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
        assert_eq!(Number::Int(2).to_string(), "2");
    }

    #[test]
    fn display_nested_list() {
        let expr = Expression::List(vec![
            Expression::Symbol("+".to_string()),
            Expression::Number(Number::Int(3)),
            Expression::List(vec![
                Expression::Symbol("-".to_string()),
                Expression::Number(Number::Float(1.5)),
            ]),
            Expression::List(vec![]),
        ]);
        assert_eq!(expr.to_string(), "(+ 3 (- 1.5) ())");
    }

    fn nested(depth: usize) -> Expression {
        let mut expr = Expression::Number(Number::Int(0));
        for _ in 0..depth {
            expr = Expression::List(vec![Expression::Symbol("+".to_string()), expr]);
        }
        expr
    }

    #[test]
    fn drop_deep_tree() {
        drop(nested(200_000));
    }

    #[test]
    fn clone_compare_and_display_deep_tree() {
        let expr = nested(100_000);
        let copy = expr.clone();
        assert!(copy == expr);
        assert!(copy != nested(99_999));

        let text = expr.to_string();
        assert_eq!(text.matches('(').count(), 100_000);
        assert!(text.ends_with(" 0))"));
    }
}
