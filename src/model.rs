use std::{
    fmt::{self, Debug, Display},
    rc::Rc,
};

use crate::{
    ast::{Expression, Number},
    builtins::Builtin,
    frame::Frame,
    stack::ensure_sufficient_stack,
};

/// A user procedure made by `lambda` or the `(define (name params...) body)` shorthand.
///
/// `frame` is the frame the closure was created in, never the one it is called from.
pub struct Closure {
    pub params: Vec<String>,
    pub body: Expression,
    pub frame: Rc<Frame>,
}

impl Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The captured frame may well contain this closure, so it is left out.
        write!(f, "Closure over {:?} with body {}", self.params, self.body)
    }
}

#[derive(Clone, Debug)]
pub enum Procedure {
    Builtin(Builtin),
    Closure(Rc<Closure>),
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(ours), Self::Builtin(theirs)) => ours == theirs,
            (Self::Closure(ours), Self::Closure(theirs)) => Rc::ptr_eq(ours, theirs),
            _ => false,
        }
    }
}

/// The result of evaluating an expression.
///
/// List payloads are shared, so looking a list up or passing it around never copies its
/// elements.
#[derive(Clone, Debug)]
pub enum Value {
    Number(Number),
    Boolean(bool),
    Symbol(String),
    List(Rc<Vec<Value>>),
    Procedure(Procedure),
}

impl Value {
    pub fn list(values: Vec<Value>) -> Self {
        Self::List(Rc::new(values))
    }

    /// Only `#f` counts as false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false))
    }

    /// Turn a quoted expression into data.
    pub fn from_datum(expr: &Expression) -> Self {
        ensure_sufficient_stack(|| match expr {
            Expression::Number(num) => Self::Number(*num),
            Expression::Symbol(name) => Self::Symbol(name.clone()),
            Expression::List(exprs) => Self::list(exprs.iter().map(Self::from_datum).collect()),
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (Self::Number(ours), Self::Number(theirs)) => ours == theirs,
            (Self::Boolean(ours), Self::Boolean(theirs)) => ours == theirs,
            (Self::Symbol(ours), Self::Symbol(theirs)) => ours == theirs,
            (Self::List(ours), Self::List(theirs)) => Rc::ptr_eq(ours, theirs) || ours == theirs,
            (Self::Procedure(ours), Self::Procedure(theirs)) => ours == theirs,
            _ => false,
        })
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        // Only the last owner of a list tears it down, one level at a time.
        let Self::List(values) = self else {
            return;
        };
        let Some(values) = Rc::get_mut(values) else {
            return;
        };
        let mut pending = std::mem::take(values);
        while let Some(mut value) = pending.pop() {
            if let Self::List(inner) = &mut value
                && let Some(inner) = Rc::get_mut(inner)
            {
                pending.append(inner);
            }
        }
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Number(num) => write!(f, "{num}"),
            Self::Boolean(true) => write!(f, "#t"),
            Self::Boolean(false) => write!(f, "#f"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::List(values) => {
                write!(f, "(")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
            Self::Procedure(Procedure::Builtin(builtin)) => {
                write!(f, "<builtin {}>", builtin.name())
            }
            Self::Procedure(Procedure::Closure(closure)) => {
                write!(f, "<procedure ({})>", closure.params.join(" "))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_false_is_falsy() {
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(Number::Int(0)).is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn quoted_list_becomes_data() {
        let expr = Expression::List(vec![
            Expression::Symbol("a".to_string()),
            Expression::Number(Number::Int(1)),
        ]);
        assert_eq!(
            Value::from_datum(&expr),
            Value::list(vec![
                Value::Symbol("a".to_string()),
                Value::Number(Number::Int(1))
            ])
        );
    }

    #[test]
    fn display_values() {
        assert_eq!(Value::Boolean(true).to_string(), "#t");
        assert_eq!(
            Value::list(vec![Value::Number(Number::Float(0.5)), Value::Boolean(false)])
                .to_string(),
            "(0.5 #f)"
        );
        assert_eq!(
            Value::Procedure(Procedure::Builtin(Builtin::Add)).to_string(),
            "<builtin +>"
        );
    }

    #[test]
    fn closures_compare_by_identity() {
        let frame = Frame::initial();
        let make = || {
            Rc::new(Closure {
                params: vec!["x".to_string()],
                body: Expression::Symbol("x".to_string()),
                frame: Rc::clone(&frame),
            })
        };
        let first = make();
        let second = make();

        assert_eq!(
            Procedure::Closure(Rc::clone(&first)),
            Procedure::Closure(Rc::clone(&first))
        );
        assert_ne!(Procedure::Closure(first), Procedure::Closure(second));
    }

    fn nested(depth: usize) -> Value {
        let mut value = Value::list(vec![]);
        for _ in 0..depth {
            value = Value::list(vec![Value::Symbol("a".to_string()), value]);
        }
        value
    }

    #[test]
    fn drop_deep_list() {
        drop(nested(200_000));
    }

    #[test]
    fn drop_shared_deep_list() {
        let inner = nested(100_000);
        let outer = Value::list(vec![inner.clone(), inner.clone()]);
        drop(outer);
        assert_eq!(inner.to_string().matches('(').count(), 100_001);
    }

    #[test]
    fn compare_deep_lists() {
        assert_eq!(nested(100_000), nested(100_000));
        assert_ne!(nested(100_000), nested(100_001));
    }

    #[test]
    fn quote_deep_datum() {
        let mut expr = Expression::List(vec![]);
        for _ in 0..100_000 {
            expr = Expression::List(vec![Expression::Symbol("a".to_string()), expr]);
        }
        assert_eq!(Value::from_datum(&expr), nested(100_000));
    }
}
