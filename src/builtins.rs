use std::cmp::Ordering;

use crate::{ast::Number, error::ArgumentError, model::Value};

type ArgResult<T> = std::result::Result<T, ArgumentError>;

/// The primitive procedures bound in every root frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Not,
    List,
    Cons,
    Car,
    Cdr,
    NullCheck,
    Length,
}

impl Builtin {
    pub const ALL: [Self; 16] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Equal,
        Self::Greater,
        Self::GreaterEqual,
        Self::Less,
        Self::LessEqual,
        Self::Not,
        Self::List,
        Self::Cons,
        Self::Car,
        Self::Cdr,
        Self::NullCheck,
        Self::Length,
    ];

    /// The identifier the builtin is bound to.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Equal => "equal?",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Not => "not",
            Self::List => "list",
            Self::Cons => "cons",
            Self::Car => "car",
            Self::Cdr => "cdr",
            Self::NullCheck => "null?",
            Self::Length => "length",
        }
    }

    /// Run the builtin on already evaluated arguments.
    pub fn apply(self, args: &[Value]) -> ArgResult<Value> {
        match self {
            Self::Add => sum(&numbers(args)?).map(Value::from),
            Self::Multiply => product(&numbers(args)?).map(Value::from),
            Self::Subtract => match numbers(args)?.split_first() {
                None => Err(arity("at least 1", args)),
                Some((first, rest)) => subtract(*first, sum(rest)?).map(Value::from),
            },
            Self::Divide => match numbers(args)?.split_first() {
                None => Err(arity("at least 1", args)),
                Some((first, rest)) => divide(*first, product(rest)?).map(Value::from),
            },
            Self::Equal => {
                at_least_two(args)?;
                Ok(Value::Boolean(args.windows(2).all(|pair| pair[0] == pair[1])))
            }
            Self::Greater => compare_chain(args, Ordering::is_gt),
            Self::GreaterEqual => compare_chain(args, Ordering::is_ge),
            Self::Less => compare_chain(args, Ordering::is_lt),
            Self::LessEqual => compare_chain(args, Ordering::is_le),
            Self::Not => {
                let [value] = args else {
                    return Err(arity("exactly 1", args));
                };
                Ok(Value::Boolean(!value.is_truthy()))
            }
            Self::List => Ok(Value::list(args.to_vec())),
            Self::Cons => {
                let [car, cdr] = args else {
                    return Err(arity("exactly 2", args));
                };
                let mut values = vec![car.clone()];
                values.extend_from_slice(list(cdr)?);
                Ok(Value::list(values))
            }
            Self::Car => match single_list(args)?.split_first() {
                Some((car, _)) => Ok(car.clone()),
                None => Err(empty_list()),
            },
            Self::Cdr => match single_list(args)?.split_first() {
                Some((_, cdr)) => Ok(Value::list(cdr.to_vec())),
                None => Err(empty_list()),
            },
            Self::NullCheck => {
                let [value] = args else {
                    return Err(arity("exactly 1", args));
                };
                Ok(Value::Boolean(
                    matches!(value, Value::List(values) if values.is_empty()),
                ))
            }
            Self::Length => {
                let len = single_list(args)?.len();
                i64::try_from(len)
                    .map(|len| Value::Number(Number::Int(len)))
                    .map_err(|_| ArgumentError::Overflow)
            }
        }
    }
}

// ARGUMENT CHECKS

fn arity(expected: &'static str, args: &[Value]) -> ArgumentError {
    ArgumentError::Arity {
        expected,
        found: args.len(),
    }
}

fn at_least_two(args: &[Value]) -> ArgResult<()> {
    if args.len() < 2 {
        Err(arity("at least 2", args))
    } else {
        Ok(())
    }
}

fn empty_list() -> ArgumentError {
    ArgumentError::Type {
        expected: "a non-empty list",
        found: "()".to_string(),
    }
}

fn number(value: &Value) -> ArgResult<Number> {
    match value {
        Value::Number(num) => Ok(*num),
        other => Err(ArgumentError::Type {
            expected: "a number",
            found: other.to_string(),
        }),
    }
}

fn numbers(args: &[Value]) -> ArgResult<Vec<Number>> {
    args.iter().map(number).collect()
}

fn list(value: &Value) -> ArgResult<&[Value]> {
    match value {
        Value::List(values) => Ok(values.as_slice()),
        other => Err(ArgumentError::Type {
            expected: "a list",
            found: other.to_string(),
        }),
    }
}

fn single_list(args: &[Value]) -> ArgResult<&[Value]> {
    match args {
        [value] => list(value),
        _ => Err(arity("exactly 1", args)),
    }
}

// ARITHMETIC

/// Apply `checked` when both sides are integers, otherwise `float` on the widened values.
fn combine(
    first: Number,
    second: Number,
    checked: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> ArgResult<Number> {
    match (first, second) {
        (Number::Int(ours), Number::Int(theirs)) => checked(ours, theirs)
            .map(Number::Int)
            .ok_or(ArgumentError::Overflow),
        _ => Ok(Number::Float(float(first.as_f64(), second.as_f64()))),
    }
}

fn subtract(first: Number, second: Number) -> ArgResult<Number> {
    combine(first, second, i64::checked_sub, |a, b| a - b)
}

/// True division: the result is always a float.
fn divide(first: Number, second: Number) -> ArgResult<Number> {
    if second.is_zero() {
        return Err(ArgumentError::DivisionByZero);
    }
    Ok(Number::Float(first.as_f64() / second.as_f64()))
}

fn sum(nums: &[Number]) -> ArgResult<Number> {
    nums.iter().try_fold(Number::Int(0), |acc, num| {
        combine(acc, *num, i64::checked_add, |a, b| a + b)
    })
}

fn product(nums: &[Number]) -> ArgResult<Number> {
    nums.iter().try_fold(Number::Int(1), |acc, num| {
        combine(acc, *num, i64::checked_mul, |a, b| a * b)
    })
}

/// Check `holds` for every adjacent pair of numeric arguments.
fn compare_chain(args: &[Value], holds: fn(Ordering) -> bool) -> ArgResult<Value> {
    at_least_two(args)?;
    let nums = numbers(args)?;
    // NaN can't be produced by the arithmetic above, but an unordered pair is just false.
    Ok(Value::Boolean(nums.windows(2).all(|pair| {
        pair[0].partial_cmp(&pair[1]).is_some_and(holds)
    })))
}
