//! A small lexically scoped Lisp.
//!
//! Source text goes through [`tokenise`], then [`parse`] (one expression) or
//! [`parse_all`] (a whole program), then [`evaluate`] against a [`Frame`]. Each session
//! should get its own frame from [`Frame::initial`].
//!
//! ```
//! use lispette::{Frame, interpret};
//!
//! let frame = Frame::initial();
//! interpret("(define (addN n) (lambda (i) (+ i n)))", &frame).unwrap();
//! interpret("(define add7 (addN 7))", &frame).unwrap();
//! assert_eq!(interpret("(add7 2)", &frame).unwrap().to_string(), "9");
//! ```

use std::rc::Rc;

pub mod ast;
pub mod builtins;
pub mod error;
pub mod frame;
pub mod interpreter;
pub mod model;
pub mod parser;
mod stack;
pub mod tokeniser;

pub use ast::{Expression, Number};
pub use error::{ArgumentError, Error, Result};
pub use frame::Frame;
pub use interpreter::evaluate;
pub use model::{Closure, Procedure, Value};
pub use parser::{parse, parse_all};
pub use tokeniser::tokenise;

/// Tokenise, parse and evaluate a single expression.
pub fn interpret(source: &str, frame: &Rc<Frame>) -> Result<Value> {
    let expression = parse(&tokenise(source))?;
    evaluate(&expression, frame)
}

/// Run every top-level expression in `source` in order, stopping at the first error.
///
/// Returns the value of the last expression, or `None` for a program with no expressions.
/// Nothing is evaluated if the program doesn't parse.
pub fn interpret_program(source: &str, frame: &Rc<Frame>) -> Result<Option<Value>> {
    let mut result = None;
    for expression in parse_all(&tokenise(source))? {
        result = Some(evaluate(&expression, frame)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpret_program_returns_last_value() {
        let frame = Frame::initial();
        let result = interpret_program(
            "; squares\n(define (square x) (* x x))\n(define y 4)\n(square y)\n",
            &frame,
        )
        .unwrap();
        assert_eq!(result, Some(Value::Number(Number::Int(16))));
    }

    #[test]
    fn interpret_empty_program() {
        assert_eq!(interpret_program("; nothing", &Frame::initial()).unwrap(), None);
    }

    #[test]
    fn dont_run_program_that_doesnt_parse() {
        let frame = Frame::initial();
        assert!(matches!(
            interpret_program("(define x 1) (", &frame),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(interpret("x", &frame), Err(Error::Name(_))));
    }
}
