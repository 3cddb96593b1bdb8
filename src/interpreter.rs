use std::{collections::HashMap, rc::Rc};

use log::trace;

use crate::{
    ast::Expression,
    error::{Error, Result},
    frame::Frame,
    model::{Closure, Procedure, Value},
    stack::ensure_sufficient_stack,
};

/// List heads with their own evaluation rules. Each receives its operands unevaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    Define,
    Lambda,
    If,
    And,
    Or,
    Quote,
    Begin,
}

impl SpecialForm {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "define" => Some(Self::Define),
            "lambda" => Some(Self::Lambda),
            "if" => Some(Self::If),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "quote" => Some(Self::Quote),
            "begin" => Some(Self::Begin),
            _ => None,
        }
    }

    fn evaluate(self, operands: &[Expression], frame: &Rc<Frame>) -> Result<Value> {
        match self {
            Self::Define => evaluate_define(operands, frame),
            Self::Lambda => match operands {
                [Expression::List(params), body] => make_closure(params, body, frame),
                _ => Err(Error::evaluation(
                    "malformed lambda: expected a parameter list and exactly one body expression",
                )),
            },
            Self::If => match operands {
                [test, yes, no] => {
                    if evaluate(test, frame)?.is_truthy() {
                        evaluate(yes, frame)
                    } else {
                        evaluate(no, frame)
                    }
                }
                _ => Err(Error::evaluation(format!(
                    "malformed if: expected a test and two branches, got {} operands",
                    operands.len()
                ))),
            },
            Self::And => {
                for operand in operands {
                    if !evaluate(operand, frame)?.is_truthy() {
                        return Ok(Value::Boolean(false));
                    }
                }
                Ok(Value::Boolean(true))
            }
            Self::Or => {
                for operand in operands {
                    if evaluate(operand, frame)?.is_truthy() {
                        return Ok(Value::Boolean(true));
                    }
                }
                Ok(Value::Boolean(false))
            }
            Self::Quote => match operands {
                [datum] => Ok(Value::from_datum(datum)),
                _ => Err(Error::evaluation(format!(
                    "malformed quote: expected exactly 1 operand, got {}",
                    operands.len()
                ))),
            },
            Self::Begin => {
                let Some((last, init)) = operands.split_last() else {
                    return Err(Error::evaluation("malformed begin: expected at least 1 operand"));
                };
                for operand in init {
                    evaluate(operand, frame)?;
                }
                evaluate(last, frame)
            }
        }
    }
}

/// Reject names that could never have come out of the tokeniser as a single symbol.
fn check_binding_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|character| character.is_whitespace() || character == ';') {
        Err(Error::name(format!("invalid name for a definition: {name:?}")))
    } else {
        Ok(())
    }
}

fn make_closure(params: &[Expression], body: &Expression, frame: &Rc<Frame>) -> Result<Value> {
    let params = params
        .iter()
        .map(|param| match param {
            Expression::Symbol(name) => Ok(name.clone()),
            other => Err(Error::evaluation(format!(
                "malformed parameter list: {other} is not a symbol"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Value::Procedure(Procedure::Closure(Rc::new(Closure {
        params,
        body: body.clone(),
        frame: Rc::clone(frame),
    }))))
}

/// `(define name expr)` or `(define (name params...) body)`.
fn evaluate_define(operands: &[Expression], frame: &Rc<Frame>) -> Result<Value> {
    let [target, body] = operands else {
        return Err(Error::evaluation(format!(
            "malformed define: expected a name and a value, got {} operands",
            operands.len()
        )));
    };

    let (name, value) = match target {
        Expression::Symbol(name) => {
            check_binding_name(name)?;
            (name, evaluate(body, frame)?)
        }
        Expression::List(signature) => match signature.split_first() {
            Some((Expression::Symbol(name), params)) => {
                check_binding_name(name)?;
                (name, make_closure(params, body, frame)?)
            }
            _ => {
                return Err(Error::evaluation(format!(
                    "malformed define: {target} doesn't start with a name"
                )));
            }
        },
        Expression::Number(num) => {
            return Err(Error::evaluation(format!(
                "malformed define: can't bind the number {num}"
            )));
        }
    };

    trace!("define {name} = {value}");
    Ok(frame.define(name.clone(), value))
}

/// Call an already evaluated procedure value on already evaluated arguments.
fn apply(procedure: &Value, args: Vec<Value>) -> Result<Value> {
    match procedure {
        Value::Procedure(Procedure::Builtin(builtin)) => {
            trace!("apply builtin {} to {} argument(s)", builtin.name(), args.len());
            builtin.apply(&args).map_err(|err| {
                Error::evaluation(format!(
                    "argument mismatch for builtin `{}`: {err}",
                    builtin.name()
                ))
            })
        }
        Value::Procedure(Procedure::Closure(closure)) => {
            if args.len() != closure.params.len() {
                return Err(Error::evaluation(format!(
                    "argument mismatch: expected {} argument(s), got {}",
                    closure.params.len(),
                    args.len()
                )));
            }
            trace!("apply closure over {:?}", closure.params);

            let bindings: HashMap<String, Value> =
                closure.params.iter().cloned().zip(args).collect();
            // Lexical scope: the call frame hangs off the frame the closure was made in.
            let call_frame = Frame::child(Rc::clone(&closure.frame), bindings);
            evaluate(&closure.body, &call_frame)
        }
        other => Err(Error::evaluation(format!("not a function: {other}"))),
    }
}

/// Evaluate `expr` in `frame`.
///
/// Numbers evaluate to themselves, symbols to whatever they are bound to, and lists are
/// either special forms (dispatched on the head keyword, before any lookup) or procedure
/// applications. `expr` is never modified; `frame` only changes through `define`.
pub fn evaluate(expr: &Expression, frame: &Rc<Frame>) -> Result<Value> {
    ensure_sufficient_stack(|| match expr {
        Expression::Number(num) => Ok(Value::Number(*num)),
        Expression::Symbol(name) => frame.lookup(name),
        Expression::List(exprs) => {
            let Some((head, operands)) = exprs.split_first() else {
                return Err(Error::evaluation(
                    "malformed expression: the empty list can't be evaluated",
                ));
            };

            if let Expression::Symbol(keyword) = head
                && let Some(form) = SpecialForm::from_keyword(keyword)
            {
                return form.evaluate(operands, frame);
            }

            let procedure = evaluate(head, frame)?;
            let args = operands
                .iter()
                .map(|operand| evaluate(operand, frame))
                .collect::<Result<Vec<_>>>()?;
            apply(&procedure, args)
        }
    })
}
