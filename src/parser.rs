use std::iter::Peekable;

use log::debug;

use crate::{
    ast::{Expression, number_or_symbol},
    error::{Error, Result},
};

mod symbols;

use symbols::{NonTerminal, StackSymbol, TRANSITION_TABLE, Terminal, nonterm};

/// A builder for expressions whose closing parenthesis hasn't been seen yet.
#[derive(Debug, Default)]
struct ExprBuilder {
    open_lists: Vec<Vec<Expression>>,
    finished: Option<Expression>,
}

impl ExprBuilder {
    fn open_list(&mut self) {
        self.open_lists.push(Vec::new());
    }

    fn close_list(&mut self) -> Result<()> {
        match self.open_lists.pop() {
            Some(exprs) => self.take(Expression::List(exprs)),
            None => Err(Error::syntax(
                "Something went wrong internally; closed a list that was never opened.",
            )),
        }
    }

    /// Add an expression to the innermost open list, or finish the build with it.
    fn take(&mut self, expr: Expression) -> Result<()> {
        if let Some(innermost) = self.open_lists.last_mut() {
            innermost.push(expr);
            Ok(())
        } else if self.finished.is_some() {
            Err(Error::syntax(
                "Something went wrong internally; can't add terms to a finished expression.",
            ))
        } else {
            self.finished = Some(expr);
            Ok(())
        }
    }

    fn finish(self) -> Result<Expression> {
        self.finished.ok_or_else(|| {
            Error::syntax("Something went wrong internally; can't finish an expression with no value.")
        })
    }

    /// The error for running out of tokens part way through an expression.
    fn end_of_input(&self) -> Error {
        if self.open_lists.is_empty() {
            Error::syntax("unexpected end of input")
        } else {
            Error::syntax("unmatched open parenthesis")
        }
    }
}

/// Parse exactly one expression off the front of `tokens`, leaving the rest untouched.
fn parse_expression<'a>(tokens: &mut Peekable<impl Iterator<Item = &'a str>>) -> Result<Expression> {
    let mut builder = ExprBuilder::default();
    let mut symbols = vec![nonterm!(Expression)];

    while let Some(symbol) = symbols.pop() {
        match symbol {
            StackSymbol::NonTerminal(nonterm_symb) => {
                let Some(token) = tokens.peek() else {
                    return Err(builder.end_of_input());
                };
                let terminal = Terminal::from(*token);

                match TRANSITION_TABLE.get(&(terminal, nonterm_symb)) {
                    Some(new_symbols) => symbols.extend(new_symbols.iter().rev()),
                    None if terminal == Terminal::RightParen => {
                        return Err(Error::syntax("unexpected close parenthesis"));
                    }
                    None => {
                        return Err(Error::syntax(format!(
                            "Something went wrong internally; {nonterm_symb:?} was on the \
                             symbol stack and {token:?} was the next input token."
                        )));
                    }
                }
            }
            StackSymbol::Terminal(term_symb) => {
                let Some(token) = tokens.next() else {
                    return Err(builder.end_of_input());
                };
                if Terminal::from(token) != term_symb {
                    return Err(Error::syntax(format!(
                        "Something went wrong internally; a {token:?} was seen when a \
                         {term_symb:?} was expected."
                    )));
                }

                match term_symb {
                    Terminal::LeftParen => builder.open_list(),
                    Terminal::RightParen => builder.close_list()?,
                    Terminal::Atom => builder.take(number_or_symbol(token))?,
                }
            }
        }
    }

    builder.finish()
}

/// Parse a list of tokens and return an AST - a single expression.
///
/// Every token must belong to that one expression; anything left over is a syntax error.
pub fn parse<T: AsRef<str>>(tokens: &[T]) -> Result<Expression> {
    let mut tokens = tokens.iter().map(AsRef::<str>::as_ref).peekable();
    let expr = parse_expression(&mut tokens)?;

    match tokens.next() {
        None => Ok(expr),
        Some(extra) => Err(Error::syntax(format!(
            "extra tokens after a complete expression, starting at {extra:?}"
        ))),
    }
}

/// Parse a whole program: zero or more top-level expressions, in order.
pub fn parse_all<T: AsRef<str>>(tokens: &[T]) -> Result<Vec<Expression>> {
    let mut tokens = tokens.iter().map(AsRef::<str>::as_ref).peekable();
    let mut exprs = Vec::new();

    while tokens.peek().is_some() {
        exprs.push(parse_expression(&mut tokens)?);
    }

    debug!("parsed {} top-level expressions", exprs.len());
    Ok(exprs)
}
