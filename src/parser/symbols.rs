use lazy_static::lazy_static;
use std::collections::HashMap;

/// Terminal stack symbols - the three shapes a token string can take.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Terminal {
    LeftParen,
    RightParen,
    Atom,
}

impl From<&str> for Terminal {
    fn from(value: &str) -> Self {
        match value {
            "(" => Self::LeftParen,
            ")" => Self::RightParen,
            _ => Self::Atom,
        }
    }
}

/// Non-terminal stack symbols.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NonTerminal {
    Expression,
    Expressions,
}

/// Parser stack symbols.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum StackSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

/// Convenience macro for creating a terminal stack symbol by name.
macro_rules! term {
    ($terminal:ident) => {
        StackSymbol::Terminal(Terminal::$terminal)
    };
}

/// Convenience macro for creating a non-terminal stack symbol by name.
macro_rules! nonterm {
    ($nonterminal:ident) => {
        StackSymbol::NonTerminal(NonTerminal::$nonterminal)
    };
}

pub(crate) use nonterm;

lazy_static! {
    /// The LL(1) transition table for
    /// `expression -> atom | ( expressions )` and `expressions -> expression expressions | ε`.
    pub static ref TRANSITION_TABLE: HashMap<(Terminal, NonTerminal), Vec<StackSymbol>> =
        HashMap::from([
            // expression -> atom
            (
                (Terminal::Atom, NonTerminal::Expression),
                vec![term!(Atom)],
            ),
            // expression -> ( expressions )
            (
                (Terminal::LeftParen, NonTerminal::Expression),
                vec![
                    term!(LeftParen),
                    nonterm!(Expressions),
                    term!(RightParen),
                ],
            ),
            // expressions -> expression expressions
            (
                (Terminal::Atom, NonTerminal::Expressions),
                vec![nonterm!(Expression), nonterm!(Expressions)],
            ),
            // expressions -> expression expressions
            (
                (Terminal::LeftParen, NonTerminal::Expressions),
                vec![nonterm!(Expression), nonterm!(Expressions)],
            ),
            // expressions -> ε
            ((Terminal::RightParen, NonTerminal::Expressions), vec![]),
        ]);
}
