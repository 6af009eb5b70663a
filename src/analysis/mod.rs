/*
    This module answers the questions an LL(1) parser builder asks of a
    grammar: nullability, FIRST, FOLLOW and PREDICT sets. All sets are
    computed once, as simultaneous fixed points over every nonterminal,
    when the analysis is created.
*/

mod first;
mod follow;
pub mod nullable;
mod predict;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;

use crate::error_handling::ErrorType;
use crate::grammar::symbol::{is_end_marker, is_lambda};
use crate::grammar::{Grammar, Symbol};

pub type SymbolSet = BTreeSet<Symbol>;

#[derive(Debug, PartialEq, Clone)]
pub enum AnalysisErrorType {
    // A query mentioned a symbol the grammar never registered
    UndefinedSymbol(Symbol),
    // A query that needs a nonterminal got something else
    NotANonterminal(Symbol),
}

impl ErrorType for AnalysisErrorType {}

impl Display for AnalysisErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisErrorType::UndefinedSymbol(sym) => write!(f, "`{}` is not a symbol of this grammar", sym),
            AnalysisErrorType::NotANonterminal(sym) => write!(f, "`{}` is not a nonterminal", sym),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisErrorType>;

#[derive(Debug)]
pub struct Analysis<'g> {
    grammar: &'g Grammar,
    nullable: HashSet<Symbol>,
    first: HashMap<Symbol, SymbolSet>,
    follow: HashMap<Symbol, SymbolSet>,
}

impl<'g> Analysis<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        let nullable = nullable::compute_nullable(grammar);
        let first = first::compute_first_sets(grammar, &nullable);
        let follow = follow::compute_follow_sets(grammar, &nullable, &first);

        Analysis {
            grammar,
            nullable,
            first,
            follow
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    fn check_symbol(&self, sym: &str) -> Result<()> {
        let known = is_end_marker(sym)
            || is_lambda(sym)
            || self.grammar.is_terminal(sym)
            || self.grammar.is_nonterminal(sym);
        if known {
            Ok(())
        } else {
            Err(AnalysisErrorType::UndefinedSymbol(sym.to_string()))
        }
    }

    fn check_nonterminal(&self, sym: &str) -> Result<()> {
        self.check_symbol(sym)?;
        if self.grammar.is_nonterminal(sym) {
            Ok(())
        } else {
            Err(AnalysisErrorType::NotANonterminal(sym.to_string()))
        }
    }
}
