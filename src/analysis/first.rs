use std::collections::{HashMap, HashSet};

use crate::grammar::symbol::{is_augmented_terminal, is_lambda};
use crate::grammar::{Grammar, Symbol};

use super::{Analysis, Result, SymbolSet};

// FIRST of a sequence given the nullable set and FIRST of each nonterminal.
// The flag says whether the whole sequence can vanish.
pub(super) fn sequence_first<S: AsRef<str>>(
    sequence: &[S],
    nullable: &HashSet<Symbol>,
    first: &HashMap<Symbol, SymbolSet>,
) -> (SymbolSet, bool) {
    let mut set = SymbolSet::new();
    for sym in sequence.iter().map(|sym| sym.as_ref()) {
        if is_lambda(sym) {
            continue;
        }
        if is_augmented_terminal(sym) {
            set.insert(sym.to_string());
            return (set, false);
        }
        if let Some(sym_first) = first.get(sym) {
            set.extend(sym_first.iter().cloned());
        }
        if !nullable.contains(sym) {
            return (set, false);
        }
    }
    (set, true)
}

pub(super) fn compute_first_sets(grammar: &Grammar, nullable: &HashSet<Symbol>) -> HashMap<Symbol, SymbolSet> {
    let mut first: HashMap<Symbol, SymbolSet> = grammar.nonterminals()
        .iter()
        .map(|nt| (nt.clone(), SymbolSet::new()))
        .collect();

    loop {
        let mut changed = false;
        for (lhs, rhs) in grammar.all_rules() {
            let (rhs_first, _) = sequence_first(rhs, nullable, &first);
            let entry = first.entry(lhs.to_string()).or_default();
            let before = entry.len();
            entry.extend(rhs_first);
            changed |= entry.len() != before;
        }
        if !changed {
            break;
        }
    }

    first
}

impl<'g> Analysis<'g> {
    /// The terminals (and possibly `$`) that can begin a derivation of
    /// `sequence`. `lambda` never appears in the result.
    pub fn first_set<S: AsRef<str>>(&self, sequence: &[S]) -> Result<SymbolSet> {
        for sym in sequence {
            self.check_symbol(sym.as_ref())?;
        }
        Ok(sequence_first(sequence, &self.nullable, &self.first).0)
    }
}
