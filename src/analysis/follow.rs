use std::collections::{HashMap, HashSet};

use crate::grammar::symbol::END;
use crate::grammar::{Grammar, Symbol};

use super::first::sequence_first;
use super::{Analysis, Result, SymbolSet};

// Everything that can come right after `target` given the current FOLLOW
// approximation of the nonterminals that use it
fn follow_contribution(
    grammar: &Grammar,
    target: &str,
    nullable: &HashSet<Symbol>,
    first: &HashMap<Symbol, SymbolSet>,
    follow: &HashMap<Symbol, SymbolSet>,
) -> SymbolSet {
    let mut found = SymbolSet::new();
    for (lhs, rhs) in grammar.rules_containing(target) {
        let positions = rhs.iter()
            .enumerate()
            .filter(|(_, sym)| *sym == target)
            .map(|(i, _)| i);

        for i in positions {
            let (tail_first, tail_vanishes) = sequence_first(&rhs[i + 1..], nullable, first);
            found.extend(tail_first);

            // Nothing (or only nullable symbols) after `target`, so whatever
            // follows `lhs` follows it too
            if tail_vanishes {
                if let Some(lhs_follow) = follow.get(lhs) {
                    found.extend(lhs_follow.iter().cloned());
                }
            }
        }
    }
    found
}

pub(super) fn compute_follow_sets(
    grammar: &Grammar,
    nullable: &HashSet<Symbol>,
    first: &HashMap<Symbol, SymbolSet>,
) -> HashMap<Symbol, SymbolSet> {
    let mut follow: HashMap<Symbol, SymbolSet> = grammar.nonterminals()
        .iter()
        .map(|nt| (nt.clone(), SymbolSet::new()))
        .collect();

    // Input ends after a complete goal
    follow.entry(grammar.goal().to_string()).or_default().insert(END.to_string());

    loop {
        let mut changed = false;
        for target in grammar.nonterminals() {
            let found = follow_contribution(grammar, target, nullable, first, &follow);
            let entry = follow.entry(target.clone()).or_default();
            let before = entry.len();
            entry.extend(found);
            changed |= entry.len() != before;
        }
        if !changed {
            break;
        }
    }

    follow
}

impl<'g> Analysis<'g> {
    /// The terminals (and possibly `$`) that can come right after
    /// `nonterminal` in some sentential form derived from the goal.
    pub fn follow_set(&self, nonterminal: &str) -> Result<SymbolSet> {
        self.check_nonterminal(nonterminal)?;
        Ok(self.follow.get(nonterminal).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisErrorType;
    use crate::grammar::tests::grammar;

    fn set(symbols: &[&str]) -> SymbolSet {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lambda_list() {
        let g = grammar(&[
            ("S", &[&["A", "$"]]),
            ("A", &[&["a", "A"], &["lambda"]])
        ]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.follow_set("A"), Ok(set(&["$"])));
        assert_eq!(analysis.follow_set("S"), Ok(set(&["$"])));
    }

    #[test]
    fn expression_grammar() {
        let g = grammar(&[
            ("S", &[&["E", "$"]]),
            ("E", &[&["T", "Etail"]]),
            ("Etail", &[&["plus", "T", "Etail"], &["lambda"]]),
            ("T", &[&["F", "Ttail"]]),
            ("Ttail", &[&["times", "F", "Ttail"], &["lambda"]]),
            ("F", &[&["lparen", "E", "rparen"], &["id"]])
        ]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.follow_set("E"), Ok(set(&["$", "rparen"])));
        assert_eq!(analysis.follow_set("Etail"), Ok(set(&["$", "rparen"])));
        assert_eq!(analysis.follow_set("T"), Ok(set(&["$", "plus", "rparen"])));
        assert_eq!(analysis.follow_set("Ttail"), Ok(set(&["$", "plus", "rparen"])));
        assert_eq!(analysis.follow_set("F"), Ok(set(&["$", "plus", "rparen", "times"])));
    }

    #[test]
    fn nullable_tail_falls_through() {
        let g = grammar(&[
            ("S", &[&["X", "c", "$"]]),
            ("X", &[&["A", "B", "C"]]),
            ("A", &[&["a"]]),
            ("B", &[&["b"], &["lambda"]]),
            ("C", &[&["lambda"]])
        ]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.follow_set("X"), Ok(set(&["c"])));
        assert_eq!(analysis.follow_set("A"), Ok(set(&["b", "c"])));
        assert_eq!(analysis.follow_set("B"), Ok(set(&["c"])));
        assert_eq!(analysis.follow_set("C"), Ok(set(&["c"])));
    }

    #[test]
    fn repeated_occurrences_all_count() {
        let g = grammar(&[
            ("S", &[&["A", "x", "A", "y", "$"]]),
            ("A", &[&["a"]])
        ]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.follow_set("A"), Ok(set(&["x", "y"])));
    }

    #[test]
    fn recursive_nonterminals_terminate() {
        let g = grammar(&[
            ("S", &[&["A", "$"]]),
            ("A", &[&["B", "a"], &["lambda"]]),
            ("B", &[&["A", "b"], &["A"]])
        ]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.follow_set("A"), Ok(set(&["$", "a", "b"])));
        assert_eq!(analysis.follow_set("B"), Ok(set(&["a"])));
    }

    #[test]
    fn goal_follow_has_end_marker() {
        let g = grammar(&[
            ("Program", &[&["Stmt", "Program", "$"], &["semi", "$"]]),
            ("Stmt", &[&["id"]])
        ]);
        let analysis = Analysis::new(&g);

        assert!(analysis.follow_set(g.goal()).unwrap().contains(END));
    }

    #[test]
    fn queries_need_a_nonterminal() {
        let g = grammar(&[("S", &[&["a", "$"]])]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.follow_set("a"), Err(AnalysisErrorType::NotANonterminal("a".to_string())));
        assert_eq!(analysis.follow_set("$"), Err(AnalysisErrorType::NotANonterminal("$".to_string())));
        assert_eq!(analysis.follow_set("Q"), Err(AnalysisErrorType::UndefinedSymbol("Q".to_string())));
    }
}
