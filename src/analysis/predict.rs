use std::fmt::Display;

use itertools::Itertools;

use crate::grammar::{Alternative, Rule, Symbol};

use super::first::sequence_first;
use super::{Analysis, Result, SymbolSet};

// Two alternatives of one nonterminal that the same lookahead selects
#[derive(Debug, PartialEq, Clone)]
pub struct Conflict {
    pub nonterminal: Symbol,
    pub first: Alternative,
    pub second: Alternative,
    pub lookahead: SymbolSet,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}`: `{}` and `{}` both predict on {{{}}}",
            self.nonterminal,
            self.first.join(" "),
            self.second.join(" "),
            self.lookahead.iter().join(", ")
        )
    }
}

impl<'g> Analysis<'g> {
    // Only called with rules that came out of the grammar
    fn rule_predict(&self, (lhs, rhs): Rule<'_>) -> SymbolSet {
        let (mut predict, rhs_vanishes) = sequence_first(rhs, &self.nullable, &self.first);
        if rhs_vanishes {
            if let Some(lhs_follow) = self.follow.get(lhs) {
                predict.extend(lhs_follow.iter().cloned());
            }
        }
        predict
    }

    /// The lookaheads that select `lhs -> rhs`: FIRST of the right hand side,
    /// plus FOLLOW of `lhs` when the right hand side can vanish.
    pub fn predict_set(&self, rule: Rule<'_>) -> Result<SymbolSet> {
        let (lhs, rhs) = rule;
        self.check_nonterminal(lhs)?;
        for sym in rhs {
            self.check_symbol(sym)?;
        }
        Ok(self.rule_predict(rule))
    }

    /// Every pair of alternatives whose predict sets overlap, ordered by
    /// nonterminal name and then by alternative position.
    pub fn conflicts(&self) -> Vec<Conflict> {
        self.grammar.nonterminals()
            .iter()
            .flat_map(|nonterminal| {
                let predicts = self.grammar.rules_for(nonterminal)
                    .into_iter()
                    .map(|rule| (rule.1, self.rule_predict(rule)))
                    .collect_vec();

                predicts.iter()
                    .tuple_combinations()
                    .filter_map(|((first, first_predict), (second, second_predict))| {
                        let lookahead: SymbolSet = first_predict.intersection(second_predict).cloned().collect();
                        (!lookahead.is_empty()).then(|| Conflict {
                            nonterminal: nonterminal.clone(),
                            first: first.to_vec(),
                            second: second.to_vec(),
                            lookahead
                        })
                    })
                    .collect_vec()
            })
            .collect()
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisErrorType;
    use crate::grammar::tests::{alternatives, grammar};

    fn set(symbols: &[&str]) -> SymbolSet {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn rhs(symbols: &[&str]) -> Vec<Symbol> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lambda_list_is_ll1() {
        let g = grammar(&[
            ("S", &[&["A", "$"]]),
            ("A", &[&["a", "A"], &["lambda"]])
        ]);
        let analysis = Analysis::new(&g);

        assert!(analysis.derives_to_lambda("A"));
        assert_eq!(analysis.first_set(&["A"]), Ok(set(&["a"])));
        assert_eq!(analysis.follow_set("A"), Ok(set(&["$"])));
        assert_eq!(analysis.predict_set(("A", &rhs(&["a", "A"]))), Ok(set(&["a"])));
        assert_eq!(analysis.predict_set(("A", &rhs(&["lambda"]))), Ok(set(&["$"])));
        assert!(analysis.is_ll1());
    }

    #[test]
    fn common_prefix_is_not_ll1() {
        let g = grammar(&[
            ("S", &[&["A", "$"]]),
            ("A", &[&["a"], &["a", "b"]])
        ]);
        let analysis = Analysis::new(&g);

        assert!(analysis.predict_set(("A", &rhs(&["a"]))).unwrap().contains("a"));
        assert!(analysis.predict_set(("A", &rhs(&["a", "b"]))).unwrap().contains("a"));
        assert!(!analysis.is_ll1());
        assert_eq!(analysis.conflicts(), vec![Conflict {
            nonterminal: "A".to_string(),
            first: rhs(&["a"]),
            second: rhs(&["a", "b"]),
            lookahead: set(&["a"])
        }]);
    }

    #[test]
    fn predict_is_first_when_lhs_is_not_nullable() {
        let g = grammar(&[
            ("S", &[&["E", "$"]]),
            ("E", &[&["T", "Etail"]]),
            ("Etail", &[&["plus", "T", "Etail"], &["lambda"]]),
            ("T", &[&["F", "Ttail"]]),
            ("Ttail", &[&["times", "F", "Ttail"], &["lambda"]]),
            ("F", &[&["lparen", "E", "rparen"], &["id"]])
        ]);
        let analysis = Analysis::new(&g);

        for rule in g.all_rules() {
            if !analysis.derives_to_lambda(rule.0) {
                assert_eq!(analysis.predict_set(rule), analysis.first_set(rule.1));
            }
        }
        assert_eq!(analysis.predict_set(("Etail", &rhs(&["lambda"]))), Ok(set(&["$", "rparen"])));
        assert_eq!(analysis.predict_set(("Ttail", &rhs(&["lambda"]))), Ok(set(&["$", "plus", "rparen"])));
        assert!(analysis.is_ll1());
    }

    #[test]
    fn shared_first_terminal_conflicts() {
        let g = grammar(&[
            ("S", &[&["Stmt", "$"]]),
            ("Stmt", &[&["id", "assign", "Expr"], &["id", "lparen", "rparen"], &["Block"]]),
            ("Block", &[&["lbrace", "rbrace"]]),
            ("Expr", &[&["num"]])
        ]);
        let analysis = Analysis::new(&g);

        let conflicts = analysis.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].nonterminal, "Stmt");
        assert_eq!(conflicts[0].lookahead, set(&["id"]));
    }

    #[test]
    fn two_vanishing_alternatives_conflict_on_follow() {
        let g = grammar(&[
            ("S", &[&["A", "x", "$"]]),
            ("A", &[&["B"], &["lambda"]]),
            ("B", &[&["b"], &["lambda"]])
        ]);
        let analysis = Analysis::new(&g);

        assert_eq!(analysis.conflicts(), vec![Conflict {
            nonterminal: "A".to_string(),
            first: rhs(&["B"]),
            second: rhs(&["lambda"]),
            lookahead: set(&["x"])
        }]);
    }

    #[test]
    fn left_recursion_is_not_ll1() {
        let g = grammar(&[
            ("S", &[&["E", "$"]]),
            ("E", &[&["E", "plus", "id"], &["id"]])
        ]);
        let analysis = Analysis::new(&g);

        assert!(!analysis.is_ll1());
    }

    #[test]
    fn predict_rejects_unknown_symbols() {
        let g = grammar(&[("S", &[&["a", "$"]])]);
        let analysis = Analysis::new(&g);

        assert_eq!(
            analysis.predict_set(("S", &rhs(&["a", "Q"]))),
            Err(AnalysisErrorType::UndefinedSymbol("Q".to_string()))
        );
        assert_eq!(
            analysis.predict_set(("a", &rhs(&["a"]))),
            Err(AnalysisErrorType::NotANonterminal("a".to_string()))
        );
    }

    #[test]
    fn conflict_display() {
        let conflict = Conflict {
            nonterminal: "A".to_string(),
            first: alternatives(&[&["a"]]).remove(0),
            second: alternatives(&[&["a", "b"]]).remove(0),
            lookahead: set(&["a", "c"])
        };
        assert_eq!(conflict.to_string(), "`A`: `a` and `a b` both predict on {a, c}");
    }
}
