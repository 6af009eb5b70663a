use std::collections::HashSet;

use itertools::Itertools;

use crate::grammar::symbol::{is_augmented_terminal, is_lambda, is_lambda_rhs, is_nonterminal};
use crate::grammar::{Grammar, Rule, Symbol};

use super::Analysis;

// An alternative vanishes when every symbol in it is `lambda` or an
// already-known nullable nonterminal
fn alternative_vanishes(rhs: &[Symbol], nullable: &HashSet<Symbol>) -> bool {
    rhs.iter().all(|sym| is_lambda(sym) || nullable.contains(sym))
}

// Least fixed point: start with nothing nullable and keep marking
// nonterminals until a whole pass changes nothing
pub(super) fn compute_nullable(grammar: &Grammar) -> HashSet<Symbol> {
    let mut nullable = HashSet::new();
    loop {
        let mut changed = false;
        for (lhs, rhs) in grammar.all_rules() {
            if !nullable.contains(lhs) && alternative_vanishes(rhs, &nullable) {
                nullable.insert(lhs.to_string());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    nullable
}

// A nonterminal we are trying to prove nullable, and the rule that needed it
type Obligation<'a> = (Rule<'a>, &'a str);

// `settled` answers for nonterminals whose result cannot depend on the stack
fn derives_to_lambda_with<'a, F>(
    grammar: &'a Grammar,
    nonterminal: &str,
    settled: &F,
    stack: &mut Vec<Obligation<'a>>
) -> bool
where
    F: Fn(&str) -> Option<bool>
{
    for (lhs, rhs) in grammar.rules_for(nonterminal) {
        if is_lambda_rhs(rhs) {
            return true;
        }
        if rhs.iter().any(|sym| is_augmented_terminal(sym)) {
            continue;
        }

        let all_vanish = rhs.iter()
            .filter(|sym| is_nonterminal(sym))
            .all(|candidate| {
                if let Some(known) = settled(candidate.as_str()) {
                    return known;
                }
                let obligation = ((lhs, rhs), candidate.as_str());
                // Already trying to prove this one further up: assume it holds
                if stack.contains(&obligation) {
                    return true;
                }
                stack.push(obligation);
                let vanishes = derives_to_lambda_with(grammar, candidate, settled, stack);
                stack.pop();
                vanishes
            });

        if all_vanish {
            return true;
        }
    }

    false
}

/// Depth-first nullability check that breaks cycles optimistically: an
/// obligation met again while it is still being proven counts as satisfied.
/// This always terminates but can call a nonterminal nullable when its only
/// route to `lambda` is through itself (e.g. `A -> A`), which is exactly
/// where it disagrees with [`Analysis::derives_to_lambda`].
pub fn derives_to_lambda_traced(grammar: &Grammar, nonterminal: &str) -> bool {
    derives_to_lambda_with(grammar, nonterminal, &|_: &str| -> Option<bool> { None }, &mut Vec::new())
}

// Non-nullable nonterminals that can reach a cycle of other non-nullable
// nonterminals through terminal-free alternatives. Outside this set the
// traversal never meets its own obligations, so it agrees with the fixed point.
fn cycle_reaching<'a>(grammar: &'a Grammar, nullable: &HashSet<Symbol>) -> HashSet<&'a str> {
    let mut reaching: HashSet<&str> = grammar.nonterminals()
        .iter()
        .map(String::as_str)
        .filter(|nt| !nullable.contains(*nt))
        .collect();

    // Peel off nonterminals with no edge left into the set until none remain
    loop {
        let dead_ends = reaching.iter()
            .copied()
            .filter(|nt| {
                !grammar.rules_for(nt).into_iter().any(|(_, rhs)| {
                    !rhs.iter().any(|sym| is_augmented_terminal(sym))
                        && rhs.iter().any(|sym| reaching.contains(sym.as_str()))
                })
            })
            .collect_vec();
        if dead_ends.is_empty() {
            break;
        }
        for nt in dead_ends {
            reaching.remove(nt);
        }
    }
    reaching
}

impl<'g> Analysis<'g> {
    /// Whether `nonterminal` can derive the empty string. Symbols the grammar
    /// has no rules for are never nullable.
    pub fn derives_to_lambda(&self, nonterminal: &str) -> bool {
        self.nullable.contains(nonterminal)
    }

    /// Nonterminals the optimistic traversal calls nullable although the
    /// fixed point does not. Only nonterminals that reach a cycle are traced.
    pub fn cyclic_nullability(&self) -> Vec<&'g str> {
        let suspects = cycle_reaching(self.grammar, &self.nullable);
        let settled = |nt: &str| (!suspects.contains(nt)).then(|| self.nullable.contains(nt));

        self.grammar.nonterminals()
            .iter()
            .map(String::as_str)
            .filter(|nt| suspects.contains(nt))
            .filter(|nt| derives_to_lambda_with(self.grammar, nt, &settled, &mut Vec::new()))
            .collect()
    }
}
