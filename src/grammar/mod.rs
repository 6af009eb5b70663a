/*
    This module stores grammars: rules are added during a construction
    phase, after which the grammar is frozen and indexed for analysis
*/

pub mod symbol;
mod verifier;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ErrorType;
use symbol::*;

pub type Symbol = String;

// The symbols in a single alternative
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule
pub type Rewrite = Vec<Alternative>;

// A single production, borrowed out of a grammar
pub type Rule<'a> = (&'a str, &'a [Symbol]);

#[derive(Debug, PartialEq, Clone)]
pub enum GrammarErrorType {
    // Some, but not all, alternatives of a rule end with the end marker
    PartialEndMarker(Symbol),
    // A second nonterminal tried to become the goal
    GoalConflict { goal: Symbol, lhs: Symbol },
    // A rule was defined for something that is not a nonterminal
    NotANonterminal(Symbol),
    // A rule was added with no alternatives
    EmptyRewrite(Symbol),
    // An alternative with no symbols at all (use `lambda` instead)
    EmptyAlternative(Symbol),
    // `$` somewhere other than the end of an alternative
    MisplacedEndMarker(Symbol),
    // `lambda` sharing an alternative with other symbols
    MisplacedLambda(Symbol),
    // A nonterminal is used but never defined
    UndefinedNonterminal { symbol: Symbol, used_by: Symbol },
    // No rule ends with the end marker
    MissingGoal,
}

impl ErrorType for GrammarErrorType {}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::PartialEndMarker(lhs) => write!(f, "Some but not all alternatives of `{}` end with `{}`", lhs, END),
            GrammarErrorType::GoalConflict { goal, lhs } => write!(f, "`{}` ends with `{}` but `{}` is already the goal", lhs, END, goal),
            GrammarErrorType::NotANonterminal(sym) => write!(f, "`{}` is not a nonterminal and cannot have rules", sym),
            GrammarErrorType::EmptyRewrite(lhs) => write!(f, "Rule for `{}` has no alternatives", lhs),
            GrammarErrorType::EmptyAlternative(lhs) => write!(f, "Rule for `{}` has an empty alternative (write `{}`)", lhs, LAMBDA),
            GrammarErrorType::MisplacedEndMarker(lhs) => write!(f, "Rule for `{}` has `{}` before the end of an alternative", lhs, END),
            GrammarErrorType::MisplacedLambda(lhs) => write!(f, "Rule for `{}` mixes `{}` with other symbols", lhs, LAMBDA),
            GrammarErrorType::UndefinedNonterminal { symbol, used_by } => write!(f, "Could not find definition for `{}` (used by `{}`)", symbol, used_by),
            GrammarErrorType::MissingGoal => write!(f, "No rule ends with `{}`, so the grammar has no goal", END),
        }
    }
}

pub type Result<T> = std::result::Result<T, GrammarErrorType>;

#[derive(Debug, Default)]
pub struct GrammarBuilder {
    goal: Option<Symbol>,
    terminals: BTreeSet<Symbol>,
    nonterminals: BTreeSet<Symbol>,
    rules: HashMap<Symbol, Rewrite>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Works out whether `lhs -> alternatives` is the goal, checking that it
    // agrees with what has been added so far
    fn check_goal(&self, lhs: &str, alternatives: &Rewrite) -> Result<bool> {
        let ending = alternatives.iter().filter(|alt| is_end(alt.as_slice())).count();
        let is_goal_rule = ending > 0;
        if is_goal_rule && ending != alternatives.len() {
            return Err(GrammarErrorType::PartialEndMarker(lhs.to_string()));
        }

        let already_goal = self.goal.as_deref() == Some(lhs);
        match (&self.goal, is_goal_rule) {
            (Some(goal), true) if !already_goal => Err(GrammarErrorType::GoalConflict {
                goal: goal.clone(),
                lhs: lhs.to_string()
            }),
            // Earlier alternatives of this nonterminal did not end with `$`
            (None, true) if self.rules.contains_key(lhs) => Err(GrammarErrorType::PartialEndMarker(lhs.to_string())),
            (_, false) if already_goal => Err(GrammarErrorType::PartialEndMarker(lhs.to_string())),
            _ => Ok(is_goal_rule)
        }
    }

    // Adds `lhs -> alt1 | alt2 | ...`. On error nothing is changed.
    pub fn add_rule(&mut self, lhs: &str, alternatives: Rewrite) -> Result<()> {
        if !is_nonterminal(lhs) {
            return Err(GrammarErrorType::NotANonterminal(lhs.to_string()));
        }
        if alternatives.is_empty() {
            return Err(GrammarErrorType::EmptyRewrite(lhs.to_string()));
        }
        if alternatives.iter().any(Vec::is_empty) {
            return Err(GrammarErrorType::EmptyAlternative(lhs.to_string()));
        }
        if alternatives.iter().any(|alt| alt.len() > 1 && alt.iter().any(|s| is_lambda(s))) {
            return Err(GrammarErrorType::MisplacedLambda(lhs.to_string()));
        }
        if alternatives.iter().any(|alt| alt[..alt.len() - 1].iter().any(|s| is_end_marker(s))) {
            return Err(GrammarErrorType::MisplacedEndMarker(lhs.to_string()));
        }

        if self.check_goal(lhs, &alternatives)? {
            self.goal = Some(lhs.to_string());
        }

        let touched = alternatives.iter().flatten();
        self.terminals.extend(touched.clone().filter(|s| is_terminal(s)).cloned());
        self.nonterminals.extend(touched.filter(|s| is_nonterminal(s)).cloned());
        self.nonterminals.insert(lhs.to_string());

        self.rules.entry(lhs.to_string()).or_default().extend(alternatives);
        Ok(())
    }

    // Freezes the grammar. Every problem found is reported, not just the first.
    pub fn build(self) -> std::result::Result<Grammar, Vec<GrammarErrorType>> {
        let mut errors = verifier::get_undefined_symbols(&self.rules);

        let goal = match self.goal {
            Some(goal) => goal,
            None => {
                errors.push(GrammarErrorType::MissingGoal);
                String::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let occurrences = index_occurrences(&self.rules);
        Ok(Grammar {
            goal,
            terminals: self.terminals,
            nonterminals: self.nonterminals,
            rules: self.rules,
            occurrences
        })
    }
}

// Maps each symbol to the (lhs, alternative index) pairs whose right hand
// side mentions it, once per alternative
fn index_occurrences(rules: &HashMap<Symbol, Rewrite>) -> HashMap<Symbol, Vec<(Symbol, usize)>> {
    let mut occurrences = HashMap::<Symbol, Vec<(Symbol, usize)>>::new();
    for (lhs, rewrite) in rules.iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
        for (index, alternative) in rewrite.iter().enumerate() {
            for symbol in alternative.iter().unique() {
                occurrences.entry(symbol.clone()).or_default().push((lhs.clone(), index));
            }
        }
    }
    occurrences
}

#[derive(Debug, PartialEq)]
pub struct Grammar {
    goal: Symbol,
    terminals: BTreeSet<Symbol>,
    nonterminals: BTreeSet<Symbol>,
    rules: HashMap<Symbol, Rewrite>,
    occurrences: HashMap<Symbol, Vec<(Symbol, usize)>>,
}

impl Grammar {
    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &BTreeSet<Symbol> {
        &self.nonterminals
    }

    pub fn is_terminal(&self, sym: &str) -> bool {
        self.terminals.contains(sym)
    }

    pub fn is_nonterminal(&self, sym: &str) -> bool {
        self.nonterminals.contains(sym)
    }

    // Unknown symbols simply have no rules
    pub fn rules_for(&self, lhs: &str) -> Vec<Rule<'_>> {
        match self.rules.get_key_value(lhs) {
            Some((lhs, rewrite)) => rewrite.iter().map(|rhs| (lhs.as_str(), rhs.as_slice())).collect(),
            None => Vec::new()
        }
    }

    pub fn rules_containing(&self, sym: &str) -> Vec<Rule<'_>> {
        let Some(uses) = self.occurrences.get(sym) else {
            return Vec::new();
        };
        uses.iter()
            .filter_map(|(lhs, index)| {
                let (lhs, rewrite) = self.rules.get_key_value(lhs)?;
                Some((lhs.as_str(), rewrite.get(*index)?.as_slice()))
            })
            .collect()
    }

    // Every rule, goal first and then by nonterminal name
    pub fn all_rules(&self) -> Vec<Rule<'_>> {
        self.display_order()
            .flat_map(|nonterminal| self.rules_for(nonterminal))
            .collect()
    }

    fn display_order(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.goal.as_str())
            .chain(self.nonterminals.iter().map(String::as_str).filter(|nt| *nt != self.goal))
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.display_order()
            .map(|nonterminal| {
                let alternatives = self.rules_for(nonterminal)
                    .into_iter()
                    .map(|(_, rhs)| rhs.join(" "))
                    .join(&format!("\n   {} ", ALTERNATION));
                format!("{} {} {}", nonterminal, ARROW, alternatives)
            })
            .join("\n");
        write!(f, "{}", text)
    }
}
