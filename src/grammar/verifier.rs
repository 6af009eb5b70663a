use std::collections::HashMap;

use itertools::Itertools;

use super::symbol::is_nonterminal;
use super::{Alternative, GrammarErrorType, Rewrite, Symbol};

fn get_alternative_undefined_symbols(lhs: &str, alternative: &Alternative, rules: &HashMap<Symbol, Rewrite>) -> Vec<GrammarErrorType> {
    // Keep the nonterminals, then keep the ones nobody defined
    alternative.iter()
        .filter(|symbol| is_nonterminal(symbol))
        .filter(|symbol| !rules.contains_key(*symbol))
        .map(|symbol| GrammarErrorType::UndefinedNonterminal {
            symbol: symbol.clone(),
            used_by: lhs.to_string()
        })
        .collect()
}

fn get_rewrite_undefined_symbols(lhs: &str, rewrite: &Rewrite, rules: &HashMap<Symbol, Rewrite>) -> Vec<GrammarErrorType> {
    rewrite.iter()
        .flat_map(|alternative| get_alternative_undefined_symbols(lhs, alternative, rules))
        .collect()
}

// Every nonterminal used on a right hand side must have rules of its own.
// Errors come out ordered by the using rule so reports are stable.
pub fn get_undefined_symbols(rules: &HashMap<Symbol, Rewrite>) -> Vec<GrammarErrorType> {
    rules.iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .flat_map(|(lhs, rewrite)| get_rewrite_undefined_symbols(lhs, rewrite, rules))
        .dedup()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(alternatives: &[&[&str]]) -> Rewrite {
        alternatives.iter()
            .map(|alt| alt.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn no_undefined_symbols() {
        let mut rules = HashMap::new();
        rules.insert("S".to_string(), rule(&[&["A", "$"]]));
        rules.insert("A".to_string(), rule(&[&["a", "A"], &["lambda"]]));

        assert!(get_undefined_symbols(&rules).is_empty());
    }

    #[test]
    fn reports_each_using_rule() {
        let mut rules = HashMap::new();
        rules.insert("S".to_string(), rule(&[&["A", "B", "$"]]));
        rules.insert("A".to_string(), rule(&[&["a", "B"], &["B", "B"]]));

        assert_eq!(get_undefined_symbols(&rules), vec![
            GrammarErrorType::UndefinedNonterminal {
                symbol: "B".to_string(),
                used_by: "A".to_string()
            },
            GrammarErrorType::UndefinedNonterminal {
                symbol: "B".to_string(),
                used_by: "S".to_string()
            }
        ]);
    }
}
