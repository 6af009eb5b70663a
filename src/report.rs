/*
    This module turns an analysis into the text the CLI prints
*/

use itertools::Itertools;

use crate::analysis::{Analysis, Result, SymbolSet};
use crate::cli::Section;

fn braced<'a>(symbols: impl IntoIterator<Item = &'a String>) -> String {
    format!("{{{}}}", symbols.into_iter().join(", "))
}

fn grammar_section(analysis: &Analysis) -> String {
    let grammar = analysis.grammar();
    format!(
        "Terminals: {}\nNonterminals: {}\nGoal = {}\nRules:\n{}\n",
        braced(grammar.terminals()),
        braced(grammar.nonterminals()),
        grammar.goal(),
        grammar
    )
}

fn nullable_section(analysis: &Analysis) -> String {
    let values = analysis.grammar()
        .nonterminals()
        .iter()
        .map(|nt| format!("  {} = {}\n", nt, analysis.derives_to_lambda(nt)));
    let warnings = analysis.cyclic_nullability()
        .into_iter()
        .map(|nt| format!("  warning: `{}` is not nullable, but a traversal that assumes its cycles vanish says it is\n", nt));

    format!("derives_to_lambda\n{}", values.chain(warnings).join(""))
}

fn set_section(analysis: &Analysis, title: &str, set_of: impl Fn(&str) -> Result<SymbolSet>) -> Result<String> {
    let lines: Vec<String> = analysis.grammar()
        .nonterminals()
        .iter()
        .map(|nt| -> Result<String> {
            Ok(format!("  {} = {}\n", nt, braced(&set_of(nt.as_str())?)))
        })
        .collect::<Result<_>>()?;
    Ok(format!("{}\n{}", title, lines.concat()))
}

fn predict_section(analysis: &Analysis) -> Result<String> {
    let lines: Vec<String> = analysis.grammar()
        .all_rules()
        .into_iter()
        .map(|rule| -> Result<String> {
            Ok(format!("  {} -> {} = {}\n", rule.0, rule.1.join(" "), braced(&analysis.predict_set(rule)?)))
        })
        .collect::<Result<_>>()?;
    Ok(format!("predict_set\n{}", lines.concat()))
}

fn ll1_section(analysis: &Analysis) -> String {
    let conflicts = analysis.conflicts();
    if conflicts.is_empty() {
        return "LL(1): yes\n".to_string();
    }
    format!("LL(1): no\n{}", conflicts.iter().map(|conflict| format!("  {}\n", conflict)).join(""))
}

// Renders each requested section once, in the order asked for, separated by
// blank lines
pub fn render(analysis: &Analysis, sections: &[Section]) -> Result<String> {
    let parts = sections.iter()
        .unique()
        .map(|section| match section {
            Section::Grammar => Ok(grammar_section(analysis)),
            Section::Nullable => Ok(nullable_section(analysis)),
            Section::First => set_section(analysis, "first_set", |nt| analysis.first_set(&[nt])),
            Section::Follow => set_section(analysis, "follow_set", |nt| analysis.follow_set(nt)),
            Section::Predict => predict_section(analysis),
            Section::Ll1 => Ok(ll1_section(analysis)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("\n"))
}
