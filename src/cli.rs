use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Section {
    /// Terminals, nonterminals, goal and rules
    Grammar,
    /// Which nonterminals derive lambda
    Nullable,
    /// FIRST set of every nonterminal
    First,
    /// FOLLOW set of every nonterminal
    Follow,
    /// PREDICT set of every rule
    Predict,
    /// Whether the grammar is LL(1), and why not
    Ll1,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Grammar,
        Section::Nullable,
        Section::First,
        Section::Follow,
        Section::Predict,
        Section::Ll1
    ];
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Report section to print, may be repeated (default: all)
    #[arg(short, long = "section", value_enum, value_name = "SECTION")]
    pub sections: Vec<Section>,

    /// Exit with failure if the grammar is not LL(1)
    #[arg(long)]
    pub strict: bool
}

impl Cli {
    pub fn sections(&self) -> &[Section] {
        if self.sections.is_empty() {
            &Section::ALL
        } else {
            &self.sections
        }
    }
}
