/*
    Lexical classification of grammar symbols. A token's class depends only
    on its text, so any stage can reclassify an arbitrary token.
*/

pub const ARROW: &str = "->";
pub const ALTERNATION: &str = "|";
pub const END: &str = "$";
pub const LAMBDA: &str = "lambda";

// Lowercase text, the same way `str.islower` would see it: at least one cased
// character and none of them uppercase
fn is_lowercase_text(sym: &str) -> bool {
    sym.chars().any(char::is_lowercase) && !sym.chars().any(char::is_uppercase)
}

pub fn is_terminal(sym: &str) -> bool {
    sym != LAMBDA && is_lowercase_text(sym)
}

pub fn is_nonterminal(sym: &str) -> bool {
    !sym.is_empty() && !is_terminal(sym) && !is_end_marker(sym) && !is_lambda(sym)
}

pub fn is_end_marker(sym: &str) -> bool {
    sym == END
}

pub fn is_lambda(sym: &str) -> bool {
    sym == LAMBDA
}

// True iff the alternative's last symbol is the end marker
pub fn is_end<S: AsRef<str>>(rhs: &[S]) -> bool {
    rhs.last().is_some_and(|sym| is_end_marker(sym.as_ref()))
}

// Symbols that may appear in a lookahead set
pub fn is_augmented_terminal(sym: &str) -> bool {
    is_terminal(sym) || is_end_marker(sym)
}

// An alternative that derives nothing at all
pub fn is_lambda_rhs<S: AsRef<str>>(rhs: &[S]) -> bool {
    rhs.len() == 1 && is_lambda(rhs[0].as_ref())
}
