use crate::grammar::symbol::{ALTERNATION, ARROW};

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    Arrow,
    Or,
    Symbol(String)
}

// Where the symbol at the start of `text` stops: whitespace, or the start of
// a `|` or `->` glued onto it
fn symbol_end(text: &str) -> usize {
    text.char_indices()
        .find(|&(i, c)| c.is_whitespace() || text[i..].starts_with(ALTERNATION) || text[i..].starts_with(ARROW))
        .map_or(text.len(), |(i, _)| i)
}

pub fn lex_symbol(text: &str) -> (Token, &str) {
    let end = symbol_end(text);
    (Token::Symbol(text[..end].to_string()), &text[end..])
}

pub fn lex_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(ARROW) {
            tokens.push(Token::Arrow);
            rest = after;
        } else if let Some(after) = rest.strip_prefix(ALTERNATION) {
            tokens.push(Token::Or);
            rest = after;
        } else {
            let (token, after) = lex_symbol(rest);
            tokens.push(token);
            rest = after;
        }
        rest = rest.trim_start();
    }

    tokens
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn sym(text: &str) -> Token {
        Token::Symbol(text.to_string())
    }

    #[test]
    fn lex_normal_symbol() {
        let lines = vec![
            "alpha bravo charlie",
            "Delta",
            "a|b",
            "A->b"
        ];
        // (result from the function, rest of the text)
        let answers = vec![
            (sym("alpha"), " bravo charlie"),
            (sym("Delta"), ""),
            (sym("a"), "|b"),
            (sym("A"), "->b")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            assert_eq!(lex_symbol(line), (answer_token, answer_rest));
        }
    }

    #[test]
    fn dash_without_arrow_stays_in_symbol() {
        assert_eq!(lex_symbol("semi-colon x"), (sym("semi-colon"), " x"));
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S -> A $",
            "A -> a A | lambda",
            "   | b",
            "E->T|E plus T"
        ];
        let answers = vec![
            vec![sym("S"), Token::Arrow, sym("A"), sym("$")],
            vec![
                sym("A"),
                Token::Arrow,
                sym("a"),
                sym("A"),
                Token::Or,
                sym("lambda")
            ],
            vec![Token::Or, sym("b")],
            vec![
                sym("E"),
                Token::Arrow,
                sym("T"),
                Token::Or,
                sym("E"),
                sym("plus"),
                sym("T")
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line), answer)
        }
    }

    #[test]
    fn lex_blank_line() {
        assert!(lex_line("").is_empty());
        assert!(lex_line(" \t ").is_empty());
    }
}
