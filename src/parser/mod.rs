/*
    This module reads grammar description files:

        S -> A $
        A -> a A
           | lambda
*/

mod lexer;

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error_handling::*;
use crate::grammar::symbol::*;
use crate::grammar::*;
use itertools::Itertools;
use lexer::*;

#[derive(Debug)]
pub enum ReadErrorType {
    // A line which should contain a rule does not
    MissingArrow,
    // A rule has more than one arrow
    UnexpectedArrow,
    // The rule starts with something other than a nonterminal
    MissingNonterminal,
    // A `|` line with no rule before it
    DanglingAlternative,
    // Nothing between two `|`, or after `->`
    EmptyAlternative,
    // `$` somewhere other than the end of an alternative
    MisplacedEndMarker,
    // `lambda` sharing an alternative with other symbols
    MisplacedLambda,
    // The rules were well formed but do not make a valid grammar
    Grammar(GrammarErrorType),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for ReadErrorType {}

impl PartialEq for ReadErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ReadErrorType::FileError(a), ReadErrorType::FileError(b)) => a.kind() == b.kind(),
            (ReadErrorType::Grammar(a), ReadErrorType::Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other)
        }
    }
}

impl Display for ReadErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadErrorType::MissingArrow => write!(f, "Expected `{}` after nonterminal", ARROW),
            ReadErrorType::UnexpectedArrow => write!(f, "Unexpected `{}` encountered", ARROW),
            ReadErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            ReadErrorType::DanglingAlternative => write!(f, "`{}` continues a rule, but no rule came before it", ALTERNATION),
            ReadErrorType::EmptyAlternative => write!(f, "Empty alternative (write `{}` for an empty production)", LAMBDA),
            ReadErrorType::MisplacedEndMarker => write!(f, "`{}` may only end an alternative", END),
            ReadErrorType::MisplacedLambda => write!(f, "`{}` must be the only symbol in its alternative", LAMBDA),
            ReadErrorType::Grammar(e) => write!(f, "{}", e),
            ReadErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type ReadError = Error<ReadErrorType>;
pub type ReadErrors = Errors<ReadErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> ReadError {
    ReadError {
        location: Location::whole_file(file),
        error: ReadErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, ReadErrorType>;
pub type LineResult<T> = std::result::Result<T, ReadError>;
pub type FileResult<T> = std::result::Result<T, ReadErrors>;

// One physical line: either the head of a rule or more alternatives for it
#[derive(PartialEq, Debug)]
enum Line {
    Head { symbol: String, rewrite: Rewrite },
    Continuation(Rewrite)
}

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Rewrite,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    let symbols: Alternative = tokens.iter().map(|t| match t {
        Token::Arrow => Err(ReadErrorType::UnexpectedArrow),
        Token::Or => Err(ReadErrorType::EmptyAlternative),
        Token::Symbol(s) => Ok(s.clone())
    }).collect::<Result<_>>()?;

    if symbols.is_empty() {
        return Err(ReadErrorType::EmptyAlternative);
    }
    if symbols.len() > 1 && symbols.iter().any(|s| is_lambda(s)) {
        return Err(ReadErrorType::MisplacedLambda);
    }
    if symbols[..symbols.len() - 1].iter().any(|s| is_end_marker(s)) {
        return Err(ReadErrorType::MisplacedEndMarker);
    }

    Ok(symbols)
}

fn parse_rewrite(tokens: &[Token]) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token]) -> Result<Line> {
    let symbol = match tokens.first() {
        Some(Token::Or) => return Ok(Line::Continuation(parse_rewrite(&tokens[1..])?)),
        Some(Token::Symbol(s)) if is_nonterminal(s) => s.clone(),
        _ => return Err(ReadErrorType::MissingNonterminal)
    };

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(ReadErrorType::MissingArrow);
    }

    let rewrite = parse_rewrite(&tokens[2..])?;
    Ok(Line::Head { symbol, rewrite })
}

fn parse_lex_line(line: &str, location: &Location) -> LineResult<Line> {
    parse_line(&lex_line(line))
        .map_err(|error| ReadError { location: location.clone(), error })
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with('#')
}

// Drops the lines that hold no rule text, keeping 1-based line numbers
fn rule_lines(lines: impl Iterator<Item = LineResult<String>>) -> impl Iterator<Item = (usize, LineResult<String>)> {
    lines
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

// Glues continuation lines onto the rule they continue
fn collect_rules(lines: Vec<(Location, Line)>) -> FileResult<Vec<Rule>> {
    let mut rules: Vec<Rule> = Vec::new();
    let mut errors = Vec::new();

    for (location, line) in lines {
        match line {
            Line::Head { symbol, rewrite } => rules.push(Rule { symbol, rewrite, location }),
            Line::Continuation(rewrite) => match rules.last_mut() {
                Some(rule) => rule.rewrite.extend(rewrite),
                None => errors.push(ReadError { location, error: ReadErrorType::DanglingAlternative })
            }
        }
    }

    if errors.is_empty() {
        Ok(rules)
    } else {
        Err(errors)
    }
}

fn grammar_from_rules(rules: Vec<Rule>, path: &Path) -> FileResult<Grammar> {
    let mut builder = GrammarBuilder::new();
    let mut errors = Vec::new();

    // Where each nonterminal was first defined, to place build errors
    let mut defined_at = HashMap::<String, Location>::new();

    for rule in rules {
        defined_at.entry(rule.symbol.clone()).or_insert_with(|| rule.location.clone());
        if let Err(error) = builder.add_rule(&rule.symbol, rule.rewrite) {
            errors.push(ReadError { location: rule.location, error: ReadErrorType::Grammar(error) });
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    builder.build().map_err(|build_errors| {
        build_errors.into_iter()
            .map(|error| {
                let location = match &error {
                    GrammarErrorType::UndefinedNonterminal { used_by, .. } => defined_at.get(used_by).cloned(),
                    _ => None
                };
                ReadError {
                    location: location.unwrap_or_else(|| Location::whole_file(path.to_path_buf())),
                    error: ReadErrorType::Grammar(error)
                }
            })
            .collect_vec()
    })
}

fn parse_lines(lines: impl Iterator<Item = LineResult<String>>, path: &Path) -> FileResult<Grammar> {
    let parsed_lines = rule_lines(lines).map(|(num, line_res)| {
        let location = Location { file: path.to_path_buf(), line: num };
        line_res
            .and_then(|line| parse_lex_line(&line, &location))
            .map(|line| (location, line))
    });

    let (lines, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    let rules = collect_rules(lines)?;
    grammar_from_rules(rules, path)
}

pub fn parse_str(text: &str, path: &Path) -> FileResult<Grammar> {
    parse_lines(text.lines().map(|line| Ok(line.to_string())), path)
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    let lines = std::io::BufReader::new(file)
        .lines()
        .map(|line| line.map_err(|e| io_error(e, path.to_path_buf())));

    parse_lines(lines, path)
}
