// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! FQL syntax classification for display.
//!
//! The lexer is purely lexical: it never validates FQL, it only splits a line into segments that
//! a renderer can colour. Concatenating the `text` of every returned [`Token`] reproduces the input
//! line exactly, so the output can always be drawn in place of the raw source.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

pub const KEYWORDS: &[&str] = &[
    "CREATE", "GET", "SET", "SELECT", "JOURNAL", "ACCOUNT", "RATE", "BALANCE", "DEBIT", "CREDIT",
    "FOR", "WHERE", "AND", "OR", "NOT", "IS", "AS", "CASE", "WHEN", "THEN", "ELSE", "END", "WITH",
    "IN", "EXISTS", "DELETE", "RETURN", "ID", "LABEL", "ACCRUE", "FROM", "TO", "BY", "INTO",
    "COMPOUND", "DAILY", "MONTHLY",
];

pub const TYPE_NAMES: &[&str] = &["ASSET", "LIABILITY", "INCOME", "EXPENSE", "EQUITY"];

pub const BOOLEANS: &[&str] = &["TRUE", "FALSE", "NULL"];

pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "balance",
    "statement",
    "trial_balance",
    "income_statement",
    "account_count",
    "convert",
    "fx_rate",
    "round",
    "abs",
    "min",
    "max",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Keyword,
    TypeName,
    Account,
    String,
    Number,
    Date,
    Operator,
    Comment,
    Function,
    Parameter,
    Punctuation,
    Boolean,
    Plain,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::TypeName => "type",
            Self::Account => "account",
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Operator => "operator",
            Self::Comment => "comment",
            Self::Function => "function",
            Self::Parameter => "parameter",
            Self::Punctuation => "punctuation",
            Self::Boolean => "boolean",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of a source line.
///
/// `kind` is `None` for whitespace and for characters no rule recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: Option<TokenKind>,
}

impl<'a> Token<'a> {
    fn new(text: &'a str, kind: Option<TokenKind>) -> Self {
        Self { text, kind }
    }
}

#[derive(Debug, Clone, Copy)]
enum RuleKind {
    Fixed(TokenKind),
    Word,
}

struct Rule {
    re: Regex,
    kind: RuleKind,
}

// Order matters: the first rule that matches at the cursor wins.
const RULE_PATTERNS: &[(&str, RuleKind)] = &[
    (r"^--(?:[^@].*)?$", RuleKind::Fixed(TokenKind::Comment)),
    (r"^'(?:[^']|'')*'?", RuleKind::Fixed(TokenKind::String)),
    (r#"^"(?:[^"\\]|\\.)*"?"#, RuleKind::Fixed(TokenKind::String)),
    (r"^@[A-Za-z_][A-Za-z0-9_]*", RuleKind::Fixed(TokenKind::Account)),
    (r"^\$[A-Za-z_][A-Za-z0-9_]*", RuleKind::Fixed(TokenKind::Parameter)),
    (r"^\d{4}-\d{2}-\d{2}", RuleKind::Fixed(TokenKind::Date)),
    (r"^\d+(?:\.\d+)?%", RuleKind::Fixed(TokenKind::Number)),
    (r"^\d+\.\d+", RuleKind::Fixed(TokenKind::Number)),
    (r"^\d+", RuleKind::Fixed(TokenKind::Number)),
    (r"^(?:<=|>=|<>|!=)", RuleKind::Fixed(TokenKind::Operator)),
    (r"^[=<>+\-*/%^|]", RuleKind::Fixed(TokenKind::Operator)),
    (r"^[;,.()\[\]:]", RuleKind::Fixed(TokenKind::Punctuation)),
    (r"^[A-Za-z_][A-Za-z0-9_]*", RuleKind::Word),
];

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        RULE_PATTERNS
            .iter()
            .map(|(pattern, kind)| Rule {
                re: Regex::new(pattern).expect("valid highlight pattern"),
                kind: *kind,
            })
            .collect()
    })
}

type WordPredicate = fn(word: &str, rest: &str) -> bool;

// Identifier reclassification, tried top to bottom. `rest` is the line after the word.
const WORD_CLASSES: &[(WordPredicate, TokenKind)] = &[
    (is_builtin_function, TokenKind::Function),
    (is_call_site, TokenKind::Function),
    (is_keyword, TokenKind::Keyword),
    (is_type_name, TokenKind::TypeName),
    (is_boolean, TokenKind::Boolean),
];

fn is_builtin_function(word: &str, _rest: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&word)
}

fn is_call_site(word: &str, rest: &str) -> bool {
    word.starts_with(|ch: char| ch.is_ascii_lowercase()) && rest.trim_start().starts_with('(')
}

fn matches_any(table: &[&str], word: &str) -> bool {
    table.iter().any(|candidate| candidate.eq_ignore_ascii_case(word))
}

fn is_keyword(word: &str, _rest: &str) -> bool {
    matches_any(KEYWORDS, word)
}

fn is_type_name(word: &str, _rest: &str) -> bool {
    matches_any(TYPE_NAMES, word)
}

fn is_boolean(word: &str, _rest: &str) -> bool {
    matches_any(BOOLEANS, word)
}

fn classify_word(word: &str, rest: &str) -> TokenKind {
    WORD_CLASSES
        .iter()
        .find(|(predicate, _)| predicate(word, rest))
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenKind::Plain)
}

/// Splits one line of FQL into classified segments.
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];

        let ws_len = rest.len() - rest.trim_start().len();
        if ws_len > 0 {
            tokens.push(Token::new(&rest[..ws_len], None));
            pos += ws_len;
            continue;
        }

        let matched = rules().iter().find_map(|rule| {
            rule.re
                .find(rest)
                .filter(|m| !m.is_empty())
                .map(|m| (m.end(), rule.kind))
        });

        let len = match matched {
            Some((len, RuleKind::Fixed(kind))) => {
                tokens.push(Token::new(&rest[..len], Some(kind)));
                len
            }
            Some((len, RuleKind::Word)) => {
                let kind = classify_word(&rest[..len], &rest[len..]);
                tokens.push(Token::new(&rest[..len], Some(kind)));
                len
            }
            None => {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                tokens.push(Token::new(&rest[..len], None));
                len
            }
        };
        pos += len;
    }

    tokens
}

/// Tokenizes every line of `source` independently.
///
/// Lines are split on `\n`, so a trailing newline yields a final empty line.
pub fn tokenize_block(source: &str) -> Vec<Vec<Token<'_>>> {
    source.split('\n').map(|line| tokenize_line(line.strip_suffix('\r').unwrap_or(line))).collect()
}
