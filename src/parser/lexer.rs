use sqlparser::dialect::BigQueryDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

use crate::error::ParseError;

/// Structural keywords this parser understands.
///
/// Anything else lexed as a word stays a plain name, so column names that
/// collide with SQL keywords elsewhere (`target`, `name`, ...) pass through
/// untouched.
const KEYWORDS: &[&str] = &[
    "CREATE", "OR", "REPLACE", "TABLE", "AS", "SELECT", "FROM", "WHERE", "ORDER", "GROUP", "BY",
    "HAVING", "LIMIT", "OFFSET", "ARRAY", "AND", "NOT", "IN", "IS", "NULL", "BETWEEN", "LIKE",
    "ASC", "DESC", "DISTINCT", "JOIN", "ON", "UNION", "ALL",
];

/// One lexed token, carrying its source text verbatim (including identifier
/// quoting), with no position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafToken {
    /// Structural keyword, original casing preserved.
    Keyword(String),
    /// Identifier part; quoted identifiers keep their quote characters.
    Name(String),
    /// String or number literal, string quotes preserved.
    Literal(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `.`
    Period,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `*`
    Wildcard,
    /// A single whitespace character run; `newline` marks line breaks.
    Whitespace {
        /// The whitespace text itself.
        text: String,
        /// Whether this token is a line break.
        newline: bool,
    },
    /// Any other operator or punctuation, reproduced verbatim.
    Symbol(String),
}

impl LeafToken {
    /// Source text of this token.
    pub fn text(&self) -> &str {
        match self {
            LeafToken::Keyword(text)
            | LeafToken::Name(text)
            | LeafToken::Literal(text)
            | LeafToken::Symbol(text)
            | LeafToken::Whitespace { text, .. } => text,
            LeafToken::LParen => "(",
            LeafToken::RParen => ")",
            LeafToken::LBracket => "[",
            LeafToken::RBracket => "]",
            LeafToken::Period => ".",
            LeafToken::Comma => ",",
            LeafToken::Semicolon => ";",
            LeafToken::Wildcard => "*",
        }
    }
}

/// Lex a SQL string into leaf tokens.
///
/// The BigQuery dialect gives backtick-quoted identifiers and double-quoted
/// string literals, matching the statements the dbt adapters render.
pub fn lex(sql: &str) -> Result<Vec<LeafToken>, ParseError> {
    let dialect = BigQueryDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| ParseError::InvalidSqlSyntax(e.to_string()))?;
    Ok(tokens.iter().map(convert).collect())
}

fn convert(token: &Token) -> LeafToken {
    match token {
        Token::Word(word) => {
            let text = word.to_string();
            if word.quote_style.is_none() && is_structural_keyword(&word.value) {
                LeafToken::Keyword(text)
            } else {
                LeafToken::Name(text)
            }
        }
        Token::Whitespace(ws) => LeafToken::Whitespace {
            text: ws.to_string(),
            newline: matches!(ws, Whitespace::Newline),
        },
        Token::LParen => LeafToken::LParen,
        Token::RParen => LeafToken::RParen,
        Token::LBracket => LeafToken::LBracket,
        Token::RBracket => LeafToken::RBracket,
        Token::Period => LeafToken::Period,
        Token::Comma => LeafToken::Comma,
        Token::SemiColon => LeafToken::Semicolon,
        Token::Mul => LeafToken::Wildcard,
        Token::Number(..) | Token::SingleQuotedString(_) | Token::DoubleQuotedString(_) => {
            LeafToken::Literal(token.to_string())
        }
        other => LeafToken::Symbol(other.to_string()),
    }
}

fn is_structural_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word.to_ascii_uppercase().as_str())
}

/// Return the text without one pair of surrounding quotes (`'`, `"` or `` ` ``).
pub fn unquote(text: &str) -> &str {
    let trimmed = text.trim();
    ['\'', '"', '`']
        .iter()
        .find_map(|&quote| {
            trimmed
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_keywords_and_plain_names_are_distinguished() {
        let tokens = lex("select target from customers").unwrap();
        let significant: Vec<&LeafToken> = tokens
            .iter()
            .filter(|t| !matches!(t, LeafToken::Whitespace { .. }))
            .collect();
        assert_eq!(significant[0], &LeafToken::Keyword("select".to_string()));
        assert_eq!(significant[1], &LeafToken::Name("target".to_string()));
        assert_eq!(significant[2], &LeafToken::Keyword("from".to_string()));
        assert_eq!(significant[3], &LeafToken::Name("customers".to_string()));
    }

    #[test]
    fn quoted_identifiers_keep_their_backticks() {
        let tokens = lex("`layer-bigquery`.`titanic`").unwrap();
        assert_eq!(tokens[0].text(), "`layer-bigquery`");
        assert_eq!(tokens[1], LeafToken::Period);
        assert_eq!(tokens[2].text(), "`titanic`");
    }

    #[test]
    fn double_quoted_text_lexes_as_a_literal() {
        let tokens = lex(r#""models/buy_it_again:latest""#).unwrap();
        assert_eq!(
            tokens[0],
            LeafToken::Literal(r#""models/buy_it_again:latest""#.to_string())
        );
    }

    #[test]
    fn unquote_strips_matching_pairs_only() {
        assert_eq!(unquote(r#""m:latest""#), "m:latest");
        assert_eq!(unquote("'classifier'"), "classifier");
        assert_eq!(unquote("`a`"), "a");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
    }
}
