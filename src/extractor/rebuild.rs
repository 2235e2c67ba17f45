use crate::error::ParseError;
use crate::parser::lexer::{lex, LeafToken};

/// Emit `select <columns> from <source>` plus the trailing clause verbatim.
pub fn build_sql(columns: &[String], source: &str, trailing: &str) -> String {
    let column_list = columns.join(", ");
    if trailing.is_empty() {
        format!("select {column_list} from {source}")
    } else {
        format!("select {column_list} from {source} {trailing}")
    }
}

/// Normalize a statement: keywords lower-cased, whitespace runs collapsed to
/// single spaces, leading/trailing whitespace dropped.
///
/// Spacing follows the input otherwise, so `c1, c2` keeps its comma tight to
/// the column and quoted identifiers stay glued to their dots.
pub fn format_sql(sql: &str) -> Result<String, ParseError> {
    let tokens = lex(sql)?;
    let mut out = String::new();
    let mut pending_space = false;
    for token in &tokens {
        if matches!(token, LeafToken::Whitespace { .. }) {
            if !out.is_empty() {
                pending_space = true;
            }
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match token {
            LeafToken::Keyword(text) => out.push_str(&text.to_ascii_lowercase()),
            other => out.push_str(other.text()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn build_sql_without_trailing_clause() {
        assert_eq!(
            build_sql(&cols(&["c1", "c2"]), "s", ""),
            "select c1, c2 from s"
        );
    }

    #[test]
    fn build_sql_appends_trailing_clause_verbatim() {
        assert_eq!(
            build_sql(&cols(&["c1"]), "s", "where c1 > 10"),
            "select c1 from s where c1 > 10"
        );
    }

    #[test]
    fn format_sql_lowercases_keywords_and_collapses_whitespace() {
        assert_eq!(
            format_sql("SELECT  c1,   c2\n FROM   s   WHERE c1 >  10").unwrap(),
            "select c1, c2 from s where c1 > 10"
        );
    }

    #[test]
    fn format_sql_preserves_identifier_case_and_quoting() {
        assert_eq!(
            format_sql("select Customer_Id from `a`.`b`").unwrap(),
            "select Customer_Id from `a`.`b`"
        );
    }

    #[test]
    fn format_sql_trims_outer_whitespace() {
        assert_eq!(format_sql("  select c1 from s  ").unwrap(), "select c1 from s");
    }
}
