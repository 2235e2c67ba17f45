use crate::error::ParseError;
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::{clean, expect_sequence};

/// The re-parsed `SELECT ...` fragment enclosing a layer call.
///
/// Extractors never pattern-match the outer statement's nesting directly:
/// the enclosing parenthesis group is re-serialized and tokenized again as a
/// standalone statement, and all `SELECT`/`FROM` shape checks run against
/// that second pass. The host grammar is ambiguous at this fragment level,
/// so the isolated re-parse is what guarantees the expected shape.
pub struct SelectFragment {
    tree: SyntaxTree,
    tokens: Vec<NodeId>,
}

impl SelectFragment {
    /// Climb from the layer call to its parenthesis ancestor and re-parse
    /// that group's cleaned text as a fresh statement.
    pub fn resolve(tree: &SyntaxTree, call: NodeId) -> Result<Self, ParseError> {
        let paren = tree
            .find_ancestor(call, |t, n| t.is_parenthesis(n))
            .ok_or_else(|| {
                ParseError::InvalidSqlSyntax(
                    "layer call is not inside a parenthesized select".to_string(),
                )
            })?;
        let cleaned = clean(tree, tree.children(paren));
        let text = cleaned
            .iter()
            .map(|&node| tree.text(node))
            .collect::<Vec<_>>()
            .join(" ");
        Self::from_sql(&text)
    }

    /// Parse a statement text into a fragment, keeping its whitespace-free
    /// top-level tokens.
    pub fn from_sql(sql: &str) -> Result<Self, ParseError> {
        let tree = SyntaxTree::parse(sql)?;
        let tokens = tree
            .children(tree.root())
            .iter()
            .copied()
            .filter(|&node| !tree.is_whitespace(node))
            .collect();
        Ok(SelectFragment { tree, tokens })
    }

    /// The fragment's own tree.
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Whitespace-free top-level tokens of the fragment.
    pub fn tokens(&self) -> &[NodeId] {
        &self.tokens
    }

    /// `(source, trailing)` from the fragment's `FROM <identifier>` clause.
    ///
    /// `source` is the identifier's unaliased text; `trailing` is the
    /// space-joined text of everything after it (`WHERE`/`ORDER BY`/`LIMIT`
    /// verbatim).
    pub fn from_where(&self) -> Result<(String, String), ParseError> {
        let tail = expect_sequence(
            &self.tree,
            &self.tokens,
            &[
                &|t, n| t.is_keyword(n, "from"),
                &|t, n| t.is_identifier(n),
            ],
        )
        .ok_or(ParseError::MissingFromClause)?;
        let source = self.tree.unaliased_text(tail[0]);
        let trailing = tail[1..]
            .iter()
            .map(|&node| self.tree.text(node))
            .collect::<Vec<_>>()
            .join(" ");
        Ok((source, trailing))
    }

    /// First identifier list at the fragment's top level, i.e. the outer
    /// `SELECT` column list.
    pub fn select_list(&self) -> Option<NodeId> {
        self.tokens
            .iter()
            .copied()
            .find(|&node| self.tree.is_identifier_list(node))
    }
}
