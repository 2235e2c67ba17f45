use crate::parser::tree::{NodeId, NodeKind, SyntaxTree};

/// Node predicate used by [`expect_sequence`].
pub type NodePredicate<'p> = &'p dyn Fn(&SyntaxTree, NodeId) -> bool;

/// Drop whitespace and separator punctuation from one level of nodes.
///
/// Order-preserving. Every structural check in the extractors assumes its
/// input went through this filter first: it removes the enclosing parens of a
/// group's child list, argument commas, and a trailing semicolon alike.
pub fn clean(tree: &SyntaxTree, nodes: &[NodeId]) -> Vec<NodeId> {
    nodes
        .iter()
        .copied()
        .filter(|&node| !tree.is_whitespace(node) && !tree.is_punctuation(node))
        .collect()
}

/// Collect every function-call node under `node`, depth-first.
///
/// Stops at function nodes without descending into their arguments: the
/// argument list of a `layer.predict(...)` call contains ordinary column
/// identifiers that must not be mistaken for outer statement structure.
pub fn find_functions(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    match tree.kind(node) {
        NodeKind::Function => vec![node],
        NodeKind::Statement
        | NodeKind::Parenthesis
        | NodeKind::Identifier
        | NodeKind::IdentifierList => tree
            .children(node)
            .iter()
            .flat_map(|&child| find_functions(tree, child))
            .collect(),
        _ => Vec::new(),
    }
}

/// Match a forward-scanning predicate sequence against `tokens`.
///
/// Each predicate matches the first qualifying token at or after the previous
/// match; the returned slice starts at the token matching the last predicate,
/// so `result[0]` is that token and `result[1..]` is everything after it.
pub fn expect_sequence<'a>(
    tree: &SyntaxTree,
    tokens: &'a [NodeId],
    predicates: &[NodePredicate<'_>],
) -> Option<&'a [NodeId]> {
    let Some((first, rest)) = predicates.split_first() else {
        return Some(tokens);
    };
    let index = tokens.iter().position(|&token| first(tree, token))?;
    expect_sequence(tree, &tokens[index..], rest)
}

/// Cleaned argument nodes of a function call.
pub fn function_arguments(tree: &SyntaxTree, call: NodeId) -> Vec<NodeId> {
    tree.children(call)
        .iter()
        .copied()
        .find(|&child| tree.is_parenthesis(child))
        .map(|paren| clean(tree, tree.children(paren)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_whitespace_and_separators() {
        let tree = SyntaxTree::parse("( * , 'x' ) ;").unwrap();
        let top = clean(&tree, tree.children(tree.root()));
        assert_eq!(top.len(), 1);
        assert!(tree.is_parenthesis(top[0]));
        let inner = clean(&tree, tree.children(top[0]));
        let texts: Vec<String> = inner.iter().map(|&n| tree.text(n)).collect();
        assert_eq!(texts, vec!["*", "'x'"]);
    }

    #[test]
    fn find_functions_does_not_descend_into_call_arguments() {
        let tree = SyntaxTree::parse("select outer_fn(inner_fn(x)) from t").unwrap();
        let found = find_functions(&tree, tree.root());
        assert_eq!(found.len(), 1);
        assert_eq!(tree.function_name(found[0]).as_deref(), Some("outer_fn"));
    }

    #[test]
    fn find_functions_collects_calls_in_source_order() {
        let tree = SyntaxTree::parse("select first_fn(a), second_fn(b) from t").unwrap();
        let names: Vec<String> = find_functions(&tree, tree.root())
            .into_iter()
            .filter_map(|f| tree.function_name(f))
            .collect();
        assert_eq!(names, vec!["first_fn", "second_fn"]);
    }

    #[test]
    fn expect_sequence_returns_the_tail_from_the_last_match() {
        let tree = SyntaxTree::parse("select a from b where c").unwrap();
        let tokens = clean(&tree, tree.children(tree.root()));
        let tail = expect_sequence(
            &tree,
            &tokens,
            &[&|t, n| t.is_keyword(n, "from"), &|t, n| t.is_identifier(n)],
        )
        .unwrap();
        assert_eq!(tree.text(tail[0]), "b");
        assert!(tree.is_keyword(tail[1], "where"));
    }

    #[test]
    fn expect_sequence_fails_when_a_predicate_never_matches() {
        let tree = SyntaxTree::parse("select a").unwrap();
        let tokens = clean(&tree, tree.children(tree.root()));
        let result = expect_sequence(&tree, &tokens, &[&|t, n| t.is_keyword(n, "from")]);
        assert!(result.is_none());
    }

    #[test]
    fn function_arguments_are_cleaned() {
        let tree = SyntaxTree::parse(r#"layer.predict("m", ARRAY[c1], extra)"#).unwrap();
        let call = find_functions(&tree, tree.root())[0];
        let args = function_arguments(&tree, call);
        let texts: Vec<String> = args.iter().map(|&n| tree.text(n)).collect();
        assert_eq!(texts, vec![r#""m""#, "ARRAY", "[c1]", "extra"]);
    }
}
