use crate::error::ParseError;
use crate::parser::lexer::{lex, unquote, LeafToken};

/// Index of a node in a [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// The closed set of node kinds the parser understands.
///
/// Group nodes own children; everything else is a [`LeafToken`] leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Top-level statement.
    Statement,
    /// `( ... )` group, opening and closing parens included as children.
    Parenthesis,
    /// `[ ... ]` group, brackets included as children.
    Brackets,
    /// Function call: a name leaf followed by its argument parenthesis.
    Function,
    /// Possibly dotted, possibly aliased identifier. A dotted call such as
    /// `layer.predict(...)` keeps the [`NodeKind::Function`] as its last
    /// part, which is how layer calls are recognized by their parent.
    Identifier,
    /// Comma-separated run of identifiers, separators included as children.
    IdentifierList,
    /// A single lexed token.
    Leaf(LeafToken),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena syntax tree over one SQL statement.
///
/// Nodes carry parent indices instead of back-pointers, so climbing from a
/// located call to its enclosing parenthesis is an index walk.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// Lex and group a SQL string into a statement tree.
    pub fn parse(sql: &str) -> Result<Self, ParseError> {
        Ok(Self::build(lex(sql)?))
    }

    fn build(tokens: Vec<LeafToken>) -> Self {
        let mut tree = SyntaxTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = tree.new_node(NodeKind::Statement);
        tree.root = root;
        let mut builder = TreeBuilder {
            tree,
            tokens,
            pos: 0,
        };
        builder.parse_sequence(root, None);
        builder.tree
    }

    /// The statement node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node, empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Source text of a node: the leaf text, or the concatenation of all
    /// descendant leaf texts in order.
    pub fn text(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Leaf(token) => token.text().to_string(),
            _ => self
                .children(id)
                .iter()
                .map(|&child| self.text(child))
                .collect(),
        }
    }

    /// Depth-first leaves under a node.
    pub fn flatten(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Leaf(_) => vec![id],
            _ => self
                .children(id)
                .iter()
                .flat_map(|&child| self.flatten(child))
                .collect(),
        }
    }

    /// True for any group node.
    pub fn is_group(&self, id: NodeId) -> bool {
        !matches!(self.kind(id), NodeKind::Leaf(_))
    }

    /// True for identifier groups.
    pub fn is_identifier(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Identifier)
    }

    /// True for comma-list groups.
    pub fn is_identifier_list(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::IdentifierList)
    }

    /// True for function-call groups.
    pub fn is_function(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Function)
    }

    /// True for `( ... )` groups.
    pub fn is_parenthesis(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Parenthesis)
    }

    /// True for `[ ... ]` groups.
    pub fn is_brackets(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Brackets)
    }

    /// True for name leaves (plain or quoted identifiers).
    pub fn is_name(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Leaf(LeafToken::Name(_)))
    }

    /// True for the `*` leaf.
    pub fn is_wildcard(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Leaf(LeafToken::Wildcard))
    }

    /// True for whitespace leaves.
    pub fn is_whitespace(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Leaf(LeafToken::Whitespace { .. }))
    }

    /// True for line-break leaves.
    pub fn is_newline(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Leaf(LeafToken::Whitespace { newline: true, .. })
        )
    }

    /// True for separator punctuation leaves: parens, brackets, comma,
    /// period, and semicolon.
    pub fn is_punctuation(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Leaf(
                LeafToken::LParen
                    | LeafToken::RParen
                    | LeafToken::LBracket
                    | LeafToken::RBracket
                    | LeafToken::Comma
                    | LeafToken::Period
                    | LeafToken::Semicolon
            )
        )
    }

    /// True when the node is the given keyword, case-insensitively.
    pub fn is_keyword(&self, id: NodeId, keyword: &str) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Leaf(LeafToken::Keyword(text)) if text.eq_ignore_ascii_case(keyword)
        )
    }

    /// Name of a function-call node.
    pub fn function_name(&self, id: NodeId) -> Option<String> {
        if !self.is_function(id) {
            return None;
        }
        self.children(id).first().map(|&name| self.text(name))
    }

    /// Alias of an identifier group: the name leaf after its `AS` keyword,
    /// unquoted.
    pub fn alias(&self, id: NodeId) -> Option<String> {
        let children = self.children(id);
        let as_pos = children.iter().position(|&c| self.is_keyword(c, "as"))?;
        children[as_pos + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_name(c))
            .map(|c| unquote(&self.text(c)).to_string())
    }

    /// Text of an identifier group up to its first internal whitespace, so a
    /// `FROM x AS y` source yields `x` without the alias.
    pub fn unaliased_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            if self.is_whitespace(child) {
                break;
            }
            out.push_str(&self.text(child));
        }
        if out.is_empty() {
            self.text(id)
        } else {
            out
        }
    }

    /// Children of a list or container node minus whitespace and punctuation.
    pub fn list_items(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| !self.is_whitespace(c) && !self.is_punctuation(c))
            .collect()
    }

    /// Nearest ancestor satisfying the predicate.
    pub fn find_ancestor<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&SyntaxTree, NodeId) -> bool,
    {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if predicate(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    fn new_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        self.nodes[parent.0].children = children;
    }
}

enum Step {
    Paren,
    Bracket,
    Ident,
    Leaf,
}

struct TreeBuilder {
    tree: SyntaxTree,
    tokens: Vec<LeafToken>,
    pos: usize,
}

impl TreeBuilder {
    fn peek(&self) -> Option<&LeafToken> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&LeafToken> {
        self.tokens.get(self.pos + offset)
    }

    fn consume_leaf(&mut self) -> NodeId {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        self.tree.new_node(NodeKind::Leaf(token))
    }

    fn parse_sequence(&mut self, parent: NodeId, stop: Option<&LeafToken>) {
        loop {
            let step = {
                let Some(token) = self.peek() else { break };
                if stop == Some(token) {
                    break;
                }
                match token {
                    LeafToken::LParen => Step::Paren,
                    LeafToken::LBracket => Step::Bracket,
                    LeafToken::Name(_) => Step::Ident,
                    _ => Step::Leaf,
                }
            };
            let node = match step {
                Step::Paren => self.parse_group(NodeKind::Parenthesis, &LeafToken::RParen),
                Step::Bracket => self.parse_group(NodeKind::Brackets, &LeafToken::RBracket),
                Step::Ident => self.parse_identifier(),
                Step::Leaf => self.consume_leaf(),
            };
            self.tree.attach(parent, node);
        }
        self.group_identifier_lists(parent);
    }

    /// Consume an opening delimiter, the enclosed sequence, and the matching
    /// closer. An unterminated group simply ends at the end of input.
    fn parse_group(&mut self, kind: NodeKind, close: &LeafToken) -> NodeId {
        let group = self.tree.new_node(kind);
        let opener = self.consume_leaf();
        self.tree.attach(group, opener);
        self.parse_sequence(group, Some(close));
        if self.peek() == Some(close) {
            let closer = self.consume_leaf();
            self.tree.attach(group, closer);
        }
        group
    }

    /// Consume a dotted name chain, turning a trailing `name(` into a
    /// function call and absorbing an `AS <alias>` suffix when present.
    ///
    /// A bare single-part call (`OPTIONS()`) stays a plain function node; a
    /// dotted call gets an identifier wrapper whose first part names the
    /// namespace, which is what the layer-call classifier keys on.
    fn parse_identifier(&mut self) -> NodeId {
        let mut parts = vec![self.consume_leaf()];
        while matches!(self.peek(), Some(LeafToken::Period))
            && matches!(self.peek_at(1), Some(LeafToken::Name(_)))
        {
            parts.push(self.consume_leaf());
            parts.push(self.consume_leaf());
        }

        let mut is_function = false;
        if matches!(self.peek(), Some(LeafToken::LParen)) {
            if let Some(name) = parts.pop() {
                let function = self.tree.new_node(NodeKind::Function);
                self.tree.attach(function, name);
                let arguments = self.parse_group(NodeKind::Parenthesis, &LeafToken::RParen);
                self.tree.attach(function, arguments);
                parts.push(function);
                is_function = true;
            }
        }

        let alias = self.try_alias();
        if is_function && parts.len() == 1 && alias.is_empty() {
            return parts[0];
        }

        let identifier = self.tree.new_node(NodeKind::Identifier);
        for part in parts {
            self.tree.attach(identifier, part);
        }
        for part in alias {
            self.tree.attach(identifier, part);
        }
        identifier
    }

    /// Consume `ws* AS ws* name` if the full pattern is present, otherwise
    /// leave the cursor untouched. `AS (` is not an alias.
    fn try_alias(&mut self) -> Vec<NodeId> {
        let start = self.pos;
        let mut taken = Vec::new();
        while matches!(self.peek(), Some(LeafToken::Whitespace { .. })) {
            taken.push(self.tokens[self.pos].clone());
            self.pos += 1;
        }
        let at_as = matches!(
            self.peek(),
            Some(LeafToken::Keyword(text)) if text.eq_ignore_ascii_case("as")
        );
        if !at_as {
            self.pos = start;
            return Vec::new();
        }
        taken.push(self.tokens[self.pos].clone());
        self.pos += 1;
        while matches!(self.peek(), Some(LeafToken::Whitespace { .. })) {
            taken.push(self.tokens[self.pos].clone());
            self.pos += 1;
        }
        if !matches!(self.peek(), Some(LeafToken::Name(_))) {
            self.pos = start;
            return Vec::new();
        }
        taken.push(self.tokens[self.pos].clone());
        self.pos += 1;
        taken
            .into_iter()
            .map(|token| self.tree.new_node(NodeKind::Leaf(token)))
            .collect()
    }

    /// Regroup comma-separated identifier runs under one list node.
    ///
    /// Only runs of identifier groups qualify: literals, keywords, and
    /// bracket groups break a run, so function argument lists such as
    /// `("model", ARRAY[...], target)` keep their flat shape for the
    /// extractors to pattern-match.
    fn group_identifier_lists(&mut self, parent: NodeId) {
        let children = self.tree.children(parent).to_vec();
        let mut rebuilt = Vec::with_capacity(children.len());
        let mut i = 0;
        while i < children.len() {
            if !self.tree.is_identifier(children[i]) {
                rebuilt.push(children[i]);
                i += 1;
                continue;
            }
            let run_end = self.extend_run(&children, i);
            if run_end > i {
                let list = self.tree.new_node(NodeKind::IdentifierList);
                self.tree.nodes[list.0].parent = Some(parent);
                for &member in &children[i..=run_end] {
                    self.tree.attach(list, member);
                }
                rebuilt.push(list);
                i = run_end + 1;
            } else {
                rebuilt.push(children[i]);
                i += 1;
            }
        }
        self.tree.set_children(parent, rebuilt);
    }

    /// Index of the last identifier reachable from `start` through repeated
    /// `ws* , ws* identifier` steps.
    fn extend_run(&self, children: &[NodeId], start: usize) -> usize {
        let mut last = start;
        loop {
            let mut next = last + 1;
            while next < children.len() && self.tree.is_whitespace(children[next]) {
                next += 1;
            }
            let at_comma = next < children.len()
                && matches!(
                    self.tree.kind(children[next]),
                    NodeKind::Leaf(LeafToken::Comma)
                );
            if !at_comma {
                return last;
            }
            next += 1;
            while next < children.len() && self.tree.is_whitespace(children[next]) {
                next += 1;
            }
            if next < children.len() && self.tree.is_identifier(children[next]) {
                last = next;
            } else {
                return last;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_of<F>(tree: &SyntaxTree, node: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&SyntaxTree, NodeId) -> bool + Copy,
    {
        if pred(tree, node) {
            return Some(node);
        }
        tree.children(node)
            .iter()
            .find_map(|&child| first_of(tree, child, pred))
    }

    #[test]
    fn dotted_quoted_identifier_groups_into_one_node() {
        let tree = SyntaxTree::parse("select `a`.`b`.`c` from d").unwrap();
        let ident = first_of(&tree, tree.root(), |t, n| t.is_identifier(n)).unwrap();
        assert_eq!(tree.text(ident), "`a`.`b`.`c`");
    }

    #[test]
    fn dotted_call_nests_the_function_under_its_namespace_identifier() {
        let tree = SyntaxTree::parse("select layer.train(*) from d").unwrap();
        let function = first_of(&tree, tree.root(), |t, n| t.is_function(n)).unwrap();
        assert_eq!(tree.function_name(function).as_deref(), Some("train"));
        let parent = tree.parent(function).unwrap();
        assert!(tree.is_identifier(parent));
        let first = tree.children(parent)[0];
        assert_eq!(tree.text(first), "layer");
    }

    #[test]
    fn bare_call_stays_a_plain_function_node() {
        let tree = SyntaxTree::parse("OPTIONS()").unwrap();
        let function = first_of(&tree, tree.root(), |t, n| t.is_function(n)).unwrap();
        assert_eq!(tree.parent(function), Some(tree.root()));
    }

    #[test]
    fn aliased_call_exposes_its_alias() {
        let tree = SyntaxTree::parse("select layer.predict(x) as score from d").unwrap();
        let function = first_of(&tree, tree.root(), |t, n| t.is_function(n)).unwrap();
        let parent = tree.parent(function).unwrap();
        assert_eq!(tree.alias(parent).as_deref(), Some("score"));
    }

    #[test]
    fn as_before_parenthesis_is_not_an_alias() {
        let tree = SyntaxTree::parse("create or replace table t as (select a from b)").unwrap();
        let ident = first_of(&tree, tree.root(), |t, n| t.is_identifier(n)).unwrap();
        assert_eq!(tree.text(ident), "t");
        assert_eq!(tree.alias(ident), None);
    }

    #[test]
    fn comma_separated_identifiers_group_into_a_list() {
        let tree = SyntaxTree::parse("select c1, c2, c3 from d").unwrap();
        let list = first_of(&tree, tree.root(), |t, n| t.is_identifier_list(n)).unwrap();
        let items: Vec<String> = tree
            .list_items(list)
            .into_iter()
            .map(|item| tree.text(item))
            .collect();
        assert_eq!(items, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn mixed_function_arguments_do_not_group_into_a_list() {
        let tree = SyntaxTree::parse(r#"layer.predict("m", ARRAY[c1, c2])"#).unwrap();
        let function = first_of(&tree, tree.root(), |t, n| t.is_function(n)).unwrap();
        let paren = tree
            .children(function)
            .iter()
            .copied()
            .find(|&c| tree.is_parenthesis(c))
            .unwrap();
        let top_level_lists: Vec<NodeId> = tree
            .children(paren)
            .iter()
            .copied()
            .filter(|&c| tree.is_identifier_list(c))
            .collect();
        assert!(top_level_lists.is_empty());

        let brackets = first_of(&tree, tree.root(), |t, n| t.is_brackets(n)).unwrap();
        let inner_list = first_of(&tree, brackets, |t, n| t.is_identifier_list(n)).unwrap();
        let items: Vec<String> = tree
            .list_items(inner_list)
            .into_iter()
            .map(|item| tree.text(item))
            .collect();
        assert_eq!(items, vec!["c1", "c2"]);
    }

    #[test]
    fn identifier_list_is_parented_under_the_enclosing_group() {
        let tree = SyntaxTree::parse("(select c1, c2, layer.predict(x) as p from s)").unwrap();
        let list = first_of(&tree, tree.root(), |t, n| t.is_identifier_list(n)).unwrap();
        let parent = tree.parent(list).unwrap();
        assert!(tree.is_parenthesis(parent));

        let function = first_of(&tree, tree.root(), |t, n| t.is_function(n)).unwrap();
        let paren = tree
            .find_ancestor(function, |t, n| t.is_parenthesis(n))
            .unwrap();
        assert_eq!(paren, parent);
    }

    #[test]
    fn unaliased_text_drops_a_from_alias() {
        let tree = SyntaxTree::parse("select x from `a`.`b` as src").unwrap();
        let idents: Vec<NodeId> = tree
            .children(tree.root())
            .iter()
            .copied()
            .filter(|&c| tree.is_identifier(c))
            .collect();
        let source = *idents.last().unwrap();
        assert_eq!(tree.unaliased_text(source), "`a`.`b`");
        assert_eq!(tree.alias(source).as_deref(), Some("src"));
    }

    #[test]
    fn text_reconstructs_nested_groups_verbatim() {
        let sql = r#"layer.predict("m:latest", ARRAY[c1, c2]) as score"#;
        let tree = SyntaxTree::parse(sql).unwrap();
        let ident = first_of(&tree, tree.root(), |t, n| t.is_identifier(n)).unwrap();
        assert_eq!(tree.text(ident), sql);
    }
}
