/// Leaf tokens over the `sqlparser` lexer.
pub mod lexer;
/// Arena syntax tree and the grouping pass that builds it.
pub mod tree;
/// Tree traversal, cleanup, and sequence-matching helpers.
pub mod walk;
