//! Bottom-up construction of green trees from parser events.

use crate::{GreenElement, GreenNodeId, GreenTrivia, NodeOrToken, SyntaxKind, SyntaxStore};

const DEFAULT_TREE_DEPTH: usize = 32;
const DEFAULT_CHILDREN_LEN: usize = 64;

/// Builds one green tree inside a [`SyntaxStore`].
pub struct Builder<'s> {
    store: &'s mut SyntaxStore,
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.parents.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

impl<'s> Builder<'s> {
    pub fn new(store: &'s mut SyntaxStore) -> Self {
        Self {
            store,
            parents: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children: Vec::with_capacity(DEFAULT_CHILDREN_LEN),
        }
    }

    /// The store being built into, for allocating side structures such as
    /// directive trivia.
    pub fn store(&mut self) -> &mut SyntaxStore {
        self.store
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.parents.pop().expect("unbalanced `finish_node` call");
        let children = self.children.split_off(first_child);
        let node = self.store.alloc_node(kind, children);
        self.children.push(NodeOrToken::Node(node));
    }

    pub fn token(
        &mut self,
        kind: SyntaxKind,
        text: &str,
        leading: GreenTrivia,
        trailing: GreenTrivia,
    ) {
        let token = self.store.alloc_token(kind, text, leading, trailing);
        self.children.push(NodeOrToken::Token(token));
    }

    pub fn missing(&mut self, kind: SyntaxKind) {
        let token = self.store.missing_token(kind);
        self.children.push(NodeOrToken::Token(token));
    }

    /// Returns the single root node built so far.
    pub fn finish(mut self) -> GreenNodeId {
        assert!(self.parents.is_empty(), "unclosed nodes: {:?}", self.parents);
        let children = std::mem::take(&mut self.children);
        match children.as_slice() {
            [NodeOrToken::Node(root)] => *root,
            _ => panic!("expected exactly one root node, found {} elements", children.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::SyntaxNode;

    #[test]
    fn nested_nodes() {
        let mut store = SyntaxStore::new();
        let mut builder = Builder::new(&mut store);
        builder.start_node(EXPR_STMT);
        builder.start_node(NAME_EXPR);
        builder.token(NAME, "x", GreenTrivia::whitespace("  "), GreenTrivia::empty());
        builder.finish_node();
        builder.missing(SEMICOLON);
        builder.finish_node();
        let root = SyntaxNode::new_root(builder.finish());

        expect_test::expect![[r#"
            EXPR_STMT@0..3
              NAME_EXPR@0..3
                WHITESPACE@0..2 "  "
                NAME@2..3 "x"
              SEMICOLON@3..3 missing
        "#]]
        .assert_eq(&root.debug_dump(&store));
        assert_eq!(root.range(&store), crate::TextRange::new(2.into(), 3.into()));
    }
}
