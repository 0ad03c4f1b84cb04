//! Copy-on-write edits.
//!
//! Every edit allocates fresh green entries for the spine between the edited
//! parent and the root, reuses everything else and returns a new root. The old
//! tree stays valid.

use std::ops::Range;

use crate::{
    GreenElement, GreenNodeId, GreenTokenId, NodeOrToken, SyntaxElement, SyntaxError, SyntaxNode,
    SyntaxStore, SyntaxToken,
};

impl SyntaxStore {
    pub fn replace_node(
        &mut self,
        root: &SyntaxNode,
        old: &SyntaxNode,
        new: GreenNodeId,
    ) -> Result<SyntaxNode, SyntaxError> {
        if old == root {
            return Ok(SyntaxNode::new_root(new));
        }
        self.replace_element(root, &NodeOrToken::Node(old.clone()), NodeOrToken::Node(new))
    }

    pub fn replace_token(
        &mut self,
        root: &SyntaxNode,
        old: &SyntaxToken,
        new: GreenTokenId,
    ) -> Result<SyntaxNode, SyntaxError> {
        self.replace_element(root, &NodeOrToken::Token(old.clone()), NodeOrToken::Token(new))
    }

    pub fn replace_element(
        &mut self,
        root: &SyntaxNode,
        old: &SyntaxElement,
        new: GreenElement,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = self.parent_in(root, old)?;
        let index = old.index();
        self.splice_children(root, &parent, index..index + 1, vec![new])
    }

    pub fn remove_node(
        &mut self,
        root: &SyntaxNode,
        node: &SyntaxNode,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = self.parent_in(root, &NodeOrToken::Node(node.clone()))?;
        let index = node.index();
        self.splice_children(root, &parent, index..index + 1, Vec::new())
    }

    pub fn insert_before(
        &mut self,
        root: &SyntaxNode,
        anchor: &SyntaxElement,
        new: Vec<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = self.parent_in(root, anchor)?;
        let index = anchor.index();
        self.splice_children(root, &parent, index..index, new)
    }

    pub fn insert_after(
        &mut self,
        root: &SyntaxNode,
        anchor: &SyntaxElement,
        new: Vec<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = self.parent_in(root, anchor)?;
        let index = anchor.index() + 1;
        self.splice_children(root, &parent, index..index, new)
    }

    /// Replaces `parent`'s children in `range` with `replacement`.
    pub fn splice_children(
        &mut self,
        root: &SyntaxNode,
        parent: &SyntaxNode,
        range: Range<usize>,
        replacement: Vec<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        if !parent.ancestors().any(|ancestor| ancestor == *root) {
            return Err(self.not_found(&NodeOrToken::Node(parent.clone())));
        }

        let mut children = self[parent.green()].children().to_vec();
        if range.start > range.end || range.end > children.len() {
            return Err(SyntaxError::ChildRangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: children.len(),
            });
        }
        children.splice(range, replacement);
        let green = self.with_children(parent.green(), children);
        Ok(self.rebuild_spine(root, parent, green))
    }

    fn rebuild_spine(
        &mut self,
        root: &SyntaxNode,
        node: &SyntaxNode,
        new_green: GreenNodeId,
    ) -> SyntaxNode {
        let mut current = node.clone();
        let mut green = new_green;
        while current != *root {
            let Some(parent) = current.parent().cloned() else { break };
            let mut children = self[parent.green()].children().to_vec();
            children[current.index()] = NodeOrToken::Node(green);
            green = self.with_children(parent.green(), children);
            current = parent;
        }
        SyntaxNode::new_root(green)
    }

    fn parent_in(
        &self,
        root: &SyntaxNode,
        element: &SyntaxElement,
    ) -> Result<SyntaxNode, SyntaxError> {
        if element.as_node() == Some(root) {
            return Err(SyntaxError::RootEdit);
        }
        let Some(parent) = element.parent() else {
            return Err(self.not_found(element));
        };
        if !parent.ancestors().any(|ancestor| ancestor == *root) {
            return Err(self.not_found(element));
        }
        Ok(parent.clone())
    }

    fn not_found(&self, element: &SyntaxElement) -> SyntaxError {
        SyntaxError::NodeNotFound { kind: element.kind(self), range: element.full_range(self) }
    }
}

#[cfg(test)]
mod tests {
    use crate::SyntaxKind::*;
    use crate::{GreenTrivia, NodeOrToken, SyntaxError, SyntaxNode, SyntaxStore};

    fn token(store: &mut SyntaxStore, kind: crate::SyntaxKind, text: &str) -> crate::GreenElement {
        NodeOrToken::Token(store.alloc_token(
            kind,
            text,
            GreenTrivia::empty(),
            GreenTrivia::whitespace(" "),
        ))
    }

    /// `int i ;` wrapped as FIELD_DECL(VARIABLE_DECL(PREDEFINED_TYPE, DECLARATOR), SEMICOLON).
    fn field(store: &mut SyntaxStore) -> SyntaxNode {
        let int = token(store, INT_KW, "int");
        let ty = store.alloc_node(PREDEFINED_TYPE, vec![int]);
        let name = token(store, NAME, "i");
        let declarator = store.alloc_node(VARIABLE_DECLARATOR, vec![name]);
        let decl = store.alloc_node(
            VARIABLE_DECL,
            vec![NodeOrToken::Node(ty), NodeOrToken::Node(declarator)],
        );
        let semi = token(store, SEMICOLON, ";");
        SyntaxNode::new_root(store.alloc_node(FIELD_DECL, vec![NodeOrToken::Node(decl), semi]))
    }

    #[test]
    fn replace_node_copies_only_the_spine() {
        let mut store = SyntaxStore::new();
        let root = field(&mut store);
        let declarator = root.descendants(&store).find(|n| n.kind(&store) == VARIABLE_DECLARATOR);
        let declarator = declarator.unwrap();
        let ty = root.descendants(&store).find(|n| n.kind(&store) == PREDEFINED_TYPE).unwrap();

        let name = token(&mut store, NAME, "_i");
        let new_declarator = store.alloc_node(VARIABLE_DECLARATOR, vec![name]);
        let new_root = store.replace_node(&root, &declarator, new_declarator).unwrap();

        assert_eq!(root.text(&store), "int i ; ");
        assert_eq!(new_root.text(&store), "int _i ; ");
        assert_ne!(new_root.green(), root.green());

        let new_ty = new_root.descendants(&store).find(|n| n.kind(&store) == PREDEFINED_TYPE);
        assert_eq!(new_ty.unwrap().green(), ty.green());
    }

    #[test]
    fn edits_outside_the_root_fail() {
        let mut store = SyntaxStore::new();
        let root = field(&mut store);
        let other = field(&mut store);
        let foreign = other.children(&store).next().unwrap();
        let replacement = store.alloc_node(VARIABLE_DECL, Vec::new());

        let error = store.replace_node(&root, &foreign, replacement).unwrap_err();
        assert!(matches!(error, SyntaxError::NodeNotFound { kind: VARIABLE_DECL, .. }));
    }

    #[test]
    fn insert_and_remove() {
        let mut store = SyntaxStore::new();
        let root = field(&mut store);
        let semi = root.last_token(&store).unwrap();

        let comma = token(&mut store, COMMA, ",");
        let inserted =
            store.insert_before(&root, &NodeOrToken::Token(semi.clone()), vec![comma]).unwrap();
        assert_eq!(inserted.text(&store), "int i , ; ");

        let decl = inserted.children(&store).next().unwrap();
        let removed = store.remove_node(&inserted, &decl).unwrap();
        assert_eq!(removed.text(&store), ", ; ");

        let error = store.remove_node(&root, &root).unwrap_err();
        assert_eq!(error, SyntaxError::RootEdit);
    }

    #[test]
    fn splice_rejects_bad_ranges() {
        let mut store = SyntaxStore::new();
        let root = field(&mut store);

        let error = store.splice_children(&root, &root, 1..5, Vec::new()).unwrap_err();
        assert_eq!(error, SyntaxError::ChildRangeOutOfBounds { start: 1, end: 5, len: 2 });
    }
}
