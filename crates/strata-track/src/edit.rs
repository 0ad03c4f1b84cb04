//! Edits that keep provenance.
//!
//! These mirror the edits on [`SyntaxStore`], but while copying the spine they
//! give every untouched sibling a stamp of its own and restamp the spine nodes
//! in exclude mode. Elements that survive an edit therefore keep mapping back
//! exactly, however much the text around them shifts.

use std::ops::Range;

use strata_syntax::{
    GreenElement, GreenNodeId, GreenTokenId, NodeOrToken, SyntaxElement, SyntaxError, SyntaxNode,
    SyntaxStore, SyntaxToken,
};

use crate::{Descendants, MappedNode, TrackingContext, TrackingState};

impl TrackingContext {
    pub fn replace_node(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        old: &SyntaxNode,
        new: GreenNodeId,
    ) -> Result<SyntaxNode, SyntaxError> {
        if old == root {
            return Ok(SyntaxNode::new_root(new));
        }
        self.replace_element(store, root, &NodeOrToken::Node(old.clone()), NodeOrToken::Node(new))
    }

    pub fn replace_token(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        old: &SyntaxToken,
        new: GreenTokenId,
    ) -> Result<SyntaxNode, SyntaxError> {
        let old = NodeOrToken::Token(old.clone());
        self.replace_element(store, root, &old, NodeOrToken::Token(new))
    }

    pub fn replace_element(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        old: &SyntaxElement,
        new: GreenElement,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = old.parent().ok_or(SyntaxError::RootEdit)?.clone();
        let index = old.index();
        self.splice_children(store, root, &parent, index..index + 1, vec![new])
    }

    pub fn remove_node(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        node: &SyntaxNode,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = node.parent().ok_or(SyntaxError::RootEdit)?.clone();
        let index = node.index();
        self.splice_children(store, root, &parent, index..index + 1, Vec::new())
    }

    pub fn insert_before(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        anchor: &SyntaxElement,
        new: Vec<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = anchor.parent().ok_or(SyntaxError::RootEdit)?.clone();
        let index = anchor.index();
        self.splice_children(store, root, &parent, index..index, new)
    }

    pub fn insert_after(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        anchor: &SyntaxElement,
        new: Vec<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        let parent = anchor.parent().ok_or(SyntaxError::RootEdit)?.clone();
        let index = anchor.index() + 1;
        self.splice_children(store, root, &parent, index..index, new)
    }

    /// Replaces `parent`'s children in `range` with `replacement`.
    ///
    /// The replacement is inserted as given; stamping it is up to the caller.
    pub fn splice_children(
        &self,
        store: &mut SyntaxStore,
        root: &SyntaxNode,
        parent: &SyntaxNode,
        range: Range<usize>,
        replacement: Vec<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        if !parent.ancestors().any(|ancestor| ancestor == *root) {
            let kind = parent.kind(store);
            return Err(SyntaxError::NodeNotFound { kind, range: parent.full_range(store) });
        }

        let children: Vec<SyntaxElement> = parent.children_with_tokens(store).collect();
        if range.start > range.end || range.end > children.len() {
            return Err(SyntaxError::ChildRangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: children.len(),
            });
        }

        let mut greens = Vec::with_capacity(children.len() + replacement.len());
        for (index, child) in children.iter().enumerate() {
            if index == range.start {
                greens.extend(replacement.iter().copied());
            }
            if !range.contains(&index) {
                greens.push(self.carry(store, child));
            }
        }
        if range.start == children.len() {
            greens.extend(replacement);
        }

        let mut green = self.restamp_spine(store, parent, greens);
        let mut current = parent.clone();
        while let Some(up) = current.parent().cloned() {
            let index = current.index();
            let siblings: Vec<SyntaxElement> = up.children_with_tokens(store).collect();
            let mut greens = Vec::with_capacity(siblings.len());
            for sibling in &siblings {
                if sibling.index() == index {
                    greens.push(NodeOrToken::Node(green));
                } else {
                    greens.push(self.carry(store, sibling));
                }
            }
            green = self.restamp_spine(store, &up, greens);
            if up == *root {
                break;
            }
            current = up;
        }

        tracing::trace!(parent = ?parent.kind(store), ?range, "tracked splice");
        Ok(SyntaxNode::new_root(green))
    }

    fn restamp_spine(
        &self,
        store: &mut SyntaxStore,
        node: &SyntaxNode,
        children: Vec<GreenElement>,
    ) -> GreenNodeId {
        let copy = store.with_children(node.green(), children);
        let element = NodeOrToken::Node(node.clone());
        match self.set_annotation_exclude_children(store, &element, NodeOrToken::Node(copy)) {
            NodeOrToken::Node(green) => green,
            NodeOrToken::Token(_) => unreachable!("stamping keeps the element variant"),
        }
    }

    /// Green of an untouched sibling, stamped so it keeps its mapping under an
    /// excluding spine node.
    fn carry(&self, store: &mut SyntaxStore, element: &SyntaxElement) -> GreenElement {
        match self.tracking_state(store, element) {
            TrackingState::TrackedSelf | TrackingState::Excluded => element.green(),
            TrackingState::TrackedViaAncestor => self.track_element_if_needed(store, element),
            TrackingState::Untracked => {
                let mapped = MappedNode {
                    original: Some(element.clone()),
                    descendants: Descendants::Include,
                };
                self.stamp(store, element.green(), mapped)
            }
        }
    }
}
