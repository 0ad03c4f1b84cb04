//! Positioned, parent-linked handles over green elements.
//!
//! Handles do not borrow the store; every accessor takes it as a parameter.
//! Two handles compare equal when they denote the same element at the same
//! position of the same tree.

use std::fmt;
use std::sync::Arc;

use text_size::{TextRange, TextSize};

use crate::annotation::SyntaxAnnotation;
use crate::green::{GreenElement, GreenNodeId, GreenTokenId, SyntaxStore};
use crate::{SyntaxKind, TriviaPieceKind};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNode(Arc<NodeData>);

#[derive(PartialEq, Eq, Hash)]
struct NodeData {
    parent: Option<SyntaxNode>,
    index: u32,
    offset: TextSize,
    green: GreenNodeId,
}

impl SyntaxNode {
    pub fn new_root(green: GreenNodeId) -> Self {
        Self::new_root_at(green, TextSize::new(0))
    }

    /// A parentless node positioned at `offset`; used for structured trivia.
    pub fn new_root_at(green: GreenNodeId, offset: TextSize) -> Self {
        Self(Arc::new(NodeData { parent: None, index: 0, offset, green }))
    }

    fn new_child(parent: &SyntaxNode, index: usize, offset: TextSize, green: GreenNodeId) -> Self {
        let parent = Some(parent.clone());
        Self(Arc::new(NodeData { parent, index: index as u32, offset, green }))
    }

    pub fn green(&self) -> GreenNodeId {
        self.0.green
    }

    /// Start of the full range.
    pub fn offset(&self) -> TextSize {
        self.0.offset
    }

    /// Position among the parent's children.
    pub fn index(&self) -> usize {
        self.0.index as usize
    }

    pub fn parent(&self) -> Option<&SyntaxNode> {
        self.0.parent.as_ref()
    }

    /// This node and its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::successors(Some(self.clone()), |node| node.parent().cloned())
    }

    pub fn root(&self) -> SyntaxNode {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent.clone();
        }
        node
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    pub fn kind(&self, store: &SyntaxStore) -> SyntaxKind {
        store[self.green()].kind()
    }

    pub fn width(&self, store: &SyntaxStore) -> TextSize {
        store[self.green()].width()
    }

    /// Range including leading and trailing trivia.
    pub fn full_range(&self, store: &SyntaxStore) -> TextRange {
        TextRange::at(self.offset(), self.width(store))
    }

    /// Range from the first non-missing token's text to the last one's,
    /// excluding the outer trivia.
    pub fn range(&self, store: &SyntaxStore) -> TextRange {
        let full = self.full_range(store);
        let first = self.first_token(store);
        let last = self.last_token(store);
        match (first, last) {
            (Some(first), Some(last)) => {
                let start = first.range(store).start();
                let end = last.range(store).end();
                if start <= end { TextRange::new(start, end) } else { TextRange::empty(start) }
            }
            _ => TextRange::empty(full.start()),
        }
    }

    pub fn annotations<'s>(&self, store: &'s SyntaxStore) -> &'s [SyntaxAnnotation] {
        store[self.green()].annotations()
    }

    pub fn has_annotation_kind(&self, store: &SyntaxStore, kind: &str) -> bool {
        self.annotations(store).iter().any(|annotation| annotation.kind() == kind)
    }

    pub fn children_with_tokens<'s>(&self, store: &'s SyntaxStore) -> SyntaxElementChildren<'s> {
        SyntaxElementChildren { store, parent: self.clone(), next: 0, offset: self.offset() }
    }

    pub fn children<'s>(
        &self,
        store: &'s SyntaxStore,
    ) -> impl Iterator<Item = SyntaxNode> + use<'s> {
        self.children_with_tokens(store).filter_map(NodeOrToken::into_node)
    }

    pub fn child_count(&self, store: &SyntaxStore) -> usize {
        store[self.green()].children().len()
    }

    pub fn child_at(&self, store: &SyntaxStore, index: usize) -> Option<SyntaxElement> {
        self.children_with_tokens(store).nth(index)
    }

    /// First token in document order, missing tokens included.
    pub fn first_token(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        self.children_with_tokens(store).find_map(|child| match child {
            NodeOrToken::Token(token) => Some(token),
            NodeOrToken::Node(node) => node.first_token(store),
        })
    }

    /// Last token in document order, missing tokens included.
    pub fn last_token(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        let children: Vec<_> = self.children_with_tokens(store).collect();
        children.into_iter().rev().find_map(|child| match child {
            NodeOrToken::Token(token) => Some(token),
            NodeOrToken::Node(node) => node.last_token(store),
        })
    }

    pub fn preorder<'s>(&self, store: &'s SyntaxStore) -> Preorder<'s> {
        Preorder::new(store, self.clone())
    }

    pub fn preorder_with_tokens<'s>(&self, store: &'s SyntaxStore) -> PreorderWithTokens<'s> {
        PreorderWithTokens::new(store, self.clone())
    }

    /// This node and every node below it, in document order.
    pub fn descendants<'s>(
        &self,
        store: &'s SyntaxStore,
    ) -> impl Iterator<Item = SyntaxNode> + use<'s> {
        self.preorder(store).filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    pub fn descendants_with_tokens<'s>(
        &self,
        store: &'s SyntaxStore,
    ) -> impl Iterator<Item = SyntaxElement> + use<'s> {
        self.preorder_with_tokens(store).filter_map(|event| match event {
            WalkEventWithTokens::EnterNode(node) => Some(NodeOrToken::Node(node)),
            WalkEventWithTokens::Token(token) => Some(NodeOrToken::Token(token)),
            WalkEventWithTokens::LeaveNode(_) => None,
        })
    }

    pub fn descendant_tokens<'s>(
        &self,
        store: &'s SyntaxStore,
    ) -> impl Iterator<Item = SyntaxToken> + use<'s> {
        self.preorder_with_tokens(store).filter_map(|event| match event {
            WalkEventWithTokens::Token(token) => Some(token),
            _ => None,
        })
    }

    /// Tokens whose full range touches `offset`. Zero-width tokens never match.
    pub fn token_at_offset(
        &self,
        store: &SyntaxStore,
        offset: TextSize,
    ) -> TokenAtOffset<SyntaxToken> {
        let range = self.full_range(store);
        if !range.contains_inclusive(offset) {
            return TokenAtOffset::None;
        }

        let left = (offset > range.start()).then(|| self.leaf_at(store, offset, true)).flatten();
        let right = (offset < range.end()).then(|| self.leaf_at(store, offset, false)).flatten();
        match (left, right) {
            (Some(left), Some(right)) if left != right => TokenAtOffset::Between(left, right),
            (Some(token), _) | (None, Some(token)) => TokenAtOffset::Single(token),
            (None, None) => TokenAtOffset::None,
        }
    }

    fn leaf_at(&self, store: &SyntaxStore, offset: TextSize, left: bool) -> Option<SyntaxToken> {
        let mut node = self.clone();
        loop {
            let child = node.children_with_tokens(store).find(|child| {
                let range = child.full_range(store);
                if range.is_empty() {
                    return false;
                }
                if left {
                    range.start() < offset && offset <= range.end()
                } else {
                    range.start() <= offset && offset < range.end()
                }
            })?;
            match child {
                NodeOrToken::Token(token) => return Some(token),
                NodeOrToken::Node(child) => node = child,
            }
        }
    }

    /// Smallest element whose full range contains `range`.
    pub fn covering_element(&self, store: &SyntaxStore, range: TextRange) -> SyntaxElement {
        let mut node = self.clone();
        loop {
            let child = node.children_with_tokens(store).find(|child| {
                let child_range = child.full_range(store);
                child_range.contains_range(range) && (range.is_empty() || !child_range.is_empty())
            });
            match child {
                Some(NodeOrToken::Node(child)) => node = child,
                Some(NodeOrToken::Token(token)) => return NodeOrToken::Token(token),
                None => return NodeOrToken::Node(node),
            }
        }
    }

    /// Source text including trivia.
    pub fn text(&self, store: &SyntaxStore) -> String {
        store.element_text(NodeOrToken::Node(self.green()))
    }

    /// Source text of [`SyntaxNode::range`].
    pub fn trimmed_text(&self, store: &SyntaxStore) -> String {
        let text = self.text(store);
        let range = self.range(store) - self.offset();
        text[range].to_owned()
    }

    pub fn debug_dump(&self, store: &SyntaxStore) -> String {
        let mut out = String::new();
        dump(store, self, 0, &mut out);
        out
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxNode({:?}@{:?})", self.green(), self.offset())
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SyntaxToken {
    parent: SyntaxNode,
    index: u32,
    offset: TextSize,
    green: GreenTokenId,
}

impl SyntaxToken {
    pub fn green(&self) -> GreenTokenId {
        self.green
    }

    /// Start of the full range.
    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn parent(&self) -> &SyntaxNode {
        &self.parent
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.parent.ancestors()
    }

    pub fn kind(&self, store: &SyntaxStore) -> SyntaxKind {
        store[self.green].kind()
    }

    pub fn is_missing(&self, store: &SyntaxStore) -> bool {
        store[self.green].is_missing()
    }

    /// Text without trivia.
    pub fn text<'s>(&self, store: &'s SyntaxStore) -> &'s str {
        store[self.green].text()
    }

    pub fn width(&self, store: &SyntaxStore) -> TextSize {
        store[self.green].width()
    }

    pub fn full_range(&self, store: &SyntaxStore) -> TextRange {
        TextRange::at(self.offset, self.width(store))
    }

    /// Range of the token text, excluding trivia.
    pub fn range(&self, store: &SyntaxStore) -> TextRange {
        let data = &store[self.green];
        TextRange::at(self.offset + data.leading().len(), data.text_len())
    }

    pub fn annotations<'s>(&self, store: &'s SyntaxStore) -> &'s [SyntaxAnnotation] {
        store[self.green].annotations()
    }

    pub fn leading_trivia(&self, store: &SyntaxStore) -> Vec<SyntaxTrivia> {
        self.trivia(store, true)
    }

    pub fn trailing_trivia(&self, store: &SyntaxStore) -> Vec<SyntaxTrivia> {
        self.trivia(store, false)
    }

    fn trivia(&self, store: &SyntaxStore, leading: bool) -> Vec<SyntaxTrivia> {
        let data = &store[self.green];
        let (pieces, mut offset) = if leading {
            (data.leading().pieces(), self.offset)
        } else {
            (data.trailing().pieces(), self.offset + data.leading().len() + data.text_len())
        };
        let mut trivia = Vec::with_capacity(pieces.len());
        for (index, piece) in pieces.iter().enumerate() {
            trivia.push(SyntaxTrivia { token: self.clone(), leading, index: index as u32, offset });
            offset += piece.len();
        }
        trivia
    }

    /// Next token in document order, missing tokens included.
    pub fn next_token(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        let mut element = NodeOrToken::Token(self.clone());
        loop {
            let parent = element.parent()?.clone();
            let found = parent.children_with_tokens(store).skip(element.index() + 1).find_map(
                |sibling| match sibling {
                    NodeOrToken::Token(token) => Some(token),
                    NodeOrToken::Node(node) => node.first_token(store),
                },
            );
            if found.is_some() {
                return found;
            }
            element = NodeOrToken::Node(parent);
        }
    }

    /// Previous token in document order, missing tokens included.
    pub fn prev_token(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        let mut element = NodeOrToken::Token(self.clone());
        loop {
            let parent = element.parent()?.clone();
            let siblings: Vec<_> =
                parent.children_with_tokens(store).take(element.index()).collect();
            let found = siblings.into_iter().rev().find_map(|sibling| match sibling {
                NodeOrToken::Token(token) => Some(token),
                NodeOrToken::Node(node) => node.last_token(store),
            });
            if found.is_some() {
                return found;
            }
            element = NodeOrToken::Node(parent);
        }
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxToken({:?}@{:?})", self.green, self.offset)
    }
}

/// One trivia piece of a token, positioned in the tree.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SyntaxTrivia {
    token: SyntaxToken,
    leading: bool,
    index: u32,
    offset: TextSize,
}

impl SyntaxTrivia {
    pub fn token(&self) -> &SyntaxToken {
        &self.token
    }

    pub fn is_leading(&self) -> bool {
        self.leading
    }

    fn piece<'s>(&self, store: &'s SyntaxStore) -> &'s crate::TriviaPiece {
        let data = &store[self.token.green()];
        let trivia = if self.leading { data.leading() } else { data.trailing() };
        &trivia.pieces()[self.index as usize]
    }

    pub fn kind(&self, store: &SyntaxStore) -> TriviaPieceKind {
        self.piece(store).kind
    }

    pub fn text<'s>(&self, store: &'s SyntaxStore) -> &'s str {
        &self.piece(store).text
    }

    pub fn range(&self, store: &SyntaxStore) -> TextRange {
        TextRange::at(self.offset, self.piece(store).len())
    }

    /// Parsed form of a directive, rooted at the trivia's position.
    pub fn structure(&self, store: &SyntaxStore) -> Option<SyntaxNode> {
        let root = self.piece(store).structure?;
        Some(SyntaxNode::new_root_at(root, self.offset))
    }
}

pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

impl SyntaxElement {
    pub fn kind(&self, store: &SyntaxStore) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(store),
            NodeOrToken::Token(token) => token.kind(store),
        }
    }

    pub fn green(&self) -> GreenElement {
        match self {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.green()),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.green()),
        }
    }

    pub fn offset(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.offset(),
            NodeOrToken::Token(token) => token.offset(),
        }
    }

    pub fn width(&self, store: &SyntaxStore) -> TextSize {
        store.element_width(self.green())
    }

    pub fn full_range(&self, store: &SyntaxStore) -> TextRange {
        TextRange::at(self.offset(), self.width(store))
    }

    pub fn range(&self, store: &SyntaxStore) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.range(store),
            NodeOrToken::Token(token) => token.range(store),
        }
    }

    pub fn parent(&self) -> Option<&SyntaxNode> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.index(),
            NodeOrToken::Token(token) => token.index(),
        }
    }

    /// Enclosing nodes, starting with the element itself when it is a node.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        let start = match self {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent(),
        };
        start.ancestors()
    }

    pub fn annotations<'s>(&self, store: &'s SyntaxStore) -> &'s [SyntaxAnnotation] {
        store.element_annotations(self.green())
    }

    pub fn text(&self, store: &SyntaxStore) -> String {
        store.element_text(self.green())
    }
}

/// Iterator over the direct children of a node.
#[derive(Clone)]
pub struct SyntaxElementChildren<'s> {
    store: &'s SyntaxStore,
    parent: SyntaxNode,
    next: usize,
    offset: TextSize,
}

impl Iterator for SyntaxElementChildren<'_> {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<Self::Item> {
        let green = *self.store[self.parent.green()].children().get(self.next)?;
        let (index, offset) = (self.next, self.offset);
        self.next += 1;
        self.offset += self.store.element_width(green);
        Some(match green {
            NodeOrToken::Node(node) => {
                NodeOrToken::Node(SyntaxNode::new_child(&self.parent, index, offset, node))
            }
            NodeOrToken::Token(token) => NodeOrToken::Token(SyntaxToken {
                parent: self.parent.clone(),
                index: index as u32,
                offset,
                green: token,
            }),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.store[self.parent.green()].children().len() - self.next;
        (len, Some(len))
    }
}

impl ExactSizeIterator for SyntaxElementChildren<'_> {}

/// Preorder traversal over nodes.
pub struct Preorder<'s> {
    inner: PreorderWithTokens<'s>,
}

impl<'s> Preorder<'s> {
    fn new(store: &'s SyntaxStore, start: SyntaxNode) -> Self {
        Self { inner: PreorderWithTokens::new(store, start) }
    }

    /// Skips the current subtree during traversal.
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl Iterator for Preorder<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Debug)]
pub enum WalkEvent {
    Enter(SyntaxNode),
    Leave(SyntaxNode),
}

/// Preorder traversal over nodes and tokens.
pub struct PreorderWithTokens<'s> {
    store: &'s SyntaxStore,
    stack: Vec<(SyntaxNode, SyntaxElementChildren<'s>)>,
    root: Option<SyntaxNode>,
}

impl<'s> PreorderWithTokens<'s> {
    fn new(store: &'s SyntaxStore, start: SyntaxNode) -> Self {
        Self { store, stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl Iterator for PreorderWithTokens<'_> {
    type Item = WalkEventWithTokens;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root.clone(), root.children_with_tokens(self.store)));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child.clone(), child.children_with_tokens(self.store)));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Debug)]
pub enum WalkEventWithTokens {
    EnterNode(SyntaxNode),
    LeaveNode(SyntaxNode),
    Token(SyntaxToken),
}

fn dump(store: &SyntaxStore, node: &SyntaxNode, depth: usize, out: &mut String) {
    use std::fmt::Write as _;

    let indent = "  ".repeat(depth);
    _ = writeln!(out, "{indent}{:?}@{:?}", node.kind(store), node.full_range(store));
    for child in node.children_with_tokens(store) {
        let token = match child {
            NodeOrToken::Node(child) => {
                dump(store, &child, depth + 1, out);
                continue;
            }
            NodeOrToken::Token(token) => token,
        };
        let indent = "  ".repeat(depth + 1);
        for piece in &token.leading_trivia(store) {
            dump_trivia(store, piece, depth + 1, out);
        }
        if token.is_missing(store) {
            _ = writeln!(out, "{indent}{:?}@{:?} missing", token.kind(store), token.range(store));
        } else {
            _ = writeln!(
                out,
                "{indent}{:?}@{:?} {:?}",
                token.kind(store),
                token.range(store),
                token.text(store)
            );
        }
        for piece in &token.trailing_trivia(store) {
            dump_trivia(store, piece, depth + 1, out);
        }
    }
}

fn dump_trivia(store: &SyntaxStore, trivia: &SyntaxTrivia, depth: usize, out: &mut String) {
    use std::fmt::Write as _;

    let indent = "  ".repeat(depth);
    let kind = trivia.kind(store).syntax_kind();
    _ = writeln!(out, "{indent}{kind:?}@{:?} {:?}", trivia.range(store), trivia.text(store));
    if let Some(structure) = trivia.structure(store) {
        dump(store, &structure, depth + 1, out);
    }
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Maps tokens to a different type.
    pub fn map<F: Fn(T) -> U, U>(self, f: F) -> TokenAtOffset<U> {
        match self {
            TokenAtOffset::None => TokenAtOffset::None,
            TokenAtOffset::Single(it) => TokenAtOffset::Single(f(it)),
            TokenAtOffset::Between(l, r) => TokenAtOffset::Between(f(l), f(r)),
        }
    }

    /// Convert to option, preferring the right token in case of a tie.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(_, right) => Some(right),
        }
    }

    /// Convert to option, preferring the left token in case of a tie.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, _) => Some(left),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::None => (0, Some(0)),
            Self::Single(_) => (1, Some(1)),
            Self::Between(_, _) => (2, Some(2)),
        }
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}
