//! Immutable green elements and the arena that owns them.

use std::ops::Index;

use la_arena::{Arena, Idx};
use smol_str::SmolStr;
use text_size::{TextLen, TextSize};

use crate::annotation::{AnnotationAllocator, SyntaxAnnotation};
use crate::{GreenTrivia, NodeOrToken, SyntaxKind};

pub type GreenNodeId = Idx<GreenNodeData>;
pub type GreenTokenId = Idx<GreenTokenData>;
pub type GreenElement = NodeOrToken<GreenNodeId, GreenTokenId>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreenNodeData {
    kind: SyntaxKind,
    children: Box<[GreenElement]>,
    width: TextSize,
    annotations: Box<[SyntaxAnnotation]>,
}

impl GreenNodeData {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn children(&self) -> &[GreenElement] {
        &self.children
    }

    /// Width including all trivia.
    pub fn width(&self) -> TextSize {
        self.width
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.annotations
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreenTokenData {
    kind: SyntaxKind,
    text: SmolStr,
    leading: GreenTrivia,
    trailing: GreenTrivia,
    missing: bool,
    annotations: Box<[SyntaxAnnotation]>,
}

impl GreenTokenData {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Token text without trivia.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn leading(&self) -> &GreenTrivia {
        &self.leading
    }

    pub fn trailing(&self) -> &GreenTrivia {
        &self.trailing
    }

    /// `true` for zero-width tokens inserted by error recovery.
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    pub fn text_len(&self) -> TextSize {
        self.text.as_str().text_len()
    }

    /// Width including leading and trailing trivia.
    pub fn width(&self) -> TextSize {
        self.leading.len() + self.text_len() + self.trailing.len()
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.annotations
    }
}

/// Append-only storage for the green elements of every tree generation.
///
/// Elements are never mutated or freed, so handles into older generations stay
/// valid for as long as the store lives.
#[derive(Debug, Default)]
pub struct SyntaxStore {
    nodes: Arena<GreenNodeData>,
    tokens: Arena<GreenTokenData>,
    annotations: AnnotationAllocator,
}

impl Index<GreenNodeId> for SyntaxStore {
    type Output = GreenNodeData;

    fn index(&self, index: GreenNodeId) -> &Self::Output {
        &self.nodes[index]
    }
}

impl Index<GreenTokenId> for SyntaxStore {
    type Output = GreenTokenData;

    fn index(&self, index: GreenTokenId) -> &Self::Output {
        &self.tokens[index]
    }
}

impl SyntaxStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: GreenNodeId) -> &GreenNodeData {
        &self.nodes[id]
    }

    pub fn token(&self, id: GreenTokenId) -> &GreenTokenData {
        &self.tokens[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Allocator for annotations created by tree edits.
    pub fn annotations(&self) -> &AnnotationAllocator {
        &self.annotations
    }

    pub fn element_kind(&self, element: GreenElement) -> SyntaxKind {
        match element {
            NodeOrToken::Node(node) => self.nodes[node].kind,
            NodeOrToken::Token(token) => self.tokens[token].kind,
        }
    }

    pub fn element_width(&self, element: GreenElement) -> TextSize {
        match element {
            NodeOrToken::Node(node) => self.nodes[node].width,
            NodeOrToken::Token(token) => self.tokens[token].width(),
        }
    }

    pub fn element_annotations(&self, element: GreenElement) -> &[SyntaxAnnotation] {
        match element {
            NodeOrToken::Node(node) => &self.nodes[node].annotations,
            NodeOrToken::Token(token) => &self.tokens[token].annotations,
        }
    }

    pub fn alloc_node(&mut self, kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNodeId {
        self.alloc_node_with(kind, children, Box::default())
    }

    fn alloc_node_with(
        &mut self,
        kind: SyntaxKind,
        children: Vec<GreenElement>,
        annotations: Box<[SyntaxAnnotation]>,
    ) -> GreenNodeId {
        let width = children.iter().map(|&child| self.element_width(child)).sum();
        self.nodes.alloc(GreenNodeData { kind, children: children.into(), width, annotations })
    }

    pub fn alloc_token(
        &mut self,
        kind: SyntaxKind,
        text: &str,
        leading: GreenTrivia,
        trailing: GreenTrivia,
    ) -> GreenTokenId {
        self.tokens.alloc(GreenTokenData {
            kind,
            text: text.into(),
            leading,
            trailing,
            missing: false,
            annotations: Box::default(),
        })
    }

    /// Allocates a punctuation or keyword token spelled the canonical way.
    pub fn alloc_fixed_token(
        &mut self,
        kind: SyntaxKind,
        leading: GreenTrivia,
        trailing: GreenTrivia,
    ) -> GreenTokenId {
        let text = kind.fixed_text().unwrap_or_default();
        self.alloc_token(kind, text, leading, trailing)
    }

    /// Allocates a zero-width token standing in for one the parser expected.
    pub fn missing_token(&mut self, kind: SyntaxKind) -> GreenTokenId {
        self.tokens.alloc(GreenTokenData {
            kind,
            text: SmolStr::default(),
            leading: GreenTrivia::empty(),
            trailing: GreenTrivia::empty(),
            missing: true,
            annotations: Box::default(),
        })
    }

    /// Copy of `node` with new children. Kind and annotations carry over.
    pub fn with_children(&mut self, node: GreenNodeId, children: Vec<GreenElement>) -> GreenNodeId {
        let data = &self.nodes[node];
        let (kind, annotations) = (data.kind, data.annotations.clone());
        self.alloc_node_with(kind, children, annotations)
    }

    /// Copy of `token` with new text. Trivia and annotations carry over.
    pub fn with_token_text(&mut self, token: GreenTokenId, text: &str) -> GreenTokenId {
        let data =
            GreenTokenData { text: text.into(), missing: false, ..self.tokens[token].clone() };
        self.tokens.alloc(data)
    }

    /// Copy of `token` with new trivia. Text and annotations carry over.
    pub fn with_trivia(
        &mut self,
        token: GreenTokenId,
        leading: GreenTrivia,
        trailing: GreenTrivia,
    ) -> GreenTokenId {
        let data = GreenTokenData { leading, trailing, ..self.tokens[token].clone() };
        self.tokens.alloc(data)
    }

    /// Copy of `element` carrying `annotations` in addition to its own.
    ///
    /// Returns `element` itself when nothing new would be added.
    pub fn with_additional_annotations(
        &mut self,
        element: GreenElement,
        annotations: impl IntoIterator<Item = SyntaxAnnotation>,
    ) -> GreenElement {
        let existing = self.element_annotations(element);
        let mut merged = existing.to_vec();
        for annotation in annotations {
            if !merged.contains(&annotation) {
                merged.push(annotation);
            }
        }
        if merged.len() == existing.len() {
            return element;
        }
        self.with_annotations(element, merged.into())
    }

    /// Copy of `element` without any annotation of the given kind.
    pub fn without_annotations(&mut self, element: GreenElement, kind: &str) -> GreenElement {
        let existing = self.element_annotations(element);
        if !existing.iter().any(|annotation| annotation.kind() == kind) {
            return element;
        }
        let kept =
            existing.iter().filter(|annotation| annotation.kind() != kind).cloned().collect();
        self.with_annotations(element, kept)
    }

    fn with_annotations(
        &mut self,
        element: GreenElement,
        annotations: Box<[SyntaxAnnotation]>,
    ) -> GreenElement {
        match element {
            NodeOrToken::Node(node) => {
                let data = GreenNodeData { annotations, ..self.nodes[node].clone() };
                NodeOrToken::Node(self.nodes.alloc(data))
            }
            NodeOrToken::Token(token) => {
                let data = GreenTokenData { annotations, ..self.tokens[token].clone() };
                NodeOrToken::Token(self.tokens.alloc(data))
            }
        }
    }

    /// Source text of the element including trivia.
    pub fn element_text(&self, element: GreenElement) -> String {
        let mut text = String::new();
        self.write_text(element, &mut text);
        text
    }

    fn write_text(&self, element: GreenElement, out: &mut String) {
        match element {
            NodeOrToken::Node(node) => {
                for &child in self.nodes[node].children.iter() {
                    self.write_text(child, out);
                }
            }
            NodeOrToken::Token(token) => {
                let data = &self.tokens[token];
                for piece in data.leading.pieces() {
                    out.push_str(&piece.text);
                }
                out.push_str(&data.text);
                for piece in data.trailing.pieces() {
                    out.push_str(&piece.text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn node_width_sums_children() {
        let mut store = SyntaxStore::new();
        let int =
            store.alloc_token(INT_KW, "int", GreenTrivia::empty(), GreenTrivia::whitespace(" "));
        let name = store.alloc_token(NAME, "i", GreenTrivia::empty(), GreenTrivia::empty());
        let semi = store.missing_token(SEMICOLON);
        let node = store.alloc_node(
            FIELD_DECL,
            vec![NodeOrToken::Token(int), NodeOrToken::Token(name), NodeOrToken::Token(semi)],
        );

        assert_eq!(store[node].width(), TextSize::new(5));
        assert!(store[semi].is_missing());
        assert_eq!(store.element_text(NodeOrToken::Node(node)), "int i");
    }

    #[test]
    fn annotations_survive_child_replacement() {
        let mut store = SyntaxStore::new();
        let name = store.alloc_token(NAME, "i", GreenTrivia::empty(), GreenTrivia::empty());
        let node = store.alloc_node(NAME_EXPR, vec![NodeOrToken::Token(name)]);
        let annotation = store.annotations().alloc("marker");

        let annotated = store
            .with_additional_annotations(NodeOrToken::Node(node), [annotation.clone()])
            .into_node()
            .unwrap();
        assert_ne!(annotated, node);

        let renamed = store.with_token_text(name, "_i");
        let replaced = store.with_children(annotated, vec![NodeOrToken::Token(renamed)]);
        assert_eq!(store[replaced].annotations(), &[annotation.clone()]);
        assert_eq!(store[replaced].width(), TextSize::new(2));

        let again = store.with_additional_annotations(NodeOrToken::Node(replaced), [annotation]);
        assert_eq!(again, NodeOrToken::Node(replaced));

        let stripped = store.without_annotations(again, "marker").into_node().unwrap();
        assert!(store[stripped].annotations().is_empty());
    }
}
