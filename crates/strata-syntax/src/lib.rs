//! Lossless, immutable syntax trees stored in an append-only arena.
//!
//! Green elements are position-free and shared between tree generations; red
//! handles ([`SyntaxNode`], [`SyntaxToken`]) add absolute offsets and parent
//! links while descending from a root. Edits copy the path from the edited
//! element to the root and leave older generations intact.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod annotation;
mod builder;
mod edit;
mod error;
mod find;
mod green;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

pub use annotation::{AnnotationAllocator, AnnotationId, SyntaxAnnotation};
/// Incremental builder for constructing green trees.
pub use builder::Builder;
pub use error::SyntaxError;
pub use find::{
    annotated_elements, annotated_nodes, find_annotation, find_node, find_node_of,
    find_node_where, find_token, single_annotated_node, zero_width_tokens_at,
};
pub use green::{
    GreenElement, GreenNodeData, GreenNodeId, GreenTokenData, GreenTokenId, SyntaxStore,
};
/// Primary syntax tree API types and adapters.
pub use syntax::{
    NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxElementChildren, SyntaxNode,
    SyntaxToken, SyntaxTrivia, TokenAtOffset, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
pub use text_size::{TextRange, TextSize};
/// Trivia pieces attached to tokens.
pub use trivia::{GreenTrivia, TriviaPiece, TriviaPieceKind};
