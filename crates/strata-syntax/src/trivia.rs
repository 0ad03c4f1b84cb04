//! Trivia pieces attached to tokens.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::{TextLen, TextSize};

use crate::{GreenNodeId, SyntaxKind};

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
    /// A preprocessor-style line; carries a parsed structure.
    Directive,
}

impl TriviaPieceKind {
    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            TriviaPieceKind::Whitespace => SyntaxKind::WHITESPACE,
            TriviaPieceKind::Newline => SyntaxKind::NEWLINE,
            TriviaPieceKind::SingleLineComment => SyntaxKind::LINE_COMMENT,
            TriviaPieceKind::MultiLineComment => SyntaxKind::BLOCK_COMMENT,
            TriviaPieceKind::Directive => SyntaxKind::DIRECTIVE_TRIVIA,
        }
    }
}

/// A trivia fragment with its kind and text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub text: SmolStr,
    /// Root of the structured form, for directives.
    pub structure: Option<GreenNodeId>,
}

impl TriviaPiece {
    pub fn new(kind: TriviaPieceKind, text: impl Into<SmolStr>) -> Self {
        Self { kind, text: text.into(), structure: None }
    }

    pub fn structured(kind: TriviaPieceKind, text: impl Into<SmolStr>, root: GreenNodeId) -> Self {
        Self { kind, text: text.into(), structure: Some(root) }
    }

    pub fn len(&self) -> TextSize {
        self.text.as_str().text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered run of trivia pieces on one side of a token.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct GreenTrivia {
    pieces: Arc<[TriviaPiece]>,
    len: TextSize,
}

impl std::fmt::Debug for GreenTrivia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GreenTrivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

impl GreenTrivia {
    pub fn new(pieces: Vec<TriviaPiece>) -> Self {
        let len = pieces.iter().map(TriviaPiece::len).sum();
        Self { pieces: pieces.into(), len }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A single whitespace piece, the usual glue between synthesized tokens.
    pub fn whitespace(text: &str) -> Self {
        if text.is_empty() {
            return Self::empty();
        }
        Self::new(vec![TriviaPiece::new(TriviaPieceKind::Whitespace, text)])
    }

    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.pieces
    }

    pub fn text(&self) -> String {
        self.pieces.iter().map(|piece| piece.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_len_sums_pieces() {
        let trivia = GreenTrivia::new(vec![
            TriviaPiece::new(TriviaPieceKind::Whitespace, "  "),
            TriviaPiece::new(TriviaPieceKind::SingleLineComment, "// hi"),
            TriviaPiece::new(TriviaPieceKind::Newline, "\n"),
        ]);

        assert_eq!(trivia.len(), TextSize::new(8));
        assert_eq!(trivia.text(), "  // hi\n");
        assert_eq!(GreenTrivia::whitespace(""), GreenTrivia::empty());
    }
}
