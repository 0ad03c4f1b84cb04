//! Structured form of `#` directive trivia.

use strata_syntax::SyntaxKind::{self, *};
use strata_syntax::{Builder, GreenNodeId, GreenTrivia, SyntaxStore, TriviaPiece};
use strata_tokenizer::{RawTrivia, tokenize_directive};

pub(crate) fn build(store: &mut SyntaxStore, text: &str) -> GreenNodeId {
    let tokens = tokenize_directive(text);
    let keyword =
        tokens.iter().find(|token| token.kind == NAME).map(|token| &text[token.kind_range]);

    let mut builder = Builder::new(store);
    builder.start_node(directive_kind(keyword));
    for token in &tokens {
        if token.kind == EOF && token.full_range().is_empty() {
            continue;
        }
        let leading = trivia(text, &token.leading);
        let trailing = trivia(text, &token.trailing);
        builder.token(token.kind, &text[token.kind_range], leading, trailing);
    }
    builder.finish_node();
    builder.finish()
}

fn directive_kind(keyword: Option<&str>) -> SyntaxKind {
    match keyword {
        Some("pragma") => PRAGMA_DIRECTIVE,
        Some("region") => REGION_DIRECTIVE,
        Some("endregion") => END_REGION_DIRECTIVE,
        _ => BAD_DIRECTIVE,
    }
}

fn trivia(text: &str, raw: &[RawTrivia]) -> GreenTrivia {
    GreenTrivia::new(
        raw.iter().map(|piece| TriviaPiece::new(piece.kind, &text[piece.range])).collect(),
    )
}
