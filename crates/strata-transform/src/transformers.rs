//! Transformers shipped with the driver.

mod rename_field;
mod trace_calls;

pub use rename_field::RenameField;
pub use trace_calls::TraceCalls;

use strata_syntax::{SyntaxKind, SyntaxNode, SyntaxStore, SyntaxToken, TextSize};

/// The token of `kind` whose range, without trivia, starts at `offset`.
///
/// Offsets before an edit stay valid for tokens in front of it, so passes
/// collect offsets first and edit from the end of the file backwards.
fn token_starting_at(
    store: &SyntaxStore,
    root: &SyntaxNode,
    offset: TextSize,
    kind: SyntaxKind,
) -> Option<SyntaxToken> {
    root.descendant_tokens(store)
        .find(|token| token.kind(store) == kind && token.range(store).start() == offset)
}
