use strata_syntax::ast::{AstNode, Block, CompilationUnit};
use strata_syntax::SyntaxKind::LEFT_BRACE;
use strata_syntax::{
    NodeOrToken, SyntaxNode, SyntaxStore, SyntaxToken, TextSize, TriviaPieceKind,
};
use strata_track::TrackingContext;

use super::token_starting_at;
use crate::{Compilation, SourceTransformer, TransformError};

const INDENT: &str = "    ";

/// Inserts `receiver.Enter("Method");` at the start of every method body.
///
/// The inserted statements are generated code; everything else in the body
/// keeps its provenance.
#[derive(Debug, Clone)]
pub struct TraceCalls {
    receiver: String,
}

struct Entry {
    brace: TextSize,
    text: String,
}

impl TraceCalls {
    pub fn new(receiver: impl Into<String>) -> Self {
        Self { receiver: receiver.into() }
    }

    fn entries(&self, store: &SyntaxStore, root: &SyntaxNode) -> Vec<Entry> {
        let mut entries = Vec::new();
        for class in CompilationUnit::new(root.clone()).types(store) {
            for method in class.methods(store) {
                let Some(body) = method.body(store) else { continue };
                let brace = body.l_brace(store).filter(|brace| !brace.is_missing(store));
                let Some(brace) = brace else { continue };
                let name = method.name(store).map_or("", |name| name.text(store));
                let call = format!("{}.Enter(\"{name}\");", self.receiver);
                let on_own_line = brace
                    .trailing_trivia(store)
                    .last()
                    .is_some_and(|piece| piece.kind(store) == TriviaPieceKind::Newline);
                let text = if on_own_line {
                    format!("{}{call}\n", indent(store, &body))
                } else {
                    format!("{call} ")
                };
                entries.push(Entry { brace: brace.range(store).start(), text });
            }
        }
        entries
    }
}

/// Indentation of the first statement, or one level inside the closing brace.
fn indent(store: &SyntaxStore, body: &Block) -> String {
    let first = body.statements(store).next().and_then(|stmt| stmt.syntax().first_token(store));
    if let Some(indent) = leading_whitespace(store, first) {
        return indent;
    }
    leading_whitespace(store, body.r_brace(store)).unwrap_or_default() + INDENT
}

fn leading_whitespace(store: &SyntaxStore, token: Option<SyntaxToken>) -> Option<String> {
    let trivia = token?.leading_trivia(store);
    let last = trivia.last()?;
    (last.kind(store) == TriviaPieceKind::Whitespace).then(|| last.text(store).to_owned())
}

impl SourceTransformer for TraceCalls {
    fn name(&self) -> &str {
        "strata.TraceCalls"
    }

    fn transform(
        &self,
        compilation: &mut Compilation,
        tracking: &TrackingContext,
    ) -> Result<(), TransformError> {
        for file in compilation.files() {
            let Some(tree) = compilation.tree(file) else { continue };
            let mut root = tree.root().clone();
            let entries = self.entries(compilation.store(), &root);

            let store = compilation.store_mut();
            for entry in entries.into_iter().rev() {
                let fragment = strata_parse::parse_statement(store, &entry.text);
                if let Some(diagnostic) = fragment.diagnostics.first() {
                    return Err(TransformError::InvalidFragment {
                        text: entry.text,
                        message: diagnostic.message().to_owned(),
                    });
                }
                let Some(brace) = token_starting_at(store, &root, entry.brace, LEFT_BRACE) else {
                    continue;
                };
                let statement = tracking.mark_synthetic(store, NodeOrToken::Node(fragment.green));
                root = tracking.insert_after(
                    store,
                    &root,
                    &NodeOrToken::Token(brace),
                    vec![statement],
                )?;
            }
            compilation.set_root(file, root);
        }
        Ok(())
    }
}
