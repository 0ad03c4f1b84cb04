//! Recursive-descent parser producing lossless syntax trees.
//!
//! The parser never fails: unexpected tokens are wrapped in `ERROR` nodes and
//! expected-but-absent tokens are inserted as zero-width missing tokens, each
//! with a `Syntax` diagnostic.

use strata_errors::Diagnostic;
use strata_syntax::{GreenNodeId, SyntaxNode, SyntaxStore};
use strata_text::FileId;

mod directive;
mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// A parsed source file.
#[derive(Debug)]
pub struct Parse {
    pub root: SyntaxNode,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// A parsed piece of code meant to be spliced into an existing tree.
///
/// Diagnostics carry no location. Trivia after the first line break that
/// follows the fragment is not part of it.
#[derive(Debug)]
pub struct Fragment {
    pub green: GreenNodeId,
    pub diagnostics: Vec<Diagnostic>,
}

impl Fragment {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn parse(store: &mut SyntaxStore, file: FileId, text: &str) -> Parse {
    let mut parser = parser::Parser::new(Some(file), text);
    grammar::items::compilation_unit(&mut parser);
    let (green, diagnostics) = parser.build(store);
    Parse { root: SyntaxNode::new_root(green), diagnostics }
}

/// Parses a single field or method declaration.
pub fn parse_member(store: &mut SyntaxStore, text: &str) -> Fragment {
    fragment(store, text, grammar::items::member)
}

pub fn parse_statement(store: &mut SyntaxStore, text: &str) -> Fragment {
    fragment(store, text, grammar::exprs::stmt)
}

pub fn parse_expression(store: &mut SyntaxStore, text: &str) -> Fragment {
    fragment(store, text, |p| {
        grammar::exprs::expr(p);
    })
}

fn fragment(
    store: &mut SyntaxStore,
    text: &str,
    grammar: impl FnOnce(&mut parser::Parser<'_>),
) -> Fragment {
    let mut parser = parser::Parser::new(None, text);
    grammar(&mut parser);
    if !parser.at(strata_syntax::SyntaxKind::EOF) {
        parser.error("unexpected text after the fragment");
    }
    let (green, diagnostics) = parser.build(store);
    Fragment { green, diagnostics }
}
