use strata_errors::Diagnostic;
use strata_syntax::{NodeOrToken, SyntaxElement, SyntaxNode, SyntaxStore, TextRange, find_token};
use strata_text::Location;

use crate::{RemapPolicy, TrackingContext, TreeSource};

/// Result of projecting a diagnostic onto the original sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappedDiagnostic {
    /// No location, or the location's file is unknown.
    Unchanged(Diagnostic),
    Remapped(Diagnostic),
    /// The location has no counterpart in the original sources.
    Transformed(Diagnostic),
}

impl MappedDiagnostic {
    pub fn is_transformed(&self) -> bool {
        matches!(self, Self::Transformed(_))
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::Unchanged(diagnostic)
            | Self::Remapped(diagnostic)
            | Self::Transformed(diagnostic) => diagnostic,
        }
    }
}

impl TrackingContext {
    /// Projects a location in the current tree of its file onto the original
    /// source of that file.
    ///
    /// The location must cover exactly one mappable element, or run from the
    /// start of one mappable token to the end of another with the text in
    /// between unchanged in width. Anything else maps only under
    /// [`RemapPolicy::NearestMappedAncestor`].
    pub fn source_location(&self, trees: &impl TreeSource, location: Location) -> Option<Location> {
        let store = trees.store();
        let root = trees.root(location.file)?;
        if !root.full_range(store).contains_range(location.range) {
            return None;
        }

        let range = self
            .exact_source_range(store, &root, location.range)
            .or_else(|| self.token_pair_source_range(store, &root, location.range))
            .or_else(|| match self.policy() {
                RemapPolicy::Exact => None,
                RemapPolicy::NearestMappedAncestor => {
                    self.enclosing_source_range(store, &root, location.range)
                }
            });
        match range {
            Some(range) => Some(location.with_range(range)),
            None => {
                tracing::debug!(%location, "location has no source counterpart");
                None
            }
        }
    }

    /// Whether `location` lies in a known tree but has no source counterpart.
    pub fn is_transformed_location(&self, trees: &impl TreeSource, location: Location) -> bool {
        trees.root(location.file).is_some() && self.source_location(trees, location).is_none()
    }

    pub fn map_diagnostic(
        &self,
        trees: &impl TreeSource,
        diagnostic: Diagnostic,
    ) -> MappedDiagnostic {
        let Some(location) = diagnostic.location() else {
            return MappedDiagnostic::Unchanged(diagnostic);
        };
        if trees.root(location.file).is_none() {
            return MappedDiagnostic::Unchanged(diagnostic);
        }
        match self.source_location(trees, location) {
            Some(mapped) => MappedDiagnostic::Remapped(diagnostic.with_location(mapped)),
            None => MappedDiagnostic::Transformed(diagnostic),
        }
    }

    fn exact_source_range(
        &self,
        store: &SyntaxStore,
        root: &SyntaxNode,
        range: TextRange,
    ) -> Option<TextRange> {
        let element = element_with_range(store, root, range)?;
        Some(self.source_element(store, &element)?.range(store))
    }

    fn token_pair_source_range(
        &self,
        store: &SyntaxStore,
        root: &SyntaxNode,
        range: TextRange,
    ) -> Option<TextRange> {
        if range.is_empty() {
            return None;
        }
        let start = root.token_at_offset(store, range.start()).right_biased()?;
        let end = root.token_at_offset(store, range.end()).left_biased()?;
        if start.range(store).start() != range.start() || end.range(store).end() != range.end() {
            return None;
        }

        let source_start = self.source_token(store, &start)?;
        let source_end = self.source_token(store, &end)?;
        if source_start.parent().root() != source_end.parent().root() {
            return None;
        }
        let (from, to) = (source_start.range(store).start(), source_end.range(store).end());
        (from <= to && to - from == range.len()).then(|| TextRange::new(from, to))
    }

    fn enclosing_source_range(
        &self,
        store: &SyntaxStore,
        root: &SyntaxNode,
        range: TextRange,
    ) -> Option<TextRange> {
        let covering = root.covering_element(store, range);
        let token = covering.as_token().cloned().map(NodeOrToken::Token);
        token
            .into_iter()
            .chain(covering.ancestors().map(NodeOrToken::Node))
            .find_map(|element| self.source_element(store, &element))
            .map(|source| source.range(store))
    }
}

/// The innermost element whose range, without outer trivia, equals `range`.
fn element_with_range(
    store: &SyntaxStore,
    root: &SyntaxNode,
    range: TextRange,
) -> Option<SyntaxElement> {
    if range.is_empty() {
        let token = find_token(store, root, range.start(), true);
        if let Some(token) = token.filter(|token| token.range(store) == range) {
            return Some(NodeOrToken::Token(token));
        }
    }

    let covering = root.covering_element(store, range);
    let token = covering.as_token().cloned().map(NodeOrToken::Token);
    token
        .into_iter()
        .chain(covering.ancestors().map(NodeOrToken::Node))
        .find(|element| element.range(store) == range)
}
