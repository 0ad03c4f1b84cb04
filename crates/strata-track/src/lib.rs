//! Provenance tracking for rewritten syntax trees.
//!
//! Every rewrite leaves the previous tree generation intact in the shared
//! [`SyntaxStore`]. A [`TrackingContext`] stamps elements of the new generation
//! with annotations that point back at their counterpart in the previous one,
//! and resolves those pointers transitively to answer "where did this come
//! from" for nodes, tokens, locations and diagnostics.
//!
//! An element with no stamped ancestor is unchanged and maps to itself. An
//! element below an anchor stamped [`Descendants::Include`] maps by offset
//! translation relative to the anchor. An element below an anchor stamped
//! [`Descendants::Exclude`] has no counterpart.

use strata_syntax::{SyntaxElement, SyntaxNode, SyntaxStore};
use strata_text::FileId;

mod context;
mod edit;
mod remap;

pub use context::TrackingContext;
pub use remap::MappedDiagnostic;

/// Annotation kind used for tracking stamps.
pub const TRACKING_KIND: &str = "strata.tracking";

/// Whether the unannotated descendants of an anchor inherit its provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Descendants {
    /// The subtree below the anchor has the shape of the original subtree.
    Include,
    /// Only the anchor itself has a known original.
    Exclude,
}

/// What a tracking stamp points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedNode {
    /// Counterpart in the previous generation; `None` for synthetic elements.
    pub original: Option<SyntaxElement>,
    pub descendants: Descendants,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingState {
    /// No stamp on the element or any ancestor.
    Untracked,
    /// The element carries a stamp itself.
    TrackedSelf,
    /// The nearest stamped ancestor includes its descendants.
    TrackedViaAncestor,
    /// The nearest stamped ancestor excludes its descendants.
    Excluded,
}

/// Answer of a single step back through one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Nothing on the path to the root is stamped: the element is its own original.
    Unchanged,
    Mapped(SyntaxElement),
    /// The element is synthetic or its counterpart could not be located.
    Unmapped,
}

/// How locations that do not exactly cover a mappable element are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RemapPolicy {
    /// Remap only exact element or start/end token matches.
    #[default]
    Exact,
    /// Fall back to the range of the nearest enclosing element that maps.
    NearestMappedAncestor,
}

/// Gives the tracker access to the current generation of every file.
pub trait TreeSource {
    fn store(&self) -> &SyntaxStore;

    fn root(&self, file: FileId) -> Option<SyntaxNode>;
}
