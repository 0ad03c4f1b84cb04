//! Ordered, provenance-tracking rewrite passes over a whole compilation.

mod compilation;
mod error;
pub mod lint;
mod order;
mod pipeline;
mod suppress;
pub mod transformers;

pub use compilation::{Compilation, SyntaxTree};
pub use error::TransformError;
pub use order::{SortOutcome, sort};
pub use pipeline::{Pipeline, PipelineOutput};
pub use suppress::{DiagnosticSuppressor, SuppressionReport};

use strata_track::TrackingContext;

/// A whole-compilation rewrite pass.
///
/// Passes edit the trees through the [`TrackingContext`] so that diagnostics
/// raised against their output can be traced back to the original sources.
pub trait SourceTransformer {
    /// Fully qualified name, as referenced by ordering declarations.
    fn name(&self) -> &str;

    fn provider(&self) -> &str {
        "strata"
    }

    fn qualified_name(&self) -> String {
        format!("{}, {}", self.name(), self.provider())
    }

    fn transform(
        &self,
        compilation: &mut Compilation,
        tracking: &TrackingContext,
    ) -> Result<(), TransformError>;
}
