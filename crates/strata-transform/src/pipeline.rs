use strata_errors::{Diagnostic, DiagnosticCode};
use strata_track::{RemapPolicy, TrackingContext};

use crate::{Compilation, SourceTransformer, TransformError, sort};

/// Transformers in execution order, ready to run over compilations.
pub struct Pipeline {
    transformers: Vec<Box<dyn SourceTransformer>>,
    ordered: bool,
    diagnostics: Vec<Diagnostic>,
    policy: RemapPolicy,
}

pub struct PipelineOutput {
    pub compilation: Compilation,
    /// Ordering diagnostics followed by one diagnostic per failed pass.
    pub diagnostics: Vec<Diagnostic>,
    /// Provenance of every tree in `compilation`.
    pub tracking: TrackingContext,
}

impl Pipeline {
    pub fn new(
        transformers: Vec<Box<dyn SourceTransformer>>,
        orders: &[Vec<Option<String>>],
        policy: RemapPolicy,
    ) -> Self {
        let outcome = sort(&transformers, orders);
        let mut slots: Vec<_> = transformers.into_iter().map(Some).collect();
        let transformers = outcome.order.iter().filter_map(|&index| slots[index].take()).collect();
        Self { transformers, ordered: outcome.ok, diagnostics: outcome.diagnostics, policy }
    }

    /// Whether ordering succeeded. An unordered pipeline runs no pass.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn ordering_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Names of the transformers in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transformers.iter().map(|transformer| transformer.name())
    }

    /// Runs every pass in order.
    ///
    /// Each pass starts from freshly stamped roots, so its input is the
    /// pre-transformation tree of everything it produces. A failing pass is
    /// rolled back and reported; later passes still run.
    pub fn run(&self, mut compilation: Compilation) -> PipelineOutput {
        let tracking = TrackingContext::new(self.policy);
        let mut diagnostics = self.diagnostics.clone();
        if !self.ordered {
            tracing::warn!("transformers could not be ordered, skipping every pass");
            return PipelineOutput { compilation, diagnostics, tracking };
        }

        for transformer in &self.transformers {
            compilation.track_roots(&tracking);
            let snapshot = compilation.roots();
            if let Err(error) = run_pass(transformer.as_ref(), &mut compilation, &tracking) {
                tracing::warn!(transformer = transformer.name(), %error, "pass failed");
                compilation.restore_roots(snapshot);
                diagnostics.push(Diagnostic::error(
                    DiagnosticCode::TransformFailed,
                    format!("transformer `{}` failed: {error}", transformer.name()),
                ));
            }
        }

        tracing::debug!(
            passes = self.transformers.len(),
            stamps = tracking.len(),
            "pipeline finished"
        );
        PipelineOutput { compilation, diagnostics, tracking }
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(transformer = transformer.name()))]
fn run_pass(
    transformer: &dyn SourceTransformer,
    compilation: &mut Compilation,
    tracking: &TrackingContext,
) -> Result<(), TransformError> {
    transformer.transform(compilation, tracking)
}
