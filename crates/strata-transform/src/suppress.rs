use strata_errors::Diagnostic;
use strata_track::{MappedDiagnostic, TrackingContext, TreeSource};

/// Counts of what [`DiagnosticSuppressor::apply`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuppressionReport {
    pub unchanged: usize,
    pub remapped: usize,
    /// Diagnostics located only in generated code, as raised.
    pub suppressed: Vec<Diagnostic>,
}

/// Projects diagnostics raised against transformed trees onto the original
/// sources and drops those with no place there.
pub struct DiagnosticSuppressor<'a> {
    tracking: &'a TrackingContext,
}

impl<'a> DiagnosticSuppressor<'a> {
    pub fn new(tracking: &'a TrackingContext) -> Self {
        Self { tracking }
    }

    pub fn apply(
        &self,
        trees: &impl TreeSource,
        diagnostics: impl IntoIterator<Item = Diagnostic>,
    ) -> (Vec<Diagnostic>, SuppressionReport) {
        let mut kept = Vec::new();
        let mut report = SuppressionReport::default();
        for diagnostic in diagnostics {
            match self.tracking.map_diagnostic(trees, diagnostic) {
                MappedDiagnostic::Unchanged(diagnostic) => {
                    report.unchanged += 1;
                    kept.push(diagnostic);
                }
                MappedDiagnostic::Remapped(diagnostic) => {
                    report.remapped += 1;
                    kept.push(diagnostic);
                }
                MappedDiagnostic::Transformed(diagnostic) => {
                    tracing::debug!(%diagnostic, "suppressed diagnostic in generated code");
                    report.suppressed.push(diagnostic);
                }
            }
        }
        (kept, report)
    }
}
