use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
use strata_text::Location;
pub use strata_text::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Severity::Warning => Level::Warning,
            Severity::Error => Level::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    Syntax,
    DuplicateMember,
    MissingToken,
    TransformerNotFound,
    TransformerCycleFound,
    TransformerNotUnique,
    TransformersNotOrdered,
    TransformFailed,
}

impl DiagnosticCode {
    /// Stable identifier shown to users.
    pub fn id(self) -> &'static str {
        match self {
            DiagnosticCode::Syntax => "STR0001",
            DiagnosticCode::DuplicateMember => "STR0002",
            DiagnosticCode::MissingToken => "STR0003",
            DiagnosticCode::TransformerNotFound => "STR0101",
            DiagnosticCode::TransformerCycleFound => "STR0102",
            DiagnosticCode::TransformerNotUnique => "STR0103",
            DiagnosticCode::TransformersNotOrdered => "STR0104",
            DiagnosticCode::TransformFailed => "STR0105",
        }
    }
}

impl Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    code: DiagnosticCode,
    severity: Severity,
    message: String,
    location: Option<Location>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self { code, severity, message: message.into(), location: None }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }

    pub fn with_location(self, location: Location) -> Self {
        Self { location: Some(location), ..self }
    }

    pub fn without_location(self) -> Self {
        Self { location: None, ..self }
    }

    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn range(&self) -> Option<TextRange> {
        self.location.map(|location| location.range)
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let mut message = level.title(&self.message).id(self.code.id());
        if let Some(range) = self.range() {
            message = message.snippet(
                Snippet::source(text)
                    .origin(path)
                    .annotation(level.span(range.into()).label("here"))
                    .fold(true),
            );
        }
        renderer.render(message)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}[{}]: {}", self.code, self.message)?;
        if let Some(location) = self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strata_text::FileId;

    use super::*;

    #[test]
    fn display_includes_code_and_location() {
        let location = Location::new(FileId::new(0), TextRange::new(4.into(), 6.into()));
        let diagnostic =
            Diagnostic::error(DiagnosticCode::Syntax, "expected `;`").with_location(location);

        assert_eq!(diagnostic.to_string(), "error[STR0001]: expected `;` at file#0@4..6");
    }

    #[test]
    fn render_without_location_has_no_snippet() {
        let diagnostic = Diagnostic::warning(
            DiagnosticCode::TransformersNotOrdered,
            "transformers `a` and `b` are not ordered",
        );
        let renderer = Renderer::plain();
        let rendered = diagnostic.render(&renderer, "main.cs", "").to_string();

        assert!(rendered.starts_with("warning[STR0104]"), "{rendered}");
        assert!(!rendered.contains("main.cs"), "{rendered}");
    }
}
