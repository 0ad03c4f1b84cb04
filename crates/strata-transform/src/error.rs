use strata_syntax::SyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("generated code `{text}` does not parse: {message}")]
    InvalidFragment { text: String, message: String },
    #[error("{0}")]
    Failed(String),
}
