use smol_str::SmolStr;
use text_size::TextRange;

use crate::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("{kind:?} at {range:?} is not a descendant of the edited root")]
    NodeNotFound { kind: SyntaxKind, range: TextRange },
    #[error("child range {start}..{end} is out of bounds for a node with {len} children")]
    ChildRangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("expected exactly one element annotated `{kind}`, found {count}")]
    AmbiguousAnnotation { kind: SmolStr, count: usize },
    #[error("the root node has no siblings and can only be replaced by a node")]
    RootEdit,
}
