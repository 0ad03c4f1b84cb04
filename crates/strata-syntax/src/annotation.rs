//! Opaque markers carried by green nodes and tokens.
//!
//! An annotation is an integer handle plus a kind string. It survives every
//! rewrite that reuses the element it is attached to, which is what lets a
//! later generation of a tree be correlated with an earlier one.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use smol_str::SmolStr;

static NEXT_SPACE: AtomicU32 = AtomicU32::new(0);

/// Handle of an annotation. Unique across allocators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationId {
    space: u32,
    index: u32,
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}:{}", self.space, self.index)
    }
}

/// Monotonic source of annotation handles.
#[derive(Debug)]
pub struct AnnotationAllocator {
    space: u32,
    next: AtomicU32,
}

impl Default for AnnotationAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationAllocator {
    pub fn new() -> Self {
        Self { space: NEXT_SPACE.fetch_add(1, Ordering::Relaxed), next: AtomicU32::new(0) }
    }

    pub fn alloc_id(&self) -> AnnotationId {
        AnnotationId { space: self.space, index: self.next.fetch_add(1, Ordering::Relaxed) }
    }

    pub fn alloc(&self, kind: impl Into<SmolStr>) -> SyntaxAnnotation {
        SyntaxAnnotation { id: self.alloc_id(), kind: kind.into(), data: None }
    }

    pub fn alloc_with_data(
        &self,
        kind: impl Into<SmolStr>,
        data: impl Into<SmolStr>,
    ) -> SyntaxAnnotation {
        SyntaxAnnotation { id: self.alloc_id(), kind: kind.into(), data: Some(data.into()) }
    }

    /// Number of handles handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

/// An annotation attached to a syntax element.
///
/// Equality and hashing consider the handle and the kind only.
#[derive(Clone, Debug)]
pub struct SyntaxAnnotation {
    id: AnnotationId,
    kind: SmolStr,
    data: Option<SmolStr>,
}

impl SyntaxAnnotation {
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl PartialEq for SyntaxAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for SyntaxAnnotation {}

impl std::hash::Hash for SyntaxAnnotation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.kind.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocators_never_collide() {
        let first = AnnotationAllocator::new();
        let second = AnnotationAllocator::new();

        let a = first.alloc("tracking");
        let b = second.alloc("tracking");
        assert_ne!(a, b);
        assert_ne!(first.alloc_id(), a.id());
        assert_eq!(first.allocated(), 2);
    }

    #[test]
    fn equality_ignores_data() {
        let allocator = AnnotationAllocator::new();
        let annotation = allocator.alloc_with_data("rename", "i");
        let mut copy = annotation.clone();
        copy.data = Some("j".into());

        assert_eq!(annotation, copy);
        assert_eq!(annotation.data(), Some("i"));
    }
}
