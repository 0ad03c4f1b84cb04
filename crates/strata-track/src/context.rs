use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use strata_syntax::ast::AstNode;
use strata_syntax::{
    AnnotationAllocator, AnnotationId, GreenElement, GreenNodeId, GreenTokenId, NodeOrToken,
    SyntaxAnnotation, SyntaxElement, SyntaxNode, SyntaxStore, SyntaxToken, TextRange,
    find_node_where, find_token,
};

use crate::{Descendants, MappedNode, Provenance, RemapPolicy, TRACKING_KIND, TrackingState};

const MAX_ANCESTOR_DEPTH: usize = 4096;
const MAX_GENERATIONS: usize = 4096;

/// Side table from tracking annotations to the elements they stand for.
///
/// One context serves one pipeline run. Stamps may be created from several
/// threads at once; entries are never changed after insertion.
#[derive(Debug)]
pub struct TrackingContext {
    annotations: AnnotationAllocator,
    mapped: DashMap<AnnotationId, MappedNode, FxBuildHasher>,
    policy: RemapPolicy,
}

impl Default for TrackingContext {
    fn default() -> Self {
        Self::new(RemapPolicy::default())
    }
}

impl TrackingContext {
    pub fn new(policy: RemapPolicy) -> Self {
        Self {
            annotations: AnnotationAllocator::new(),
            mapped: DashMap::with_hasher(FxBuildHasher),
            policy,
        }
    }

    pub fn policy(&self) -> RemapPolicy {
        self.policy
    }

    /// Number of stamps created so far.
    pub fn len(&self) -> usize {
        self.mapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapped.is_empty()
    }

    pub fn create_annotation(&self, mapped: MappedNode) -> SyntaxAnnotation {
        let annotation = self.annotations.alloc(TRACKING_KIND);
        self.mapped.insert(annotation.id(), mapped);
        annotation
    }

    /// The record behind `annotation`, if it was created by this context.
    pub fn mapped_node(&self, annotation: &SyntaxAnnotation) -> Option<MappedNode> {
        if annotation.kind() != TRACKING_KIND {
            return None;
        }
        self.mapped.get(&annotation.id()).map(|entry| entry.value().clone())
    }

    /// Copy of `green` carrying exactly one tracking stamp, recording `mapped`.
    pub fn stamp(
        &self,
        store: &mut SyntaxStore,
        green: GreenElement,
        mapped: MappedNode,
    ) -> GreenElement {
        let annotation = self.create_annotation(mapped);
        let green = store.without_annotations(green, TRACKING_KIND);
        store.with_additional_annotations(green, [annotation])
    }

    pub fn stamp_node(
        &self,
        store: &mut SyntaxStore,
        green: GreenNodeId,
        mapped: MappedNode,
    ) -> GreenNodeId {
        expect_node(self.stamp(store, NodeOrToken::Node(green), mapped))
    }

    /// Marks `green` as generated code without any original.
    pub fn mark_synthetic(&self, store: &mut SyntaxStore, green: GreenElement) -> GreenElement {
        self.stamp(store, green, MappedNode { original: None, descendants: Descendants::Exclude })
    }

    /// New root whose whole tree maps onto `root` one to one.
    ///
    /// Called on every root before a rewrite pass, so that each pass has the
    /// previous generation as its pre-transformation tree.
    pub fn track_root(&self, store: &mut SyntaxStore, root: &SyntaxNode) -> SyntaxNode {
        let mapped = MappedNode {
            original: Some(NodeOrToken::Node(root.clone())),
            descendants: Descendants::Include,
        };
        SyntaxNode::new_root(self.stamp_node(store, root.green(), mapped))
    }

    pub fn tracking_state(&self, store: &SyntaxStore, element: &SyntaxElement) -> TrackingState {
        match self.nearest_anchor(store, element) {
            None => TrackingState::Untracked,
            Some((anchor, _)) if anchor == *element => TrackingState::TrackedSelf,
            Some((_, mapped)) => match mapped.descendants {
                Descendants::Include => TrackingState::TrackedViaAncestor,
                Descendants::Exclude => TrackingState::Excluded,
            },
        }
    }

    /// Whether `node` would gain a stamp of its own from [`Self::track_if_needed`].
    pub fn needs_tracking(&self, store: &SyntaxStore, node: &SyntaxNode) -> bool {
        let element = NodeOrToken::Node(node.clone());
        self.tracking_state(store, &element) == TrackingState::TrackedViaAncestor
            && matches!(self.previous_element(store, &element), Provenance::Mapped(_))
    }

    /// Green of `node`, stamped with its translated counterpart when its
    /// provenance currently comes from an including ancestor.
    ///
    /// The result can be moved anywhere, including under excluding anchors,
    /// without losing its mapping.
    pub fn track_if_needed(&self, store: &mut SyntaxStore, node: &SyntaxNode) -> GreenNodeId {
        expect_node(self.track_element_if_needed(store, &NodeOrToken::Node(node.clone())))
    }

    pub fn track_token_if_needed(
        &self,
        store: &mut SyntaxStore,
        token: &SyntaxToken,
    ) -> GreenTokenId {
        match self.track_element_if_needed(store, &NodeOrToken::Token(token.clone())) {
            NodeOrToken::Token(green) => green,
            NodeOrToken::Node(_) => unreachable!("stamping keeps the element variant"),
        }
    }

    pub fn track_element_if_needed(
        &self,
        store: &mut SyntaxStore,
        element: &SyntaxElement,
    ) -> GreenElement {
        if self.tracking_state(store, element) != TrackingState::TrackedViaAncestor {
            return element.green();
        }
        match self.previous_element(store, element) {
            Provenance::Mapped(original) => {
                let mapped =
                    MappedNode { original: Some(original), descendants: Descendants::Include };
                self.stamp(store, element.green(), mapped)
            }
            Provenance::Unchanged | Provenance::Unmapped => element.green(),
        }
    }

    /// Stamps `green`, the edited form of `element`, so that only the element
    /// itself keeps its original.
    ///
    /// An existing stamp on `element` is rewrapped in exclude mode. Without
    /// one, the original is looked up through the ancestors.
    pub fn set_annotation_exclude_children(
        &self,
        store: &mut SyntaxStore,
        element: &SyntaxElement,
        green: GreenElement,
    ) -> GreenElement {
        let original = match self.own_stamp(store, element.green()) {
            Some((id, mapped)) => {
                let carried = self.own_stamp(store, green).is_some_and(|(it, _)| it == id);
                if mapped.descendants == Descendants::Exclude && carried {
                    return green;
                }
                mapped.original
            }
            None => match self.previous_element(store, element) {
                Provenance::Unchanged => Some(element.clone()),
                Provenance::Mapped(original) => Some(original),
                Provenance::Unmapped => None,
            },
        };
        self.stamp(store, green, MappedNode { original, descendants: Descendants::Exclude })
    }

    /// One step back: the counterpart of `element` in the generation its
    /// nearest stamp points into.
    pub fn previous_element(&self, store: &SyntaxStore, element: &SyntaxElement) -> Provenance {
        let Some((anchor, mapped)) = self.nearest_anchor(store, element) else {
            return Provenance::Unchanged;
        };
        let Some(original) = mapped.original else {
            return Provenance::Unmapped;
        };
        if anchor == *element {
            return Provenance::Mapped(original);
        }
        if mapped.descendants == Descendants::Exclude {
            return Provenance::Unmapped;
        }
        let NodeOrToken::Node(original) = original else {
            return Provenance::Unmapped;
        };

        let relative = element.offset() - anchor.offset();
        let target = TextRange::at(original.offset() + relative, element.width(store));
        let kind = element.kind(store);
        let located = match element {
            NodeOrToken::Node(_) => {
                find_node_where(store, &original, target, true, |node| node.kind(store) == kind)
                    .map(NodeOrToken::Node)
            }
            NodeOrToken::Token(_) => find_token(store, &original, target.start(), target.is_empty())
                .filter(|token| token.kind(store) == kind && token.full_range(store) == target)
                .map(NodeOrToken::Token),
        };
        match located {
            Some(found) => Provenance::Mapped(found),
            None => {
                tracing::trace!(?kind, ?target, "no counterpart at the translated range");
                Provenance::Unmapped
            }
        }
    }

    /// The counterpart of `element` in the oldest generation it can be traced
    /// back to, or `None` when it is generated code.
    pub fn source_element(
        &self,
        store: &SyntaxStore,
        element: &SyntaxElement,
    ) -> Option<SyntaxElement> {
        let mut current = element.clone();
        for _ in 0..MAX_GENERATIONS {
            match self.previous_element(store, &current) {
                Provenance::Unchanged => return Some(current),
                Provenance::Mapped(previous) => current = previous,
                Provenance::Unmapped => return None,
            }
        }
        tracing::warn!(limit = MAX_GENERATIONS, "provenance chain is too long");
        None
    }

    pub fn source_node(&self, store: &SyntaxStore, node: &SyntaxNode) -> Option<SyntaxNode> {
        self.source_element(store, &NodeOrToken::Node(node.clone()))?.into_node()
    }

    pub fn source_node_of<N: AstNode>(&self, store: &SyntaxStore, node: &N) -> Option<N> {
        N::cast(store, self.source_node(store, node.syntax())?)
    }

    pub fn source_token(&self, store: &SyntaxStore, token: &SyntaxToken) -> Option<SyntaxToken> {
        self.source_element(store, &NodeOrToken::Token(token.clone()))?.into_token()
    }

    /// The element itself if stamped, else its nearest stamped ancestor.
    fn nearest_anchor(
        &self,
        store: &SyntaxStore,
        element: &SyntaxElement,
    ) -> Option<(SyntaxElement, MappedNode)> {
        if let Some((_, mapped)) = self.own_stamp(store, element.green()) {
            return Some((element.clone(), mapped));
        }
        let parent = element.parent()?;
        parent.ancestors().take(MAX_ANCESTOR_DEPTH).find_map(|node| {
            let (_, mapped) = self.own_stamp(store, NodeOrToken::Node(node.green()))?;
            Some((NodeOrToken::Node(node), mapped))
        })
    }

    fn own_stamp(
        &self,
        store: &SyntaxStore,
        green: GreenElement,
    ) -> Option<(AnnotationId, MappedNode)> {
        store.element_annotations(green).iter().find_map(|annotation| {
            let mapped = self.mapped_node(annotation)?;
            Some((annotation.id(), mapped))
        })
    }
}

fn expect_node(green: GreenElement) -> GreenNodeId {
    match green {
        NodeOrToken::Node(green) => green,
        NodeOrToken::Token(_) => unreachable!("stamping keeps the element variant"),
    }
}
