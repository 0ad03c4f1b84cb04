//! Span and annotation lookups.

use text_size::{TextRange, TextSize};

use crate::annotation::SyntaxAnnotation;
use crate::ast::AstNode;
use crate::{SyntaxElement, SyntaxError, SyntaxNode, SyntaxStore, SyntaxToken};

/// The innermost node under `ancestor` (inclusive) whose full range equals `range`.
///
/// A probe at the very end of `ancestor` resolves through its last token. With
/// `include_zero_width`, empty ranges are resolved by scanning back through the
/// zero-width tokens sitting at the offset.
pub fn find_node(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    range: TextRange,
    include_zero_width: bool,
) -> Option<SyntaxNode> {
    find_node_where(store, ancestor, range, include_zero_width, |_| true)
}

/// Like [`find_node`], but walks outwards past same-range nodes until one casts to `N`.
pub fn find_node_of<N: AstNode>(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    range: TextRange,
    include_zero_width: bool,
) -> Option<N> {
    let node = find_node_where(store, ancestor, range, include_zero_width, |node| {
        N::can_cast(node.kind(store))
    })?;
    N::cast(store, node)
}

pub fn find_node_where(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    range: TextRange,
    include_zero_width: bool,
    mut accept: impl FnMut(&SyntaxNode) -> bool,
) -> Option<SyntaxNode> {
    let full = ancestor.full_range(store);
    if !full.contains_range(range) {
        return None;
    }

    let Some(probe) = probe_token(store, ancestor, range.start(), include_zero_width) else {
        return (full == range && accept(ancestor)).then(|| ancestor.clone());
    };

    let mut candidates = if include_zero_width && range.is_empty() {
        zero_width_tokens_before(store, ancestor, &probe, range.start())
    } else {
        Vec::new()
    };
    candidates.push(probe);

    candidates.iter().find_map(|token| {
        for node in token.ancestors() {
            let node_range = node.full_range(store);
            if node_range == range && accept(&node) {
                return Some(node);
            }
            if node_range.len() > range.len() || node == *ancestor {
                break;
            }
        }
        None
    })
}

/// The token starting at or covering `offset`.
///
/// With `include_zero_width`, the first zero-width token at `offset` wins over
/// a wider token starting at the same place.
pub fn find_token(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    offset: TextSize,
    include_zero_width: bool,
) -> Option<SyntaxToken> {
    let probe = probe_token(store, ancestor, offset, include_zero_width)?;
    if !include_zero_width {
        return Some(probe);
    }
    let earlier = zero_width_tokens_before(store, ancestor, &probe, offset);
    earlier.into_iter().next().or(Some(probe))
}

/// Every zero-width token under `ancestor` positioned at `offset`, in document order.
pub fn zero_width_tokens_at(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    offset: TextSize,
) -> Vec<SyntaxToken> {
    ancestor
        .descendant_tokens(store)
        .filter(|token| token.offset() == offset && token.width(store) == 0.into())
        .collect()
}

fn probe_token(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    offset: TextSize,
    include_zero_width: bool,
) -> Option<SyntaxToken> {
    if offset != ancestor.full_range(store).end() {
        return ancestor.token_at_offset(store, offset).right_biased();
    }

    let mut token = ancestor.last_token(store)?;
    if !include_zero_width {
        while token.width(store) == 0.into() {
            token = token.prev_token(store).filter(|prev| is_within(prev, ancestor))?;
        }
    }
    Some(token)
}

/// Zero-width tokens at `offset` that precede `token`, in document order.
fn zero_width_tokens_before(
    store: &SyntaxStore,
    ancestor: &SyntaxNode,
    token: &SyntaxToken,
    offset: TextSize,
) -> Vec<SyntaxToken> {
    let mut found = Vec::new();
    let mut current = token.clone();
    while let Some(prev) = current.prev_token(store) {
        if prev.width(store) != 0.into() || prev.offset() != offset || !is_within(&prev, ancestor) {
            break;
        }
        found.push(prev.clone());
        current = prev;
    }
    found.reverse();
    found
}

fn is_within(token: &SyntaxToken, ancestor: &SyntaxNode) -> bool {
    token.ancestors().any(|node| node == *ancestor)
}

/// Elements under `root` carrying an annotation of `kind`, in document order.
pub fn annotated_elements(
    store: &SyntaxStore,
    root: &SyntaxNode,
    kind: &str,
) -> Vec<SyntaxElement> {
    root.descendants_with_tokens(store)
        .filter(|element| element.annotations(store).iter().any(|it| it.kind() == kind))
        .collect()
}

pub fn annotated_nodes(store: &SyntaxStore, root: &SyntaxNode, kind: &str) -> Vec<SyntaxNode> {
    annotated_elements(store, root, kind).into_iter().filter_map(SyntaxElement::into_node).collect()
}

/// The only node carrying an annotation of `kind`.
pub fn single_annotated_node(
    store: &SyntaxStore,
    root: &SyntaxNode,
    kind: &str,
) -> Result<SyntaxNode, SyntaxError> {
    let mut nodes = annotated_nodes(store, root, kind);
    if nodes.len() != 1 {
        return Err(SyntaxError::AmbiguousAnnotation { kind: kind.into(), count: nodes.len() });
    }
    Ok(nodes.remove(0))
}

/// The element carrying exactly this annotation.
pub fn find_annotation(
    store: &SyntaxStore,
    root: &SyntaxNode,
    annotation: &SyntaxAnnotation,
) -> Option<SyntaxElement> {
    root.descendants_with_tokens(store)
        .find(|element| element.annotations(store).contains(annotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::{self, *};
    use crate::{GreenElement, GreenTrivia, NodeOrToken};

    fn token(
        store: &mut SyntaxStore,
        kind: SyntaxKind,
        text: &str,
        trailing: &str,
    ) -> GreenElement {
        let trailing = GreenTrivia::whitespace(trailing);
        NodeOrToken::Token(store.alloc_token(kind, text, GreenTrivia::empty(), trailing))
    }

    fn missing(store: &mut SyntaxStore, kind: SyntaxKind) -> GreenElement {
        NodeOrToken::Token(store.missing_token(kind))
    }

    /// `{ }` with an empty expression statement made of missing tokens between the braces.
    fn block_with_missing_statement(store: &mut SyntaxStore) -> SyntaxNode {
        let open = token(store, LEFT_BRACE, "{", " ");
        let name = missing(store, NAME);
        let name_expr = store.alloc_node(NAME_EXPR, vec![name]);
        let semi = missing(store, SEMICOLON);
        let stmt = store.alloc_node(EXPR_STMT, vec![NodeOrToken::Node(name_expr), semi]);
        let close = token(store, RIGHT_BRACE, "}", "");
        SyntaxNode::new_root(store.alloc_node(BLOCK, vec![open, NodeOrToken::Node(stmt), close]))
    }

    #[test]
    fn zero_width_ranges_resolve_to_innermost_node() {
        let mut store = SyntaxStore::new();
        let block = block_with_missing_statement(&mut store);
        let empty = TextRange::empty(2.into());

        let found = find_node(&store, &block, empty, true).unwrap();
        assert_eq!(found.kind(&store), NAME_EXPR);

        let stmt = find_node_where(&store, &block, empty, true, |n| n.kind(&store) == EXPR_STMT);
        assert_eq!(stmt.unwrap().kind(&store), EXPR_STMT);

        assert_eq!(find_node(&store, &block, empty, false), None);
        let whole = TextRange::new(0.into(), 3.into());
        assert_eq!(find_node(&store, &block, whole, false), Some(block));
    }

    #[test]
    fn typed_lookup_walks_out_to_the_requested_shape() {
        use crate::ast::{Block, NameExpr, Stmt};

        let mut store = SyntaxStore::new();
        let block = block_with_missing_statement(&mut store);
        let empty = TextRange::empty(2.into());

        let stmt = find_node_of::<Stmt>(&store, &block, empty, true).unwrap();
        assert_eq!(stmt.syntax().kind(&store), EXPR_STMT);
        let name = find_node_of::<NameExpr>(&store, &block, empty, true).unwrap();
        assert_eq!(name.syntax().kind(&store), NAME_EXPR);

        assert!(find_node_of::<Block>(&store, &block, empty, true).is_none());
        let whole = TextRange::new(0.into(), 3.into());
        let found = find_node_of::<Block>(&store, &block, whole, false).unwrap();
        assert_eq!(found.syntax(), &block);
    }

    #[test]
    fn zero_width_tokens_win_with_include_zero_width() {
        let mut store = SyntaxStore::new();
        let block = block_with_missing_statement(&mut store);

        let first = find_token(&store, &block, 2.into(), true).unwrap();
        assert_eq!(first.kind(&store), NAME);
        assert!(first.is_missing(&store));

        let wide = find_token(&store, &block, 2.into(), false).unwrap();
        assert_eq!(wide.kind(&store), RIGHT_BRACE);

        let zero: Vec<_> = zero_width_tokens_at(&store, &block, 2.into())
            .iter()
            .map(|token| token.kind(&store))
            .collect();
        assert_eq!(zero, [NAME, SEMICOLON]);
    }

    #[test]
    fn end_boundary_probes_use_the_last_token() {
        let mut store = SyntaxStore::new();
        let name = token(&mut store, NAME, "x", "");
        let name_expr = store.alloc_node(NAME_EXPR, vec![name]);
        let semi = missing(&mut store, SEMICOLON);
        let stmt = store.alloc_node(EXPR_STMT, vec![NodeOrToken::Node(name_expr), semi]);
        let root = SyntaxNode::new_root(stmt);

        let end = find_token(&store, &root, 1.into(), true).unwrap();
        assert_eq!(end.kind(&store), SEMICOLON);
        let end = find_token(&store, &root, 1.into(), false).unwrap();
        assert_eq!(end.kind(&store), NAME);

        let whole = TextRange::new(0.into(), 1.into());
        assert_eq!(find_node(&store, &root, whole, false).unwrap().kind(&store), NAME_EXPR);
        let outer = find_node_where(&store, &root, whole, false, |n| n.kind(&store) == EXPR_STMT);
        assert_eq!(outer, Some(root));
    }

    #[test]
    fn annotated_lookups() {
        let mut store = SyntaxStore::new();
        let block = block_with_missing_statement(&mut store);
        let marker = store.annotations().alloc("marker");

        assert_eq!(
            single_annotated_node(&store, &block, "marker"),
            Err(SyntaxError::AmbiguousAnnotation { kind: "marker".into(), count: 0 })
        );

        let stmt = block.children(&store).next().unwrap();
        let green = store
            .with_additional_annotations(NodeOrToken::Node(stmt.green()), [marker.clone()])
            .into_node()
            .unwrap();
        let block = store.replace_node(&block, &stmt, green).unwrap();

        let annotated = single_annotated_node(&store, &block, "marker").unwrap();
        assert_eq!(annotated.kind(&store), EXPR_STMT);
        assert_eq!(find_annotation(&store, &block, &marker), Some(NodeOrToken::Node(annotated)));
        assert!(annotated_elements(&store, &block, "other").is_empty());
    }
}
