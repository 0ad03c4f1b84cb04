use std::collections::VecDeque;

use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxBuildHasher;
use strata_errors::{Diagnostic, DiagnosticCode};

use crate::SourceTransformer;

/// Result of ordering a set of transformers.
#[derive(Debug, Default)]
pub struct SortOutcome {
    /// `false` when a fatal ordering error was found; `order` is then empty.
    pub ok: bool,
    /// Registration indices in execution order.
    pub order: Vec<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SortOutcome {
    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self { ok: false, order: Vec::new(), diagnostics }
    }
}

/// Orders `transformers` so every declared order list is respected.
///
/// Each list in `orders` names transformers that must run in the given
/// sequence; `None` entries are gaps and are skipped. Transformers that end up
/// on the same layer run in registration order and are reported as not
/// ordered relative to each other.
pub fn sort(
    transformers: &[Box<dyn SourceTransformer>],
    orders: &[Vec<Option<String>>],
) -> SortOutcome {
    let mut by_name: IndexMap<&str, Vec<usize>, FxBuildHasher> = IndexMap::default();
    for (index, transformer) in transformers.iter().enumerate() {
        by_name.entry(transformer.name()).or_default().push(index);
    }

    let mut diagnostics = Vec::new();
    for (name, indices) in &by_name {
        if indices.len() > 1 {
            let qualified: Vec<String> =
                indices.iter().map(|&index| transformers[index].qualified_name()).collect();
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::TransformerNotUnique,
                format!("transformer name `{name}` is not unique: {}", qualified.join("; ")),
            ));
        }
    }

    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(transformers.len(), 0);
    for index in 0..transformers.len() {
        graph.add_node(index);
    }
    for order in orders {
        let mut resolved = Vec::with_capacity(order.len());
        for name in order.iter().flatten() {
            match by_name.get(name.as_str()) {
                Some(indices) => resolved.push(NodeIndex::new(indices[0])),
                None => diagnostics.push(Diagnostic::error(
                    DiagnosticCode::TransformerNotFound,
                    format!("transformer `{name}` was not found"),
                )),
            }
        }
        for pair in resolved.windows(2) {
            graph.update_edge(pair[0], pair[1], ());
        }
    }
    if !diagnostics.is_empty() {
        return SortOutcome::failed(diagnostics);
    }

    let Some(distance) = layer(&graph) else {
        for cycle in cycles(&graph) {
            let names: Vec<&str> = cycle.iter().map(|&index| transformers[index].name()).collect();
            tracing::debug!(?names, "transformer cycle");
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::TransformerCycleFound,
                format!("transformer cycle found: {}", names.join(", ")),
            ));
        }
        return SortOutcome::failed(diagnostics);
    };

    let mut order: Vec<usize> = (0..transformers.len()).collect();
    order.sort_by_key(|&index| (distance[index], index));
    for (position, &first) in order.iter().enumerate() {
        let tied = order[position + 1..].iter().take_while(|&&it| distance[it] == distance[first]);
        for &second in tied {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::TransformersNotOrdered,
                format!(
                    "transformers `{}` and `{}` are not ordered relative to each other",
                    transformers[first].name(),
                    transformers[second].name(),
                ),
            ));
        }
    }

    tracing::debug!(
        order = ?order.iter().map(|&index| transformers[index].name()).collect::<Vec<_>>(),
        "sorted transformers"
    );
    SortOutcome { ok: true, order, diagnostics }
}

/// Longest distance of every node from a node without predecessors, or `None`
/// when some node is unreachable because of a cycle.
fn layer(graph: &DiGraph<usize, ()>) -> Option<Vec<usize>> {
    let mut pending: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.neighbors_directed(node, Direction::Incoming).count())
        .collect();
    let mut distance = vec![0; graph.node_count()];
    let mut queue: VecDeque<NodeIndex> =
        graph.node_indices().filter(|node| pending[node.index()] == 0).collect();

    let mut visited = 0;
    while let Some(node) = queue.pop_front() {
        visited += 1;
        let mut successors: Vec<NodeIndex> = graph.neighbors(node).collect();
        successors.sort_unstable();
        for next in successors {
            distance[next.index()] = distance[next.index()].max(distance[node.index()] + 1);
            pending[next.index()] -= 1;
            if pending[next.index()] == 0 {
                queue.push_back(next);
            }
        }
    }
    (visited == graph.node_count()).then_some(distance)
}

/// Members of every cycle, each in registration order, cycles ordered by
/// their first member.
fn cycles(graph: &DiGraph<usize, ()>) -> Vec<Vec<usize>> {
    let mut cycles: Vec<Vec<usize>> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<usize> = scc.into_iter().map(|node| graph[node]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    cycles.sort_unstable();
    cycles
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::{Compilation, TransformError};
    use strata_track::TrackingContext;

    struct Named(&'static str, &'static str);

    impl SourceTransformer for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn provider(&self) -> &str {
            self.1
        }

        fn transform(
            &self,
            _: &mut Compilation,
            _: &TrackingContext,
        ) -> Result<(), TransformError> {
            Ok(())
        }
    }

    fn transformers(names: &[&'static str]) -> Vec<Box<dyn SourceTransformer>> {
        names
            .iter()
            .map(|&name| Box::new(Named(name, "tests")) as Box<dyn SourceTransformer>)
            .collect()
    }

    fn orders(lists: &[&[Option<&str>]]) -> Vec<Vec<Option<String>>> {
        lists.iter().map(|list| list.iter().map(|name| name.map(str::to_owned)).collect()).collect()
    }

    fn check(names: &[&'static str], lists: &[&[Option<&str>]], expect: Expect) {
        let transformers = transformers(names);
        let outcome = sort(&transformers, &orders(lists));
        let mut actual = format!("ok: {}\n", outcome.ok);
        actual += "order:";
        for &index in &outcome.order {
            actual += &format!(" {}", names[index]);
        }
        actual += "\n";
        for diagnostic in &outcome.diagnostics {
            actual += &format!("{diagnostic}\n");
        }
        expect.assert_eq(&actual);
    }

    #[test]
    fn chain() {
        check(
            &["C", "A", "B"],
            &[&[Some("A"), Some("B")], &[Some("B"), Some("C")]],
            expect![[r#"
                ok: true
                order: A B C
            "#]],
        );
    }

    #[test]
    fn gaps_are_skipped() {
        check(
            &["B", "A"],
            &[&[Some("A"), None, Some("B")], &[None]],
            expect![[r#"
                ok: true
                order: A B
            "#]],
        );
    }

    #[test]
    fn unrelated_transformers_keep_registration_order() {
        check(
            &["X", "Y"],
            &[],
            expect![[r#"
                ok: true
                order: X Y
                warning[STR0104]: transformers `X` and `Y` are not ordered relative to each other
            "#]],
        );
        check(
            &["X", "Y"],
            &[],
            expect![[r#"
                ok: true
                order: X Y
                warning[STR0104]: transformers `X` and `Y` are not ordered relative to each other
            "#]],
        );
    }

    #[test]
    fn same_layer_after_a_common_predecessor() {
        check(
            &["A", "B", "C", "D"],
            &[&[Some("A"), Some("C")], &[Some("A"), Some("B"), Some("D")]],
            expect![[r#"
                ok: true
                order: A B C D
                warning[STR0104]: transformers `B` and `C` are not ordered relative to each other
            "#]],
        );
    }

    #[test]
    fn cycle() {
        check(
            &["A", "B", "C", "D"],
            &[&[Some("A"), Some("B"), Some("C"), Some("A")], &[Some("C"), Some("D")]],
            expect![[r#"
                ok: false
                order:
                error[STR0102]: transformer cycle found: A, B, C
            "#]],
        );
    }

    #[test]
    fn self_cycle() {
        check(
            &["A", "B"],
            &[&[Some("A"), Some("A")]],
            expect![[r#"
                ok: false
                order:
                error[STR0102]: transformer cycle found: A
            "#]],
        );
    }

    #[test]
    fn unknown_name() {
        check(
            &["A"],
            &[&[Some("A"), Some("Missing")]],
            expect![[r#"
                ok: false
                order:
                error[STR0101]: transformer `Missing` was not found
            "#]],
        );
    }

    #[test]
    fn duplicate_name() {
        let transformers: Vec<Box<dyn SourceTransformer>> =
            vec![Box::new(Named("A", "first")), Box::new(Named("A", "second"))];
        let outcome = sort(&transformers, &[]);
        assert!(!outcome.ok);
        let messages: Vec<String> = outcome.diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            ["error[STR0103]: transformer name `A` is not unique: A, first; A, second"]
        );
    }
}
