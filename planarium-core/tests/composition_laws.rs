//! Algebraic laws of the bijections and derivation samplers.

mod common;

use planarium_core::{
    DecompositionGrammar, Derivation, EvaluationOracle, MapChecker, SampleContext, Sampler,
    SymbolicPoint, TraversalFilter, Value, complete_closure, merge_in_parallel, merge_in_series,
    replace_u_atoms, substitute_edge_by_network,
};

use common::{colored_dissection_tree, link_network, path_network};

#[test]
fn substituting_the_trivial_network_is_the_identity() {
    let mut ctx = SampleContext::new(0);
    let mut graph = path_network(&mut ctx, 3).into_graph();
    let (vertices, edges, u, l) = (
        graph.vertex_count(),
        graph.edge_count(),
        graph.u_size(),
        graph.l_size(),
    );

    let root = graph.root();
    let target = graph
        .arena()
        .all_half_edges(root, TraversalFilter::edges())
        .into_iter()
        .find(|&h| h != root && graph.arena().opposite(root) != Some(h))
        .expect("a non-root edge exists");
    substitute_edge_by_network(&mut graph, target, link_network(&mut ctx))
        .expect("substitution succeeds");

    assert_eq!(graph.vertex_count(), vertices);
    assert_eq!(graph.edge_count(), edges);
    assert_eq!(graph.u_size(), u);
    assert_eq!(graph.l_size(), l);
    MapChecker::new(graph.arena(), graph.root())
        .check_all()
        .expect("map stays consistent");
}

#[test]
fn replacing_every_u_atom_with_links_preserves_counts() {
    let mut ctx = SampleContext::new(1);
    let mut graph = path_network(&mut ctx, 4).into_graph();
    let (edges, u) = (graph.edge_count(), graph.u_size());

    let substituted = replace_u_atoms(&mut graph, &[], || Ok(link_network(&mut ctx)))
        .expect("bulk substitution succeeds");
    assert_eq!(substituted, 4, "four path edges, the root edge is spared");
    assert_eq!(graph.edge_count(), edges);
    assert_eq!(graph.u_size(), u);
}

#[test]
fn series_composition_is_associative_up_to_relabeling() {
    let mut ctx = SampleContext::new(2);
    let observables = |network: &planarium_core::Network| {
        (network.u_size(), network.l_size(), {
            let mut degrees = std::collections::HashMap::new();
            let arena = network.graph().arena();
            for h in arena.all_half_edges(network.zero_pole(), TraversalFilter::default()) {
                *degrees.entry(arena.node_nr(h)).or_insert(0usize) += 1;
            }
            let mut multiset: Vec<usize> = degrees.into_values().collect();
            multiset.sort_unstable();
            multiset
        })
    };

    let (a, b, c) = (
        path_network(&mut ctx, 1),
        path_network(&mut ctx, 2),
        path_network(&mut ctx, 3),
    );
    let left = merge_in_series(merge_in_series(a, b).expect("a·b"), c).expect("(a·b)·c");
    let (a, b, c) = (
        path_network(&mut ctx, 1),
        path_network(&mut ctx, 2),
        path_network(&mut ctx, 3),
    );
    let right = merge_in_series(a, merge_in_series(b, c).expect("b·c")).expect("a·(b·c)");

    assert_eq!(observables(&left), observables(&right));
}

#[test]
fn parallel_composition_is_commutative_up_to_relabeling() {
    let mut ctx = SampleContext::new(3);
    let (a, b) = (path_network(&mut ctx, 2), path_network(&mut ctx, 3));
    let ab = merge_in_parallel(a, b).expect("a‖b");
    let (a, b) = (path_network(&mut ctx, 2), path_network(&mut ctx, 3));
    let ba = merge_in_parallel(b, a).expect("b‖a");

    assert_eq!(ab.u_size(), ba.u_size());
    assert_eq!(ab.l_size(), ba.l_size());
}

#[test]
fn closing_a_closed_dissection_is_the_identity() {
    let mut graph = colored_dissection_tree();
    let mut ctx = SampleContext::new(4);
    complete_closure(&mut graph, &mut ctx).expect("first closure");

    let edges = graph.edge_count();
    let vertices = graph.vertex_count();
    let pairings = complete_closure(&mut graph, &mut ctx).expect("second closure");

    assert_eq!(pairings, 0);
    assert_eq!(graph.edge_count(), edges);
    assert_eq!(graph.vertex_count(), vertices);
}

fn to_u_derived(value: Value, _ctx: &mut SampleContext) -> planarium_core::Result<Value> {
    Ok(Value::Derived {
        kind: Derivation::Unlabeled,
        inner: Box::new(value),
    })
}

#[test]
fn l_from_u_derivation_flips_the_marker() {
    let oracle = EvaluationOracle::from_entries([("x", 0.5), ("y", 0.5), ("B(x,y)", 0.25)])
        .expect("valid oracle entries");
    let mut grammar = DecompositionGrammar::new(oracle);
    grammar
        .add_rule(
            "B",
            Sampler::retagging(Sampler::LAtom * Sampler::UAtom, to_u_derived),
        )
        .expect("fresh name");
    grammar
        .add_rule("A", Sampler::l_der_from_u_der(Sampler::alias("B"), 2.0))
        .expect("fresh name");
    grammar.init().expect("aliases resolve");

    let mut ctx = SampleContext::new(5);
    let point = SymbolicPoint::new("x", "y");
    // The candidate has one labeled atom and no free u-atoms, so the
    // acceptance weight is 1 and the first draw converts.
    let value = grammar.sample("A", point, &mut ctx).expect("samples");
    assert_eq!(value.derivation(), Some(Derivation::Labeled));
    assert_eq!(value.l_size(), 0);
    assert_eq!(value.u_size(), 1);
}
