//! Shared fixtures for the integration suites.
#![allow(dead_code)] // not every test binary uses every fixture

use planarium_core::{
    Color, HalfEdgeArena, HalfEdgeGraph, HalfEdgeId, Network, SampleContext, TraversalFilter,
    VertexId,
};

/// Installs a test-capture tracing subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// The single-edge network on two fresh poles.
pub fn link_network(ctx: &mut SampleContext) -> Network {
    Network::link_graph(ctx.next_vertex(), ctx.next_vertex())
}

/// A network whose non-root edges form a path of `edges` edges between the
/// poles, plus the root edge spanning them.
pub fn path_network(ctx: &mut SampleContext, edges: usize) -> Network {
    assert!(edges >= 1, "a path network needs at least one edge");
    let mut arena = HalfEdgeArena::new();
    let nodes: Vec<VertexId> = (0..=edges).map(|_| ctx.next_vertex()).collect();
    let color_of = |i: usize| if i % 2 == 0 { Color::Black } else { Color::White };
    let first_node = *nodes.first().expect("at least two path vertices");
    let last_node = *nodes.last().expect("at least two path vertices");

    let mut first_outgoing = None;
    let mut previous_incoming: Option<HalfEdgeId> = None;
    for (i, (&from, &to)) in nodes.iter().zip(nodes.iter().skip(1)).enumerate() {
        let outgoing = arena.create(from, color_of(i));
        if let Some(incoming) = previous_incoming {
            arena.insert_after(incoming, outgoing).expect("fresh");
        }
        let incoming = arena.create(to, color_of(i + 1));
        arena.pair(outgoing, incoming).expect("unpaired");
        first_outgoing.get_or_insert(outgoing);
        previous_incoming = Some(incoming);
    }

    let root = arena.create(first_node, color_of(0));
    arena
        .insert_after(first_outgoing.expect("at least one edge"), root)
        .expect("fresh");
    let root_opposite = arena.create(last_node, color_of(edges));
    arena
        .insert_after(previous_incoming.expect("at least one edge"), root_opposite)
        .expect("fresh");
    arena.pair(root, root_opposite).expect("unpaired");

    Network::new(HalfEdgeGraph::new(arena, root)).expect("root is paired")
}

/// The depth-3 binary tree of 15 bicolored half-edges: five vertices of
/// three half-edges each, four tree edges, seven boundary stubs.
pub fn colored_dissection_tree() -> HalfEdgeGraph {
    let mut arena = HalfEdgeArena::new();
    let mut fan = |node: u64, color: Color| {
        let a = arena.create(VertexId::new(node), color);
        let b = arena.create(VertexId::new(node), color);
        arena.insert_after(a, b).expect("fresh");
        let c = arena.create(VertexId::new(node), color);
        arena.insert_after(b, c).expect("fresh");
        (a, b, c)
    };
    let (h1, h2, h3) = fan(0, Color::Black);
    let (h4, h5, h6) = fan(1, Color::White);
    let (h7, _h8, _h9) = fan(2, Color::White);
    let (h10, _h11, _h12) = fan(3, Color::Black);
    let (h13, _h14, _h15) = fan(4, Color::Black);

    arena.pair(h2, h4).expect("unpaired");
    arena.pair(h3, h7).expect("unpaired");
    arena.pair(h5, h10).expect("unpaired");
    arena.pair(h6, h13).expect("unpaired");

    HalfEdgeGraph::new(arena, h1)
}

/// Unpaired half-edges reachable from the graph root.
pub fn stubs_of(graph: &HalfEdgeGraph) -> Vec<HalfEdgeId> {
    graph
        .arena()
        .all_half_edges(graph.root(), TraversalFilter::default())
        .into_iter()
        .filter(|&h| !graph.arena().is_paired(h))
        .collect()
}
