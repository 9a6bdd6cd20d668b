//! Property suites: random bijection compositions must keep every map
//! invariant green and the size laws exact.

mod common;

use planarium_core::{
    MapChecker, SampleContext, merge_in_parallel, merge_in_series, replace_u_atoms,
};
use proptest::prelude::*;

use common::path_network;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_compositions_stay_consistent(
        steps in prop::collection::vec((1usize..5, any::<bool>()), 1..6),
        seed in any::<u64>(),
    ) {
        let mut ctx = SampleContext::new(seed);
        let (first_len, _) = steps[0];
        let mut network = path_network(&mut ctx, first_len);
        let mut expected_u = network.u_size();
        let mut expected_l = network.l_size();

        for &(len, parallel) in &steps[1..] {
            let next = path_network(&mut ctx, len);
            expected_u += next.u_size() + 1;
            expected_l += next.l_size() + usize::from(!parallel);
            network = if parallel {
                merge_in_parallel(network, next).expect("parallel merge succeeds")
            } else {
                merge_in_series(network, next).expect("series merge succeeds")
            };
        }

        prop_assert_eq!(network.u_size(), expected_u);
        prop_assert_eq!(network.l_size(), expected_l);
        prop_assert!(
            MapChecker::new(network.graph().arena(), network.zero_pole())
                .check_all()
                .is_ok()
        );
    }

    #[test]
    fn bulk_substitution_keeps_maps_consistent(
        len in 2usize..6,
        plug_len in 1usize..4,
        seed in any::<u64>(),
    ) {
        let mut ctx = SampleContext::new(seed);
        let mut graph = path_network(&mut ctx, len).into_graph();
        let before_u = graph.u_size();

        let substituted =
            replace_u_atoms(&mut graph, &[], || Ok(path_network(&mut ctx, plug_len)))
                .expect("bulk substitution succeeds");

        prop_assert_eq!(substituted, len);
        // Each substitution trades one edge for the plug's path plus its
        // root edge.
        prop_assert_eq!(graph.u_size(), before_u + len * plug_len);
        prop_assert!(
            MapChecker::new(graph.arena(), graph.root())
                .check_all()
                .is_ok()
        );
    }
}
