//! Property-style tests for the quantified invariants of spec §8
//! (invariants 1-4 and 7; invariants 5-6 live in `determinism.rs`).

use flowsim::{Configuration, DistributionKind, ServerSpec, Simulator, SourceSpec};
use proptest::prelude::*;

fn spec_strategy(
    kind: DistributionKind,
) -> impl Strategy<Value = Vec<(f64, DistributionKind)>> {
    prop::collection::vec((0.1f64..10.0, Just(kind)), 1..=3)
}

fn config_strategy() -> impl Strategy<Value = Configuration> {
    (
        1usize..=5,
        1usize..=20,
        spec_strategy(DistributionKind::Constant),
        spec_strategy(DistributionKind::Constant),
        any::<u64>(),
    )
        .prop_map(
            |(buffer_capacity, max_arrivals, source_params, server_params, seed)| Configuration {
                buffer_capacity,
                max_arrivals,
                max_time: Configuration::default_max_time(),
                seed,
                sources: source_params
                    .into_iter()
                    .enumerate()
                    .map(|(i, (parameter, distribution_kind))| SourceSpec {
                        id: i as u32,
                        parameter,
                        distribution_kind,
                    })
                    .collect(),
                servers: server_params
                    .into_iter()
                    .enumerate()
                    .map(|(i, (parameter, distribution_kind))| ServerSpec {
                        id: i as u32,
                        parameter,
                        distribution_kind,
                    })
                    .collect(),
            },
        )
}

proptest! {
    #[test]
    fn invariant_2_and_4_hold_at_termination(config in config_strategy()) {
        let mut sim = Simulator::new(config).unwrap();
        sim.run();

        let in_flight = sim.buffer_size()
            + (0..sim.server_states().len()).filter(|&i| sim.server_busy(i)).count();
        prop_assert_eq!(in_flight, 0);

        let metrics = sim.metrics();
        prop_assert_eq!(metrics.arrived(), metrics.refused() + metrics.completed());
    }

    #[test]
    fn invariant_3_refusal_probability_is_bounded(config in config_strategy()) {
        let buffer_capacity = config.buffer_capacity;
        let num_servers = config.servers.len();
        let max_arrivals = config.max_arrivals;

        let mut sim = Simulator::new(config).unwrap();
        sim.run();
        let metrics = sim.metrics();

        prop_assert!(metrics.refusal_probability() >= 0.0);
        prop_assert!(metrics.refusal_probability() <= 1.0);
        if buffer_capacity + num_servers >= max_arrivals {
            prop_assert_eq!(metrics.refusal_probability(), 0.0);
        }
    }

    #[test]
    fn invariant_1_and_7_hold_throughout(config in config_strategy()) {
        let capacity = config.buffer_capacity;
        let mut sim = Simulator::new(config).unwrap();
        for _ in 0..2000 {
            if sim.finished() {
                break;
            }
            sim.step();

            prop_assert!(sim.buffer_size() <= capacity);

            let busy_servers = (0..sim.server_states().len()).filter(|&i| sim.server_busy(i)).count();
            let in_flight = busy_servers + sim.buffer_size();
            let metrics = sim.metrics();
            prop_assert_eq!(metrics.arrived(), metrics.refused() + metrics.completed() + in_flight as u64);
        }
    }
}
