//! Invariant 5 (bit-identical reruns) and invariant 6 (seed independence)
//! from spec §8.

use std::rc::Rc;

use flowsim::{
    CollectingObserver, Configuration, DistributionKind, ServerSpec, SimEvent, Simulator,
    SourceSpec,
};

fn exponential_config(source_rate: f64, seed: u64) -> Configuration {
    Configuration {
        buffer_capacity: 4,
        max_arrivals: 50,
        max_time: Configuration::default_max_time(),
        seed,
        sources: vec![
            SourceSpec {
                id: 0,
                parameter: source_rate,
                distribution_kind: DistributionKind::Exponential,
            },
            SourceSpec {
                id: 1,
                parameter: 0.8,
                distribution_kind: DistributionKind::Exponential,
            },
        ],
        servers: vec![
            ServerSpec {
                id: 0,
                parameter: 1.0,
                distribution_kind: DistributionKind::Exponential,
            },
            ServerSpec {
                id: 1,
                parameter: 1.2,
                distribution_kind: DistributionKind::Exponential,
            },
        ],
    }
}

fn run_and_collect(config: Configuration) -> (flowsim::Metrics, Vec<SimEvent>) {
    let mut sim = Simulator::new(config).unwrap();
    let collector = Rc::new(CollectingObserver::new());
    sim.add_observer(collector.clone());
    sim.run();
    (sim.metrics(), collector.events())
}

#[test]
fn two_runs_of_the_same_config_are_bit_identical() {
    let (metrics_a, events_a) = run_and_collect(exponential_config(1.5, 4242));
    let (metrics_b, events_b) = run_and_collect(exponential_config(1.5, 4242));

    assert_eq!(events_a, events_b);
    assert_eq!(metrics_a.arrived(), metrics_b.arrived());
    assert_eq!(metrics_a.completed(), metrics_b.completed());
    assert_eq!(metrics_a.refused(), metrics_b.refused());
    assert_eq!(metrics_a.avg_waiting_time(), metrics_b.avg_waiting_time());
    assert_eq!(metrics_a.avg_service_time(), metrics_b.avg_service_time());
}

/// Source 1's arrival stream is entirely self-contained: every
/// `schedule_next` call it makes depends only on its own previous arrival
/// time and its own generator, never on source 0. So its sequence of
/// arrival timestamps (up to whichever run's arrival cap truncates it
/// first) must be identical whether or not source 0's parameter changes.
#[test]
fn changing_one_sources_parameter_leaves_the_other_sources_stream_unchanged() {
    let base = exponential_config(1.5, 7777);
    let mut changed = base.clone();
    changed.sources[0].parameter = 9.0;

    let (_, events_base) = run_and_collect(base);
    let (_, events_changed) = run_and_collect(changed);

    let source1_arrivals = |events: &[SimEvent]| -> Vec<f64> {
        events
            .iter()
            .filter_map(|event| match *event {
                SimEvent::Arrival {
                    source_id: 1, time, ..
                } => Some(time),
                _ => None,
            })
            .collect()
    };

    let base_arrivals = source1_arrivals(&events_base);
    let changed_arrivals = source1_arrivals(&events_changed);
    let n = base_arrivals.len().min(changed_arrivals.len());
    assert!(n > 0, "expected at least one arrival from source 1");
    assert_eq!(&base_arrivals[..n], &changed_arrivals[..n]);
}

/// With a single source and single server sized so the buffer can never
/// overflow, every arrival is eventually served, so the server's
/// distribution is sampled exactly `max_arrivals` times in both runs
/// regardless of the source's inter-arrival parameter — isolating the
/// server's stream from the source's.
#[test]
fn server_stream_is_independent_of_source_parameter() {
    fn single_lane_config(source_rate: f64) -> Configuration {
        Configuration {
            buffer_capacity: 20,
            max_arrivals: 20,
            max_time: Configuration::default_max_time(),
            seed: 123,
            sources: vec![SourceSpec {
                id: 0,
                parameter: source_rate,
                distribution_kind: DistributionKind::Exponential,
            }],
            servers: vec![ServerSpec {
                id: 0,
                parameter: 1.0,
                distribution_kind: DistributionKind::Exponential,
            }],
        }
    }

    let (_, events_base) = run_and_collect(single_lane_config(1.0));
    let (_, events_changed) = run_and_collect(single_lane_config(4.0));

    let service_durations = |events: &[SimEvent]| -> Vec<f64> {
        events
            .iter()
            .filter_map(|event| match *event {
                SimEvent::ServiceEnd { service, .. } => Some(service),
                _ => None,
            })
            .collect()
    };

    assert_eq!(service_durations(&events_base), service_durations(&events_changed));
}
