//! Properties every simulated day satisfies, whatever the seed.

use factory_common::{check_sequence, Record};
use factory_config::SimulationConfig;
use factory_sim::Simulator;
use proptest::prelude::*;

fn config(seed: u64, sim_time: f64) -> SimulationConfig {
    SimulationConfig {
        runs: 2,
        sim_time,
        seed: Some(seed),
        accident_probability: 0.0,
        ..SimulationConfig::default()
    }
}

fn simulate(config: SimulationConfig) -> Vec<Record> {
    Simulator::new(config).unwrap().run().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn day_metrics_are_consistent(seed in any::<u64>(), sim_time in 100.0f64..600.0) {
        for record in simulate(config(seed, sim_time)) {
            let completed = record.total_completed.unwrap();
            let rejected = record.rejected().unwrap();
            prop_assert_eq!(record.total_products, Some(completed + rejected));

            let faulty = record.faulty_rate.unwrap();
            prop_assert!((0.0..=100.0).contains(&faulty));

            let supplier = record.supplier_occupancy.unwrap();
            prop_assert!((0.0..=100.0).contains(&supplier));

            prop_assert!(record.avg_waiting_time.unwrap() >= 0.0);
            for downtime in record.downtime {
                prop_assert!(downtime.unwrap() >= 0.0);
            }
        }
    }

    #[test]
    fn same_seed_same_dataset(seed in any::<u64>()) {
        prop_assert_eq!(simulate(config(seed, 200.0)), simulate(config(seed, 200.0)));
    }
}

#[test]
fn dataset_is_a_valid_sequence() {
    let records = simulate(SimulationConfig {
        runs: 5,
        ..config(1, 250.0)
    });
    assert_eq!(records.len(), 5);
    assert!(check_sequence(&records).is_ok());
}

#[test]
fn single_supplier_still_resupplies() {
    let mut config = config(8, 1000.0);
    config.supplier_count = 1;
    let records = simulate(config);
    assert!(records[0].supplier_occupancy.unwrap() > 0.0);
    assert!(records[0].total_completed.unwrap() > 0.0);
}

#[test]
fn certain_accident_gives_accident_rows() {
    let mut config = config(3, 500.0);
    config.accident_probability = 1.0;
    let records = simulate(config);
    assert!(records.iter().all(Record::is_accident));
    assert_eq!(records[1], Record::accident(2));
}

#[test]
fn accident_check_after_day_end_never_fires() {
    let mut config = config(3, 100.0);
    config.accident_probability = 1.0;
    // The first check falls exactly on the end of the day
    let records = simulate(config);
    assert!(records.iter().all(|r| !r.is_accident()));
}
