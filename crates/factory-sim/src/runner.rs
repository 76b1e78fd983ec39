//! Runs whole simulated years, one seeded day at a time

use crate::engine::{DayOutcome, DaySimulation};
use factory_common::{DashError, Record, Result};
use factory_config::SimulationConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info, instrument};
use validator::Validate;

/// Simulates the production line for the configured number of days
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Create a simulator; the configuration is validated up front
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| DashError::validation(format!("Invalid simulation settings: {e}")))?;
        config
            .validate_line()
            .map_err(|e| DashError::validation(format!("Invalid production line: {e}")))?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Random source of day `run`: `seed + run` when seeded, entropy otherwise
    fn rng_for(&self, run: u32) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(run))),
            None => StdRng::from_entropy(),
        }
    }

    /// Simulate day `run` and return its raw counters
    pub fn run_day(&self, run: u32) -> Result<DayOutcome> {
        let outcome = DaySimulation::new(&self.config, self.rng_for(run))?.run();
        if let Some(time) = outcome.accident_at {
            debug!(run, time, "Day stopped by an accident");
        }
        Ok(outcome)
    }

    /// Simulate day `run` as a dataset row
    pub fn simulate_day(&self, run: u32) -> Result<Record> {
        Ok(self.run_day(run)?.to_record(run, &self.config))
    }

    /// Simulate every configured day, numbered from 1
    #[instrument(skip(self), fields(runs = self.config.runs, seeded = self.config.seed.is_some()))]
    pub fn run(&self) -> Result<Vec<Record>> {
        let started = Instant::now();
        let runs = self.config.runs;
        let progress_step = (runs / 10).max(1);

        let mut records = Vec::with_capacity(runs as usize);
        for run in 1..=runs {
            records.push(self.simulate_day(run)?);
            if run % progress_step == 0 {
                debug!(run, runs, "Simulation progress");
            }
        }

        let accidents = records.iter().filter(|r| r.is_accident()).count();
        info!(
            days = records.len(),
            accidents,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Simulation finished"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> SimulationConfig {
        SimulationConfig {
            runs: 3,
            sim_time: 300.0,
            seed: Some(42),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_invalid_line_rejected() {
        let mut config = short_config();
        config.route = vec![vec![0], vec![0]];
        let err = Simulator::new(config).unwrap_err();
        assert!(err.to_string().contains("production line"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = short_config();
        config.supplier_count = 0;
        assert!(Simulator::new(config).is_err());
    }

    #[test]
    fn test_runs_numbered_from_one() {
        let records = Simulator::new(short_config()).unwrap().run().unwrap();
        let runs: Vec<u32> = records.iter().map(|r| r.run).collect();
        assert_eq!(runs, vec![1, 2, 3]);
    }

    #[test]
    fn test_days_use_distinct_seeds() {
        let simulator = Simulator::new(short_config()).unwrap();
        assert_ne!(simulator.run_day(1).unwrap(), simulator.run_day(2).unwrap());
        assert_eq!(simulator.run_day(2).unwrap(), simulator.run_day(2).unwrap());
    }
}
