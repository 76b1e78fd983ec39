//! Discrete-event simulation of one production day
//!
//! Products arrive at a fixed interval and visit one station per route stage.
//! A station serves one product at a time from a FIFO queue and consumes one
//! part per product; an empty bin is refilled by the shared supplier pool
//! while the next product waits at the station. Failures add repair time to
//! the station's downtime without blocking it. An accident stops the day.

use crate::event::{Event, EventQueue};
use crate::station::{Station, SupplierPool, Waiting};
use factory_common::{round2, DashError, Record, RejectCount, Result, WORKSTATION_COUNT};
use factory_config::SimulationConfig;
use rand::Rng;
use rand_distr::{Distribution, Exp1, Normal};
use tracing::trace;

/// Raw counters of one simulated day
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    pub completed: u64,
    pub rejected: u64,
    pub total_waiting_time: f64,
    pub supplier_usage_time: f64,
    pub busy_time: [f64; WORKSTATION_COUNT],
    pub downtime: [f64; WORKSTATION_COUNT],
    pub failures: [u32; WORKSTATION_COUNT],
    /// Time of the accident that stopped the day, if any
    pub accident_at: Option<f64>,
    /// Products that entered the line
    pub arrivals: usize,
}

impl DayOutcome {
    /// Finished products, completed or rejected
    pub fn products(&self) -> u64 {
        self.completed + self.rejected
    }

    /// The CSV row of this day; accident days carry only the sentinel
    pub fn to_record(&self, run: u32, config: &SimulationConfig) -> Record {
        if self.accident_at.is_some() {
            return Record::accident(run);
        }

        let products = self.products() as f64;
        let per_product = |value: f64| if products > 0.0 { value / products } else { 0.0 };
        let time = config.sim_time;
        let supplier_capacity = f64::from(config.supplier_count) * time;

        Record {
            run,
            total_completed: Some(self.completed as f64),
            total_rejected: RejectCount::Count(self.rejected as f64),
            total_products: Some(products),
            avg_waiting_time: Some(round2(per_product(self.total_waiting_time))),
            faulty_rate: Some(round2(per_product(self.rejected as f64) * 100.0)),
            supplier_occupancy: Some(round2(self.supplier_usage_time / supplier_capacity * 100.0)),
            occupancy: self.busy_time.map(|busy| Some(round2(busy / time * 100.0))),
            downtime: self.downtime.map(|down| Some(round2(down))),
        }
    }
}

/// State of one running day
pub struct DaySimulation<'a, R: Rng> {
    config: &'a SimulationConfig,
    rng: R,
    processing: Normal<f64>,
    resupply: Normal<f64>,
    now: f64,
    events: EventQueue,
    stations: Vec<Station>,
    suppliers: SupplierPool,
    /// Route stage of every product that entered the line
    stages: Vec<usize>,
    completed: u64,
    rejected: u64,
    total_waiting_time: f64,
    accident_at: Option<f64>,
}

impl<'a, R: Rng> DaySimulation<'a, R> {
    /// Prepare a day; `config` must already be validated
    pub fn new(config: &'a SimulationConfig, rng: R) -> Result<Self> {
        let processing = Normal::new(config.processing_mean, config.processing_std_dev)
            .map_err(|e| DashError::simulation(format!("Invalid processing time distribution: {e}")))?;
        let resupply = Normal::new(config.resupply_mean, config.resupply_std_dev)
            .map_err(|e| DashError::simulation(format!("Invalid resupply time distribution: {e}")))?;

        let stations = config
            .stations
            .iter()
            .map(|s| Station::new(s.failure_probability, s.repair_mean, config.bin_capacity))
            .collect();

        Ok(Self {
            config,
            rng,
            processing,
            resupply,
            now: 0.0,
            events: EventQueue::new(),
            stations,
            suppliers: SupplierPool::new(config.supplier_count),
            stages: Vec::new(),
            completed: 0,
            rejected: 0,
            total_waiting_time: 0.0,
            accident_at: None,
        })
    }

    /// Run until the end of the day or an accident
    pub fn run(mut self) -> DayOutcome {
        self.events.schedule(0.0, Event::Arrival);
        self.events
            .schedule(self.config.accident_check_interval, Event::AccidentCheck);

        while let Some((time, event)) = self.next_event() {
            self.now = time;
            self.handle(event);
            if self.accident_at.is_some() {
                break;
            }
        }

        self.outcome()
    }

    fn next_event(&mut self) -> Option<(f64, Event)> {
        // Events at the end of the day itself are not processed
        if self.events.peek_time()? >= self.config.sim_time {
            return None;
        }
        self.events.pop()
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Arrival => {
                let product = self.stages.len();
                self.stages.push(0);
                self.enqueue(product, 0);
                self.events
                    .schedule(self.now + self.config.arrival_interval, Event::Arrival);
            }
            Event::AccidentCheck => {
                if self.rng.gen::<f64>() < self.config.accident_probability {
                    trace!(time = self.now, "Accident stopped production");
                    self.accident_at = Some(self.now);
                } else {
                    self.events.schedule(
                        self.now + self.config.accident_check_interval,
                        Event::AccidentCheck,
                    );
                }
            }
            Event::ProcessingDone { station } => self.finish(station),
            Event::ResupplyDone {
                station,
                requested_at,
            } => self.refill(station, requested_at),
        }
    }

    fn pick_station(&mut self, stage: usize) -> usize {
        let choices = &self.config.route[stage];
        if choices.len() == 1 {
            choices[0]
        } else {
            choices[self.rng.gen_range(0..choices.len())]
        }
    }

    fn enqueue(&mut self, product: usize, stage: usize) {
        let station = self.pick_station(stage);
        self.stations[station].queue.push_back(Waiting {
            product,
            since: self.now,
        });
        self.try_start(station);
    }

    fn try_start(&mut self, station: usize) {
        let st = &mut self.stations[station];
        if !st.is_idle() {
            return;
        }
        let Some(next) = st.queue.pop_front() else {
            return;
        };
        st.current = Some(next.product);
        self.total_waiting_time += self.now - next.since;

        if st.bin > 0 {
            self.start_processing(station);
        } else {
            st.starved = true;
        }
    }

    fn start_processing(&mut self, station: usize) {
        if self.stations[station].take_part() && self.suppliers.request(station, self.now) {
            self.start_resupply(station, self.now);
        }

        let duration = self.processing.sample(&mut self.rng).abs();
        self.stations[station].busy_time += duration;
        self.events
            .schedule(self.now + duration, Event::ProcessingDone { station });
    }

    fn start_resupply(&mut self, station: usize, requested_at: f64) {
        let duration = self.resupply.sample(&mut self.rng).abs();
        self.events.schedule(
            self.now + duration,
            Event::ResupplyDone {
                station,
                requested_at,
            },
        );
    }

    fn refill(&mut self, station: usize, requested_at: f64) {
        self.suppliers.usage_time += self.now - requested_at;
        self.stations[station].bin = self.config.bin_capacity;

        if let Some((next, at)) = self.suppliers.release() {
            self.start_resupply(next, at);
        }

        let st = &mut self.stations[station];
        if st.starved {
            st.starved = false;
            self.start_processing(station);
        }
    }

    fn finish(&mut self, station: usize) {
        let check_due = self.stations[station].finish_product(self.config.failure_check_interval);
        if check_due && self.rng.gen::<f64>() < self.stations[station].failure_probability {
            let repair_time = self.rng.sample::<f64, _>(Exp1) * self.stations[station].repair_mean;
            self.stations[station].fail(repair_time);
            trace!(station, repair_time, "Workstation failed");
        }

        if let Some(product) = self.stations[station].current.take() {
            self.advance(product);
        }
        self.try_start(station);
    }

    fn advance(&mut self, product: usize) {
        let stage = self.stages[product] + 1;
        if stage < self.config.route.len() {
            self.stages[product] = stage;
            self.enqueue(product, stage);
        } else if self.rng.gen::<f64>() < self.config.reject_probability {
            self.rejected += 1;
        } else {
            self.completed += 1;
        }
    }

    fn outcome(self) -> DayOutcome {
        let stations = &self.stations;
        DayOutcome {
            completed: self.completed,
            rejected: self.rejected,
            total_waiting_time: self.total_waiting_time,
            supplier_usage_time: self.suppliers.usage_time,
            busy_time: std::array::from_fn(|i| stations.get(i).map_or(0.0, |s| s.busy_time)),
            downtime: std::array::from_fn(|i| stations.get(i).map_or(0.0, |s| s.downtime)),
            failures: std::array::from_fn(|i| stations.get(i).map_or(0, |s| s.failures)),
            accident_at: self.accident_at,
            arrivals: self.stages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(sim_time: f64) -> SimulationConfig {
        SimulationConfig {
            sim_time,
            accident_probability: 0.0,
            ..SimulationConfig::default()
        }
    }

    fn simulate(config: &SimulationConfig, seed: u64) -> DayOutcome {
        DaySimulation::new(config, StdRng::seed_from_u64(seed))
            .unwrap()
            .run()
    }

    #[test]
    fn test_same_seed_same_day() {
        let config = config(500.0);
        assert_eq!(simulate(&config, 7), simulate(&config, 7));
    }

    #[test]
    fn test_day_produces_output() {
        let outcome = simulate(&config(1000.0), 1);

        assert_eq!(outcome.arrivals, 2000);
        assert!(outcome.products() > 100);
        assert!(outcome.total_waiting_time > 0.0);
        assert!(outcome.supplier_usage_time > 0.0);
        assert!(outcome.busy_time.iter().all(|&busy| busy > 0.0));
        assert_eq!(outcome.accident_at, None);
    }

    #[test]
    fn test_first_station_is_the_bottleneck() {
        let config = config(1000.0);
        let record = simulate(&config, 3).to_record(1, &config);
        assert!(record.occupancy[0].unwrap() > 80.0);
    }

    #[test]
    fn test_rejection_probability_extremes() {
        let mut config = config(300.0);
        config.reject_probability = 0.0;
        let outcome = simulate(&config, 11);
        assert_eq!(outcome.rejected, 0);
        assert!(outcome.completed > 0);

        config.reject_probability = 1.0;
        let outcome = simulate(&config, 11);
        assert_eq!(outcome.completed, 0);
        assert!(outcome.rejected > 0);
    }

    #[test]
    fn test_no_failures_no_downtime() {
        let mut config = config(1000.0);
        for station in &mut config.stations {
            station.failure_probability = 0.0;
        }
        let outcome = simulate(&config, 5);
        assert!(outcome.downtime.iter().all(|&d| d == 0.0));
        assert!(outcome.failures.iter().all(|&f| f == 0));
    }

    #[test]
    fn test_certain_failures_add_downtime() {
        let mut config = config(1000.0);
        for station in &mut config.stations {
            station.failure_probability = 1.0;
        }
        let outcome = simulate(&config, 5);
        assert!(outcome.failures[0] > 0);
        assert!(outcome.downtime[0] > 0.0);
    }

    #[test]
    fn test_certain_accident_stops_the_day() {
        let mut config = config(1000.0);
        config.accident_probability = 1.0;
        let outcome = simulate(&config, 9);

        assert_eq!(outcome.accident_at, Some(100.0));
        assert_eq!(outcome.to_record(4, &config), Record::accident(4));
    }

    #[test]
    fn test_record_values() {
        let config = config(1000.0);
        let outcome = simulate(&config, 2);
        let record = outcome.to_record(12, &config);

        assert_eq!(record.run, 12);
        assert_eq!(record.total_completed, Some(outcome.completed as f64));
        assert_eq!(record.total_products, Some(outcome.products() as f64));
        let faulty = outcome.rejected as f64 / outcome.products() as f64 * 100.0;
        assert_eq!(record.faulty_rate, Some(round2(faulty)));
        assert_eq!(record.downtime[2], Some(round2(outcome.downtime[2])));
    }

    #[test]
    fn test_empty_day_has_zero_rates() {
        let config = config(1000.0);
        let outcome = DayOutcome {
            completed: 0,
            rejected: 0,
            total_waiting_time: 0.0,
            supplier_usage_time: 0.0,
            busy_time: [0.0; WORKSTATION_COUNT],
            downtime: [0.0; WORKSTATION_COUNT],
            failures: [0; WORKSTATION_COUNT],
            accident_at: None,
            arrivals: 0,
        };
        let record = outcome.to_record(1, &config);
        assert_eq!(record.avg_waiting_time, Some(0.0));
        assert_eq!(record.faulty_rate, Some(0.0));
    }
}
