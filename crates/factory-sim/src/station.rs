//! Workstations and the shared supplier pool

use std::collections::VecDeque;

/// A product waiting in a station queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waiting {
    pub product: usize,
    pub since: f64,
}

/// One workstation: a single-capacity server with a FIFO queue and a parts bin
#[derive(Debug, Clone)]
pub struct Station {
    pub failure_probability: f64,
    pub repair_mean: f64,
    pub queue: VecDeque<Waiting>,
    /// Product currently holding the station
    pub current: Option<usize>,
    pub bin: u32,
    /// The current product holds the station but waits for parts
    pub starved: bool,
    pub busy_time: f64,
    pub downtime: f64,
    pub failures: u32,
    /// Products finished since the last failure check
    pub since_check: u32,
}

impl Station {
    pub fn new(failure_probability: f64, repair_mean: f64, bin_capacity: u32) -> Self {
        Self {
            failure_probability,
            repair_mean,
            queue: VecDeque::new(),
            current: None,
            bin: bin_capacity,
            starved: false,
            busy_time: 0.0,
            downtime: 0.0,
            failures: 0,
            since_check: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Take one part from the bin; `true` when the bin just ran empty
    pub fn take_part(&mut self) -> bool {
        self.bin = self.bin.saturating_sub(1);
        self.bin == 0
    }

    /// Count a finished product; `true` when a failure check is due
    pub fn finish_product(&mut self, check_interval: u32) -> bool {
        self.since_check += 1;
        if self.since_check >= check_interval {
            self.since_check = 0;
            true
        } else {
            false
        }
    }

    /// Record a failure repaired in `repair_time`
    pub fn fail(&mut self, repair_time: f64) {
        self.failures += 1;
        self.downtime += repair_time;
    }
}

/// Suppliers shared by every bin; requests are served first come first served
#[derive(Debug, Clone)]
pub struct SupplierPool {
    free: u32,
    waiting: VecDeque<(usize, f64)>,
    /// Time from request to refill, summed over all resupplies
    pub usage_time: f64,
}

impl SupplierPool {
    pub fn new(suppliers: u32) -> Self {
        Self {
            free: suppliers,
            waiting: VecDeque::new(),
            usage_time: 0.0,
        }
    }

    /// Ask for a supplier; `true` when one was free and is now taken
    pub fn request(&mut self, station: usize, now: f64) -> bool {
        if self.free > 0 {
            self.free -= 1;
            true
        } else {
            self.waiting.push_back((station, now));
            false
        }
    }

    /// Return a supplier and hand it to the oldest waiting request, if any
    pub fn release(&mut self) -> Option<(usize, f64)> {
        match self.waiting.pop_front() {
            Some(next) => Some(next),
            None => {
                self.free += 1;
                None
            }
        }
    }

    pub fn free(&self) -> u32 {
        self.free
    }
}
