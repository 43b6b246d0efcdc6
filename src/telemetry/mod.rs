//! Telemetry for layerbudget
//!
//! Collects solve events and aggregate statistics across an allocator's
//! lifetime. Cheap to clone; clones share the same buffers.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::solution::SolverKind;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum SolveEvent {
    SolveStarted {
        solver: SolverKind,
        layers: usize,
        configurations: u64,
        timestamp: Instant,
    },
    /// Rejected by the feasibility check before any solver ran
    FeasibilityRejected {
        min_cost: f64,
        budget: f64,
        timestamp: Instant,
    },
    SolveCompleted {
        solver: SolverKind,
        feasible: bool,
        evaluated: u64,
        duration_ms: u64,
        timestamp: Instant,
    },
    PrecisionLoss {
        grid_unit: f64,
        max_cost_rounding: f64,
        timestamp: Instant,
    },
    SolveCancelled {
        solver: SolverKind,
        after: u64,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveStats {
    pub solves_started: usize,
    pub solves_completed: usize,
    pub infeasible: usize,
    pub rejected_early: usize,
    pub exhaustive_runs: usize,
    pub dynamic_runs: usize,
    pub configurations_visited: u64,
    pub cells_evaluated: u64,
    pub precision_losses: usize,
    pub cancellations: usize,
    pub total_solve_ms: u64,
}

/// Telemetry collector
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<Vec<SolveEvent>>>,
    stats: Arc<Mutex<SolveStats>>,
    start_time: Instant,
}

// A panic while holding the lock leaves plain counters behind; keep using them
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(Mutex::new(SolveStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: SolveEvent) {
        {
            let mut stats = lock(&self.stats);
            match &event {
                SolveEvent::SolveStarted { solver, .. } => {
                    stats.solves_started += 1;
                    match solver {
                        SolverKind::Exhaustive => stats.exhaustive_runs += 1,
                        SolverKind::DynamicProgramming => stats.dynamic_runs += 1,
                    }
                }
                SolveEvent::FeasibilityRejected { .. } => {
                    stats.rejected_early += 1;
                    stats.infeasible += 1;
                }
                SolveEvent::SolveCompleted {
                    solver,
                    feasible,
                    evaluated,
                    duration_ms,
                    ..
                } => {
                    stats.solves_completed += 1;
                    stats.total_solve_ms += duration_ms;
                    if !feasible {
                        stats.infeasible += 1;
                    }
                    match solver {
                        SolverKind::Exhaustive => stats.configurations_visited += evaluated,
                        SolverKind::DynamicProgramming => stats.cells_evaluated += evaluated,
                    }
                }
                SolveEvent::PrecisionLoss { .. } => {
                    stats.precision_losses += 1;
                }
                SolveEvent::SolveCancelled { .. } => {
                    stats.cancellations += 1;
                }
            }
        }

        lock(&self.events).push(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> SolveStats {
        lock(&self.stats).clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<SolveEvent> {
        let events = lock(&self.events);
        let start = events.len().saturating_sub(n);
        events[start..].to_vec()
    }

    /// Share of completed solves that found a feasible configuration
    pub fn feasible_rate(&self) -> f64 {
        let stats = lock(&self.stats);
        let total = stats.solves_completed + stats.rejected_early;
        if total == 0 {
            1.0
        } else {
            (total - stats.infeasible) as f64 / total as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}
