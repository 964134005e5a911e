/*!
# Runner

Drives a [`Matcher`] to completion, counting steps and optionally measuring
wall time. Two modes exist:

- [`Runner::run_sync`] pulls steps as fast as possible.
- [`Runner::run_cooperative`] consumes steps in bursts and yields to the host
  scheduler between bursts so an interactive frontend stays responsive; a
  [`CancelToken`] is checked at every burst boundary.

Both modes verify the returned matching; a violation is a matcher bug and
aborts. Exceeding the step budget is a fatal runtime error reported as
[`RunError::StepBudget`].
*/

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use log::debug;
use thiserror::Error;

use crate::{
    algo::Matcher,
    edge::Weight,
    graph::Graph,
    matching::Matching,
    trace::TraceSink,
};

/// Default upper bound on steps per run.
pub const MAX_STEPS: u64 = 100_000_000;

/// Default number of steps consumed between two yields in cooperative mode.
pub const BURST_SIZE: u64 = 100_000;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub matching: Matching,
    /// Number of `advance` calls, including the finishing one.
    pub steps: u64,
    /// Total weight of the matching.
    pub score: Weight,
    /// Elapsed wall time, if measurement was enabled.
    pub wall_time_ms: Option<u64>,
}

/// Failures of a run. Invalid results are **not** errors but bugs and abort
/// instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    /// The matcher did not finish within the step budget.
    #[error("step budget of {0} steps exceeded")]
    StepBudget(u64),

    /// The cooperative run observed a cancellation; no partial matching is
    /// returned.
    #[error("run was cancelled")]
    Cancelled,
}

/// Shared flag to abort a cooperative run between bursts.
///
/// Cloning yields a handle onto the same flag, so one side can cancel while
/// the runner polls.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; takes effect at the next burst boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configurable driver for matcher runs.
///
/// # Examples
/// ```
/// use wmatch::prelude::*;
///
/// let g = Graph::from_edges(3, [Edge(0, 1, 1), Edge(1, 2, 1), Edge(0, 2, 10)]);
/// let outcome = Runner::new().run_sync(&g, &BlossomMatcher, &mut NoTrace).unwrap();
/// assert_eq!(outcome.score, 10);
/// assert!(outcome.steps > 0);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Runner {
    max_steps: u64,
    burst_size: u64,
    measure_time: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            max_steps: MAX_STEPS,
            burst_size: BURST_SIZE,
            measure_time: false,
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step budget (builder style).
    pub fn max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the cooperative burst size (builder style).
    pub fn burst_size(mut self, burst_size: u64) -> Self {
        assert!(burst_size > 0, "burst size must be positive");
        self.burst_size = burst_size;
        self
    }

    /// Enables wall-time measurement (builder style).
    pub fn measure_time(mut self, measure_time: bool) -> Self {
        self.measure_time = measure_time;
        self
    }

    /// Runs the matcher to completion without yielding.
    pub fn run_sync(
        &self,
        graph: &Graph,
        matcher: &dyn Matcher,
        trace: &mut dyn TraceSink,
    ) -> Result<RunOutcome, RunError> {
        self.drive(graph, matcher, trace, None)
    }

    /// Runs the matcher in bursts, yielding to the host scheduler between
    /// bursts and honoring `token`. On cancellation all intermediate state
    /// is dropped and no partial matching escapes.
    ///
    /// Produces the identical matching and step count as [`Runner::run_sync`]
    /// on the same input.
    pub fn run_cooperative(
        &self,
        graph: &Graph,
        matcher: &dyn Matcher,
        trace: &mut dyn TraceSink,
        token: &CancelToken,
    ) -> Result<RunOutcome, RunError> {
        self.drive(graph, matcher, trace, Some(token))
    }

    fn drive(
        &self,
        graph: &Graph,
        matcher: &dyn Matcher,
        trace: &mut dyn TraceSink,
        token: Option<&CancelToken>,
    ) -> Result<RunOutcome, RunError> {
        let start_time = self.measure_time.then(Instant::now);
        debug!("running matcher {}", matcher.name());

        let mut run = matcher.start(graph, trace);
        let mut steps: u64 = 0;

        let matching = 'outer: loop {
            // Burst boundary: cooperative runs poll for cancellation and
            // hand the thread back to the scheduler.
            if let Some(token) = token {
                if token.is_cancelled() {
                    return Err(RunError::Cancelled);
                }
            }
            if steps >= self.max_steps {
                return Err(RunError::StepBudget(self.max_steps));
            }

            let burst = if token.is_some() {
                self.burst_size
            } else {
                self.max_steps
            };
            for _ in 0..burst {
                if steps >= self.max_steps {
                    return Err(RunError::StepBudget(self.max_steps));
                }
                steps += 1;
                if let Some(matching) = run.advance() {
                    break 'outer matching;
                }
            }

            if token.is_some() {
                std::thread::yield_now();
            }
        };
        drop(run);

        // Post-run validity check: a violation here is a matcher bug.
        assert!(
            matching.is_valid(graph),
            "matcher {} produced an invalid matching",
            matcher.name()
        );

        let score = matching.score(graph);
        debug!(
            "matcher {} finished: score {score}, {steps} steps",
            matcher.name()
        );
        Ok(RunOutcome {
            matching,
            steps,
            score,
            wall_time_ms: start_time.map(|t| t.elapsed().as_millis() as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{BlossomMatcher, GreedyMatcher, MatcherKind};
    use crate::edge::Edge;
    use crate::testing::*;
    use crate::trace::NoTrace;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn sync_outcome() {
        let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
        let outcome = Runner::new()
            .measure_time(true)
            .run_sync(&g, &BlossomMatcher, &mut NoTrace)
            .unwrap();
        assert_eq!(outcome.score, 4);
        assert!(outcome.steps > 0);
        assert!(outcome.wall_time_ms.is_some());
    }

    #[test]
    fn sync_and_cooperative_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);
        let runner = Runner::new().burst_size(3);

        for _ in 0..5 {
            let g = random_mission(rng, 12, 50);
            for kind in MatcherKind::ALL {
                let matcher = kind.build();
                let sync = runner.run_sync(&g, matcher.as_ref(), &mut NoTrace).unwrap();
                let coop = runner
                    .run_cooperative(&g, matcher.as_ref(), &mut NoTrace, &CancelToken::new())
                    .unwrap();
                assert_eq!(sync.matching, coop.matching, "{kind:?}");
                assert_eq!(sync.steps, coop.steps, "{kind:?}");
            }
        }
    }

    #[test]
    fn step_budget_is_fatal() {
        let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
        let result = Runner::new()
            .max_steps(2)
            .run_sync(&g, &GreedyMatcher, &mut NoTrace);
        assert_eq!(result, Err(RunError::StepBudget(2)));
    }

    #[test]
    fn cancellation_returns_no_partial_matching() {
        let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
        let token = CancelToken::new();
        token.cancel();

        let result =
            Runner::new().run_cooperative(&g, &GreedyMatcher, &mut NoTrace, &token);
        assert_eq!(result, Err(RunError::Cancelled));
    }

    /// Trips the cancel token after a fixed number of step events, so the
    /// cancellation hits a burst boundary in the middle of a run.
    struct CancelAfter {
        token: CancelToken,
        remaining: u32,
    }

    impl crate::trace::TraceSink for CancelAfter {
        fn step(&mut self, _name: &str) {
            if self.remaining == 0 {
                self.token.cancel();
            } else {
                self.remaining -= 1;
            }
        }
    }

    #[test]
    fn mid_run_cancellation() {
        let rng = &mut Pcg64Mcg::seed_from_u64(2);
        let g = random_mission(rng, 30, 60);

        let token = CancelToken::new();
        let mut sink = CancelAfter {
            token: token.clone(),
            remaining: 4,
        };
        let result = Runner::new()
            .burst_size(1)
            .run_cooperative(&g, &GreedyMatcher, &mut sink, &token);
        assert_eq!(result, Err(RunError::Cancelled));
    }
}
