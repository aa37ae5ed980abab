//! Monte Carlo fallback: shuffle everyone and test the whole ring.
//!
//! Slow, but makes no assumptions the graph heuristic could get wrong.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::graph::CompatibilityGraph;
use super::{Failure, SearchRun};

pub(crate) fn find_cycle<R: Rng + ?Sized>(
    graph: &CompatibilityGraph,
    rng: &mut R,
    max_attempts: u64,
    progress_interval: u64,
) -> SearchRun {
    let mut run = SearchRun {
        cycle: Err(Failure::BudgetExhausted),
        longest: Vec::new(),
        steps: 0,
    };
    if graph.len() < 2 {
        run.cycle = Err(Failure::TooFewParticipants);
        return run;
    }

    let mut order: Vec<usize> = (0..graph.len()).collect();
    for attempt in 0..max_attempts {
        if progress_interval > 0 && attempt % progress_interval == 0 {
            info!(round = attempt, "Brute-force search in progress");
        }

        order.shuffle(rng);
        run.steps = attempt + 1;
        if graph.is_cycle(&order) {
            info!(rounds = run.steps, "Found valid assignments");
            run.cycle = Ok(order);
            return run;
        }
    }

    run
}
