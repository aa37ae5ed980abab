//! Search counters recorded through the `metrics` facade.
//!
//! Nothing installs a recorder here, so these are no-ops unless an embedding
//! application sets one up.

pub const SEARCH_STEPS: &str = "gift_exchange_search_steps_total";
pub const SEARCH_RUNS: &str = "gift_exchange_search_runs_total";
pub const SEARCH_SOLUTIONS: &str = "gift_exchange_search_solutions_total";

pub fn describe() {
    ::metrics::describe_counter!(
        SEARCH_STEPS,
        "Node expansions (graph) or permutations tried (brute force)"
    );
    ::metrics::describe_counter!(SEARCH_RUNS, "Assignment searches started");
    ::metrics::describe_counter!(SEARCH_SOLUTIONS, "Assignment searches that found a cycle");
}

pub struct SearchMetrics;

impl SearchMetrics {
    pub fn record_run(strategy: &'static str, steps: u64, found: bool) {
        ::metrics::counter!(SEARCH_RUNS, "strategy" => strategy).increment(1);
        ::metrics::counter!(SEARCH_STEPS, "strategy" => strategy).increment(steps);
        if found {
            ::metrics::counter!(SEARCH_SOLUTIONS, "strategy" => strategy).increment(1);
        }
    }
}
