//! Cyclic assignment search.
//!
//! Participants become nodes of a directed graph with an edge
//! `creator -> giftee` whenever the pair is compatible. A valid assignment is
//! a Hamiltonian cycle in that graph. Two strategies look for one:
//! [`Strategy::Graph`], a randomized depth-first search from the most
//! constrained participant, and [`Strategy::BruteForce`], a bounded Monte
//! Carlo search over random permutations.

pub mod brute_force;
pub mod graph;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

use crate::compat::Compatibility;
use crate::error::{MatchError, Result};
use crate::metrics::SearchMetrics;
use crate::participant::Participant;

pub use graph::CompatibilityGraph;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Graph,
    BruteForce,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Graph => "graph",
            Strategy::BruteForce => "brute-force",
        }
    }
}

/// `[search]` table of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub strategy: Strategy,
    /// Permutations tried by the brute-force strategy.
    pub max_attempts: u64,
    /// Brute-force progress is logged every this many attempts; 0 disables it.
    pub progress_interval: u64,
    /// Node expansions allowed to the graph strategy.
    pub max_steps: u64,
    pub seed: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Graph,
            max_attempts: 10_000_000,
            progress_interval: 100,
            max_steps: 5_000_000,
            seed: None,
        }
    }
}

/// Why a search ended without a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    TooFewParticipants,
    /// Nobody can create for this participant, or they can create for nobody.
    Isolated { participant: String },
    /// Every path from the anchor was tried.
    SearchExhausted,
    BudgetExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::TooFewParticipants => write!(f, "fewer than two participants"),
            FailureReason::Isolated { participant } => {
                write!(f, "{} has no compatible creator or giftee", participant)
            }
            FailureReason::SearchExhausted => write!(f, "no valid cycle exists from the anchor"),
            FailureReason::BudgetExhausted => write!(f, "search budget exhausted"),
        }
    }
}

/// Index-based failure produced by the strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    TooFewParticipants,
    Isolated(usize),
    SearchExhausted,
    BudgetExhausted,
}

/// What a strategy hands back: a cycle of node indices or the reason there is none.
#[derive(Debug, Clone)]
pub(crate) struct SearchRun {
    pub cycle: std::result::Result<Vec<usize>, Failure>,
    /// Longest compatible path seen; empty for brute force.
    pub longest: Vec<usize>,
    pub steps: u64,
}

/// A complete cycle of participant ids in creator order; the last creates for the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    cycle: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport<'a> {
    pub cycle: &'a [String],
    pub assignments: Vec<Pairing<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pairing<'a> {
    pub creator: &'a str,
    pub giftee: &'a str,
}

impl Assignment {
    pub fn cycle(&self) -> &[String] {
        &self.cycle
    }

    pub fn len(&self) -> usize {
        self.cycle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycle.is_empty()
    }

    /// `(creator, giftee)` pairs including the wrap-around.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let n = self.cycle.len();
        (0..n).map(move |i| (self.cycle[i].as_str(), self.cycle[(i + 1) % n].as_str()))
    }

    pub fn giftee_of(&self, creator: &str) -> Option<&str> {
        self.pairs().find(|(c, _)| *c == creator).map(|(_, g)| g)
    }

    pub fn report(&self) -> AssignmentReport<'_> {
        AssignmentReport {
            cycle: &self.cycle,
            assignments: self
                .pairs()
                .map(|(creator, giftee)| Pairing { creator, giftee })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Assignment),
    NotFound {
        reason: FailureReason,
        /// Best partial path, for diagnosing how close the search came.
        longest_path: Vec<String>,
    },
}

pub struct Matcher<'a> {
    participants: &'a [Participant],
    compatibility: &'a Compatibility,
    graph: CompatibilityGraph,
}

impl<'a> Matcher<'a> {
    /// Validates ids and forced pairings, then builds the compatibility graph.
    pub fn new(participants: &'a [Participant], compatibility: &'a Compatibility) -> Result<Self> {
        let mut seen = HashSet::new();
        for participant in participants {
            if !seen.insert(participant.id.as_str()) {
                return Err(MatchError::DuplicateParticipant(participant.id.clone()));
            }
        }
        compatibility.validate_forced(participants)?;

        let graph = CompatibilityGraph::build(participants, compatibility);
        info!(
            participants = participants.len(),
            edges = graph.edge_count(),
            "Built compatibility graph"
        );

        Ok(Self {
            participants,
            compatibility,
            graph,
        })
    }

    pub fn search<R: Rng + ?Sized>(
        &self,
        settings: &SearchSettings,
        rng: &mut R,
    ) -> Result<SearchOutcome> {
        let strategy = settings.strategy;
        info!(strategy = strategy.as_str(), "Starting assignment search");

        let run = match strategy {
            Strategy::Graph => self.graph.find_cycle(rng, settings.max_steps),
            Strategy::BruteForce => brute_force::find_cycle(
                &self.graph,
                rng,
                settings.max_attempts,
                settings.progress_interval,
            ),
        };
        SearchMetrics::record_run(strategy.as_str(), run.steps, run.cycle.is_ok());

        let ids = |nodes: &[usize]| -> Vec<String> {
            nodes
                .iter()
                .map(|&i| self.participants[i].id.clone())
                .collect()
        };

        match run.cycle {
            Ok(cycle) => {
                let cycle = ids(&cycle);
                self.compatibility.verify_forced(&cycle)?;
                info!(steps = run.steps, "Found valid assignment");
                Ok(SearchOutcome::Found(Assignment { cycle }))
            }
            Err(failure) => {
                let reason = match failure {
                    Failure::TooFewParticipants => FailureReason::TooFewParticipants,
                    Failure::Isolated(i) => FailureReason::Isolated {
                        participant: self.participants[i].id.clone(),
                    },
                    Failure::SearchExhausted => FailureReason::SearchExhausted,
                    Failure::BudgetExhausted => FailureReason::BudgetExhausted,
                };
                warn!(
                    steps = run.steps,
                    longest = run.longest.len(),
                    %reason,
                    "No valid assignment found"
                );
                Ok(SearchOutcome::NotFound {
                    reason,
                    longest_path: ids(&run.longest),
                })
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn settings(strategy: Strategy) -> SearchSettings {
        SearchSettings {
            strategy,
            max_attempts: 100_000,
            ..SearchSettings::default()
        }
    }

    #[test]
    fn test_both_strategies_solve_open_group() {
        let people = open_group(8);
        let compat = Compatibility::default();
        let matcher = Matcher::new(&people, &compat).unwrap();

        for strategy in [Strategy::Graph, Strategy::BruteForce] {
            for seed in 0..5 {
                let mut rng = StdRng::seed_from_u64(seed);
                match matcher.search(&settings(strategy), &mut rng).unwrap() {
                    SearchOutcome::Found(assignment) => {
                        assert_eq!(assignment.len(), 8);
                        assert_valid(&assignment, &people, &compat);
                    }
                    other => panic!("{strategy:?} failed on an open group: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_b_never_directly_before_a() {
        let people = vec![
            participant("a", &["luffy"], &[]),
            participant("b", &[], &["luffy"]),
            participant("c", &[], &[]),
        ];
        let compat = Compatibility::default();
        assert!(!compat.incompatible(&people[0], &people[1]));
        assert!(compat.incompatible(&people[1], &people[0]));

        let matcher = Matcher::new(&people, &compat).unwrap();
        for strategy in [Strategy::Graph, Strategy::BruteForce] {
            for seed in 0..10 {
                let mut rng = StdRng::seed_from_u64(seed);
                let SearchOutcome::Found(assignment) =
                    matcher.search(&settings(strategy), &mut rng).unwrap()
                else {
                    panic!("a -> b -> c -> a is always available");
                };
                assert_ne!(assignment.giftee_of("b"), Some("a"));
                assert_eq!(assignment.cycle().len(), 3);
            }
        }
    }

    #[test]
    fn test_unwanted_giftee_fails_for_both_strategies() {
        // Everyone refuses what "picky" wants.
        let mut people = vec![participant("picky", &["kaido"], &[])];
        for i in 0..4 {
            people.push(participant(&format!("p{i}"), &[], &["kaido"]));
        }
        let compat = Compatibility::default();
        let matcher = Matcher::new(&people, &compat).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let outcome = matcher.search(&settings(Strategy::Graph), &mut rng).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                reason: FailureReason::Isolated { participant: "picky".to_string() },
                longest_path: Vec::new(),
            }
        );

        let brute = SearchSettings {
            max_attempts: 2_000,
            ..settings(Strategy::BruteForce)
        };
        let outcome = matcher.search(&brute, &mut rng).unwrap();
        assert!(matches!(
            outcome,
            SearchOutcome::NotFound { reason: FailureReason::BudgetExhausted, .. }
        ));
    }

    #[test]
    fn test_single_participant_has_no_cycle() {
        let people = open_group(1);
        let compat = Compatibility::default();
        let matcher = Matcher::new(&people, &compat).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        for strategy in [Strategy::Graph, Strategy::BruteForce] {
            let outcome = matcher.search(&settings(strategy), &mut rng).unwrap();
            assert!(matches!(
                outcome,
                SearchOutcome::NotFound { reason: FailureReason::TooFewParticipants, .. }
            ));
        }
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut people = open_group(3);
        people[2].id = people[0].id.clone();
        let compat = Compatibility::default();

        assert!(matches!(
            Matcher::new(&people, &compat),
            Err(MatchError::DuplicateParticipant(id)) if id == "p0@example.com"
        ));
    }

    #[test]
    fn test_forced_pairings_are_honored() {
        let people = open_group(6);
        let compat = Compatibility::default().with_forced_pairings(BTreeMap::from([
            ("p0@example.com".to_string(), "p3@example.com".to_string()),
            ("p5@example.com".to_string(), "p1@example.com".to_string()),
        ]));
        let matcher = Matcher::new(&people, &compat).unwrap();

        for strategy in [Strategy::Graph, Strategy::BruteForce] {
            let mut rng = StdRng::seed_from_u64(11);
            let SearchOutcome::Found(assignment) =
                matcher.search(&settings(strategy), &mut rng).unwrap()
            else {
                panic!("forced pairings leave plenty of cycles");
            };
            assert_eq!(assignment.giftee_of("p0@example.com"), Some("p3@example.com"));
            assert_eq!(assignment.giftee_of("p5@example.com"), Some("p1@example.com"));
        }
    }

    #[test]
    fn test_report_serializes_pairs() {
        let assignment = Assignment {
            cycle: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        let json = serde_json::to_value(assignment.report()).unwrap();
        assert_eq!(json["cycle"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(json["assignments"][2], serde_json::json!({"creator": "c", "giftee": "a"}));
    }
}
