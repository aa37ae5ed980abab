use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{Failure, SearchRun};
use crate::compat::Compatibility;
use crate::participant::Participant;

/// Directed compatibility graph over participant indices.
#[derive(Debug, Clone)]
pub struct CompatibilityGraph {
    out_edges: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    /// Row-major `n * n` adjacency for constant-time edge checks.
    adjacency: Vec<bool>,
}

/// One level of the explicit depth-first stack.
struct Frame {
    candidates: Vec<usize>,
    cursor: usize,
}

impl CompatibilityGraph {
    /// Edge `c -> g` iff `c != g` and `c` may create for `g`.
    pub fn build(participants: &[Participant], compatibility: &Compatibility) -> Self {
        let n = participants.len();
        let mut out_edges = vec![Vec::new(); n];
        let mut in_degree = vec![0; n];
        let mut adjacency = vec![false; n * n];

        for (c, creator) in participants.iter().enumerate() {
            for (g, giftee) in participants.iter().enumerate() {
                if c != g && compatibility.compatible(creator, giftee) {
                    out_edges[c].push(g);
                    in_degree[g] += 1;
                    adjacency[c * n + g] = true;
                }
            }
        }

        Self {
            out_edges,
            in_degree,
            adjacency,
        }
    }

    pub fn len(&self) -> usize {
        self.out_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out_edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(Vec::len).sum()
    }

    pub fn has_edge(&self, creator: usize, giftee: usize) -> bool {
        self.adjacency[creator * self.len() + giftee]
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.out_edges[node].len()
    }

    /// True when `order` is a cycle: every consecutive pair, wrap-around included, is an edge.
    pub fn is_cycle(&self, order: &[usize]) -> bool {
        let n = order.len();
        n >= 2 && (0..n).all(|i| self.has_edge(order[i], order[(i + 1) % n]))
    }

    /// The participant with the fewest compatible giftees; earliest wins ties.
    pub fn anchor(&self) -> Option<usize> {
        (0..self.len()).min_by_key(|&node| self.out_degree(node))
    }

    /// A node that cannot sit anywhere in a cycle.
    fn isolated(&self) -> Option<usize> {
        (0..self.len()).find(|&node| self.out_edges[node].is_empty() || self.in_degree[node] == 0)
    }

    fn frame<R: Rng + ?Sized>(&self, node: usize, rng: &mut R) -> Frame {
        let mut candidates = self.out_edges[node].clone();
        candidates.shuffle(rng);
        Frame {
            candidates,
            cursor: 0,
        }
    }

    /// Randomized depth-first search for a Hamiltonian cycle through the anchor.
    ///
    /// Each shuffled out-edge of the anchor seeds one attempt. Completed paths
    /// whose last node cannot create for the anchor are treated as dead ends.
    /// `max_steps` bounds node expansions across all attempts.
    pub(crate) fn find_cycle<R: Rng + ?Sized>(&self, rng: &mut R, max_steps: u64) -> SearchRun {
        let n = self.len();
        let mut run = SearchRun {
            cycle: Err(Failure::SearchExhausted),
            longest: Vec::new(),
            steps: 0,
        };

        if n < 2 {
            run.cycle = Err(Failure::TooFewParticipants);
            return run;
        }
        if let Some(node) = self.isolated() {
            run.cycle = Err(Failure::Isolated(node));
            return run;
        }
        let Some(anchor) = self.anchor() else {
            run.cycle = Err(Failure::TooFewParticipants);
            return run;
        };

        let mut first_hops = self.out_edges[anchor].clone();
        first_hops.shuffle(rng);
        debug!(anchor, out_degree = first_hops.len(), "Selected anchor");

        let mut visited = vec![false; n];
        for first_hop in first_hops {
            debug!(anchor, first_hop, "Checking first hop");

            visited.iter_mut().for_each(|v| *v = false);
            visited[anchor] = true;
            visited[first_hop] = true;
            let mut path = vec![anchor, first_hop];
            if path.len() > run.longest.len() {
                run.longest = path.clone();
            }

            if path.len() == n {
                if self.has_edge(first_hop, anchor) {
                    run.cycle = Ok(path);
                    return run;
                }
                continue;
            }

            let mut stack = vec![self.frame(first_hop, rng)];
            while let Some(frame) = stack.last_mut() {
                if run.steps >= max_steps {
                    run.cycle = Err(Failure::BudgetExhausted);
                    return run;
                }

                let mut next = None;
                while let Some(&candidate) = frame.candidates.get(frame.cursor) {
                    frame.cursor += 1;
                    if !visited[candidate] {
                        next = Some(candidate);
                        break;
                    }
                }

                let Some(next) = next else {
                    stack.pop();
                    if let Some(node) = path.pop() {
                        visited[node] = false;
                    }
                    continue;
                };

                run.steps += 1;
                visited[next] = true;
                path.push(next);
                if path.len() > run.longest.len() {
                    run.longest = path.clone();
                }

                if path.len() == n {
                    if self.has_edge(next, anchor) {
                        run.cycle = Ok(path);
                        return run;
                    }
                    // Covers everyone but cannot close the loop.
                    path.pop();
                    visited[next] = false;
                } else {
                    stack.push(self.frame(next, rng));
                }
            }
        }

        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::test_support::{open_group, participant};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_skips_self_and_incompatible_edges() {
        let people = vec![
            participant("a", &["luffy"], &[]),
            participant("b", &[], &["luffy"]),
            participant("c", &[], &[]),
        ];
        let graph = CompatibilityGraph::build(&people, &Compatibility::default());

        assert!(!graph.has_edge(0, 0));
        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(1, 0));
        assert!(graph.has_edge(1, 2));
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.anchor(), Some(1));
    }

    #[test]
    fn test_is_cycle_checks_wrap_around() {
        let people = vec![
            participant("a", &["luffy"], &[]),
            participant("b", &[], &["luffy"]),
            participant("c", &[], &[]),
        ];
        let graph = CompatibilityGraph::build(&people, &Compatibility::default());

        assert!(graph.is_cycle(&[0, 1, 2]));
        assert!(!graph.is_cycle(&[0, 2, 1]));
        assert!(!graph.is_cycle(&[0]));
    }

    #[test]
    fn test_finds_cycle_in_complete_graph() {
        let people = open_group(25);
        let graph = CompatibilityGraph::build(&people, &Compatibility::default());

        for seed in 0..10 {
            let run = graph.find_cycle(&mut StdRng::seed_from_u64(seed), 1_000_000);
            let cycle = run.cycle.unwrap();
            assert!(graph.is_cycle(&cycle));
            let mut sorted = cycle.clone();
            sorted.sort();
            assert_eq!(sorted, (0..25).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_two_participants_form_a_cycle() {
        let graph = CompatibilityGraph::build(&open_group(2), &Compatibility::default());
        let run = graph.find_cycle(&mut StdRng::seed_from_u64(1), 10);
        assert!(graph.is_cycle(&run.cycle.unwrap()));
    }

    fn from_edges(n: usize, edges: &[(usize, usize)]) -> CompatibilityGraph {
        let mut graph = CompatibilityGraph {
            out_edges: vec![Vec::new(); n],
            in_degree: vec![0; n],
            adjacency: vec![false; n * n],
        };
        for &(c, g) in edges {
            graph.out_edges[c].push(g);
            graph.in_degree[g] += 1;
            graph.adjacency[c * n + g] = true;
        }
        graph
    }

    #[test]
    fn test_backtracks_when_wrap_around_fails() {
        // 0 -> 1 -> 2 -> 3 covers everyone but 3 cannot create for 0;
        // only 0 -> 1 -> 3 -> 2 -> 0 closes.
        let graph = from_edges(4, &[(0, 1), (1, 2), (1, 3), (2, 3), (3, 2), (2, 0)]);
        assert_eq!(graph.anchor(), Some(0));

        for seed in 0..10 {
            let run = graph.find_cycle(&mut StdRng::seed_from_u64(seed), 10_000);
            assert_eq!(run.cycle, Ok(vec![0, 1, 3, 2]), "seed {seed}");
        }
    }

    #[test]
    fn test_exhausts_without_cycle() {
        // A two-way chain has a Hamiltonian path but no cycle.
        let graph = from_edges(4, &[(0, 1), (1, 0), (1, 2), (2, 1), (2, 3), (3, 2)]);
        let run = graph.find_cycle(&mut StdRng::seed_from_u64(5), 10_000);
        assert_eq!(run.cycle, Err(Failure::SearchExhausted));
        assert_eq!(run.longest, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_isolated_node_fails_fast() {
        let graph = from_edges(3, &[(0, 1), (1, 0), (2, 0)]);
        let run = graph.find_cycle(&mut StdRng::seed_from_u64(0), 10_000);
        assert_eq!(run.cycle, Err(Failure::Isolated(2)));
        assert_eq!(run.steps, 0);
    }

    #[test]
    fn test_budget_bounds_search() {
        let graph = CompatibilityGraph::build(&open_group(30), &Compatibility::default());
        let run = graph.find_cycle(&mut StdRng::seed_from_u64(2), 5);
        assert_eq!(run.cycle, Err(Failure::BudgetExhausted));
        assert_eq!(run.steps, 5);
    }
}
