//! Dijkstra over implicitly generated graphs.
//!
//! Nodes are never stored up front: the caller hands in a closure that
//! yields the successors of a node, and the engine discovers the graph as
//! it goes. With unit costs this degenerates into a breadth-first search.
//!
//! Running "in reverse" is just a calling convention: start from the goal
//! and pass the reversed neighbour rules, then read the whole table. One
//! pass then answers "how far is every candidate start from the goal".

use std::{
    collections::{hash_map, BTreeSet, HashMap},
    hash::Hash,
};

use log::debug;

/// Minimal distances to every node the search finalized.
///
/// A missing node is unreachable; there is no numeric "infinity" that could
/// be mistaken for a real distance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Distances<N: Eq + Hash> {
    settled: HashMap<N, usize>,
}

impl<N: Eq + Hash> Default for Distances<N> {
    fn default() -> Self {
        Self {
            settled: HashMap::new(),
        }
    }
}

impl<N: Eq + Hash> Distances<N> {
    pub fn get(&self, n: &N) -> Option<usize> {
        self.settled.get(n).copied()
    }

    pub fn contains(&self, n: &N) -> bool {
        self.settled.contains_key(n)
    }

    pub fn len(&self) -> usize {
        self.settled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, usize)> + '_ {
        self.settled.iter().map(|(n, &d)| (n, d))
    }

    /// Smallest distance among the nodes matching `pred`.
    pub fn min_over(&self, mut pred: impl FnMut(&N) -> bool) -> Option<usize> {
        self.iter().filter(|(n, _)| pred(n)).map(|(_, d)| d).min()
    }
}

/// Nodes discovered but not finalized yet, ordered by `(distance, node)`.
///
/// Keeps exactly one entry per node: lowering a distance removes the old
/// entry before inserting the new one.
struct Frontier<N: Ord> {
    queue: BTreeSet<(usize, N)>,
}

impl<N: Clone + Ord> Frontier<N> {
    fn new() -> Self {
        Self {
            queue: BTreeSet::new(),
        }
    }

    fn push(&mut self, dist: usize, n: N) {
        self.queue.insert((dist, n));
    }

    fn lower(&mut self, old: usize, new: usize, n: N) {
        self.queue.remove(&(old, n.clone()));
        self.queue.insert((new, n));
    }

    fn pop(&mut self) -> Option<(usize, N)> {
        self.queue.pop_first()
    }
}

fn explore<N, F, I, G>(
    start: N,
    mut successors: F,
    mut is_goal: G,
) -> (Distances<N>, Option<(N, usize)>)
where
    N: Clone + Eq + Hash + Ord,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = (N, usize)>,
    G: FnMut(&N) -> bool,
{
    let mut table = Distances::default();
    let mut tentative = HashMap::from([(start.clone(), 0usize)]);
    let mut frontier = Frontier::new();

    frontier.push(0, start);

    let mut last = 0;

    while let Some((dist, node)) = frontier.pop() {
        debug_assert!(dist >= last, "frontier went backwards: {dist} < {last}");
        last = dist;

        tentative.remove(&node);
        table.settled.insert(node.clone(), dist);

        if is_goal(&node) {
            debug!("goal finalized at distance {dist} after {} nodes", table.len());

            return (table, Some((node, dist)));
        }

        for (next, cost) in successors(&node) {
            if table.settled.contains_key(&next) {
                continue;
            }

            let through = dist + cost;

            match tentative.entry(next) {
                hash_map::Entry::Occupied(mut oe) => {
                    let known = *oe.get();

                    if through < known {
                        frontier.lower(known, through, oe.key().clone());
                        oe.insert(through);
                    }
                }
                hash_map::Entry::Vacant(ve) => {
                    frontier.push(through, ve.key().clone());
                    ve.insert(through);
                }
            }
        }
    }

    debug!("frontier exhausted after settling {} nodes", table.len());

    (table, None)
}

/// Distances from `start` to everything it can reach, every step costing one.
pub fn shortest_paths<N, F, I>(start: N, mut neighbours: F) -> Distances<N>
where
    N: Clone + Eq + Hash + Ord,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
{
    explore(start, |n| neighbours(n).into_iter().map(|m| (m, 1)), |_| false).0
}

/// Like [`shortest_paths`], with caller supplied non-negative step costs.
pub fn weighted_shortest_paths<N, F, I>(start: N, successors: F) -> Distances<N>
where
    N: Clone + Eq + Hash + Ord,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = (N, usize)>,
{
    explore(start, successors, |_| false).0
}

/// Stops as soon as a node satisfying `is_goal` is finalized.
///
/// `start` itself is checked first, so a start that already is a goal
/// yields distance zero without generating any neighbour.
pub fn shortest_path_to<N, F, I, G>(
    start: N,
    mut neighbours: F,
    is_goal: G,
) -> Option<(N, usize)>
where
    N: Clone + Eq + Hash + Ord,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
    G: FnMut(&N) -> bool,
{
    explore(start, |n| neighbours(n).into_iter().map(|m| (m, 1)), is_goal).1
}

pub fn weighted_shortest_path_to<N, F, I, G>(
    start: N,
    successors: F,
    is_goal: G,
) -> Option<(N, usize)>
where
    N: Clone + Eq + Hash + Ord,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = (N, usize)>,
    G: FnMut(&N) -> bool,
{
    explore(start, successors, is_goal).1
}
