//! Pathfinding through obstacles that move on every tick.
//!
//! A search state is a `(position, tick)` pair: the same cell may be safe at
//! one tick and swept at the next. Obstacle configurations are periodic, so
//! the tick only matters modulo the period, which keeps the state space
//! finite and lets an unreachable goal surface as an empty frontier.

use std::{collections::HashSet, fmt::Debug, hash::Hash, iter::once};

use log::{debug, trace};

use crate::error::SearchError;

/// Anything that can tell whether a position is taken right now.
pub trait ObstacleField<N> {
    fn blocks(&self, n: &N) -> bool;
}

impl<N: Eq + Hash> ObstacleField<N> for HashSet<N> {
    fn blocks(&self, n: &N) -> bool {
        self.contains(n)
    }
}

/// Memoised obstacle configurations, one per tick modulo `period`.
///
/// Each configuration is derived from the previous one by `step` and kept
/// around, so tick `t` always yields the same state no matter in which order
/// ticks are asked for.
#[derive(Debug)]
pub struct Timeline<S, F> {
    states: Vec<S>,
    period: usize,
    step: F,
}

impl<S, F> Timeline<S, F>
where
    F: Fn(&S) -> S,
{
    /// `period` must be the number of ticks after which `step` brings
    /// `initial` back to itself.
    pub fn new(initial: S, period: usize, step: F) -> Result<Self, SearchError> {
        if period == 0 {
            return Err(SearchError::ZeroPeriod);
        }

        Ok(Self {
            states: vec![initial],
            period,
            step,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn at(&mut self, tick: usize) -> &S {
        let phase = tick % self.period;

        for i in self.states.len()..=phase {
            let next = (self.step)(&self.states[i - 1]);

            self.states.push(next);
        }

        &self.states[phase]
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trip {
    OneWay,
    /// start to goal, back to start, then to goal again
    RoundTrip,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// heading for the goal the first time
    Exploring,
    /// goal reached once, heading back to the start
    ReachedGoal,
    /// back at the start, heading for the goal again
    ReachedStart,
    Done,
}

impl Phase {
    pub const fn after_arrival(self, trip: Trip) -> Self {
        use Phase::*;

        match (self, trip) {
            (Exploring, Trip::OneWay) => Done,
            (Exploring, Trip::RoundTrip) => ReachedGoal,
            (ReachedGoal, _) => ReachedStart,
            (ReachedStart, _) | (Done, _) => Done,
        }
    }

    /// The `(from, to)` leg walked while in this phase.
    pub fn endpoints<N>(self, start: N, goal: N) -> Option<(N, N)> {
        use Phase::*;

        match self {
            Exploring | ReachedStart => Some((start, goal)),
            ReachedGoal => Some((goal, start)),
            Done => None,
        }
    }
}

/// Ticks needed to complete `trip`, starting at tick zero.
///
/// Every tick each reachable position may either stay put or take one of
/// `moves(position)`; a candidate survives only if the configuration of the
/// *next* tick leaves it free.
pub fn traverse<N, S, F, M, I>(
    timeline: &mut Timeline<S, F>,
    start: N,
    goal: N,
    trip: Trip,
    mut moves: M,
) -> Result<usize, SearchError>
where
    N: Copy + Debug + Eq + Hash,
    S: ObstacleField<N>,
    F: Fn(&S) -> S,
    M: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut phase = Phase::Exploring;
    let mut tick = 0;

    while let Some((from, to)) = phase.endpoints(start, goal) {
        tick = cross(timeline, from, to, tick, &mut moves)?;
        phase = phase.after_arrival(trip);

        debug!("reached {to:?} at tick {tick}, now {phase:?}");
    }

    Ok(tick)
}

fn cross<N, S, F, M, I>(
    timeline: &mut Timeline<S, F>,
    from: N,
    to: N,
    mut tick: usize,
    moves: &mut M,
) -> Result<usize, SearchError>
where
    N: Copy + Debug + Eq + Hash,
    S: ObstacleField<N>,
    F: Fn(&S) -> S,
    M: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    if from == to {
        return Ok(tick);
    }

    let period = timeline.period();

    let mut frontier = HashSet::from([from]);
    let mut seen = HashSet::from([(from, tick % period)]);

    while !frontier.is_empty() {
        let next_tick = tick + 1;
        let upcoming = timeline.at(next_tick);

        let before = seen.len();
        let mut reached = HashSet::new();

        for &here in &frontier {
            for there in once(here).chain(moves(here)) {
                if !upcoming.blocks(&there) && seen.insert((there, next_tick % period)) {
                    reached.insert(there);
                }
            }
        }

        debug_assert_eq!(seen.len(), before + reached.len());

        tick = next_tick;

        trace!("tick {tick}: {} reachable positions", reached.len());

        if reached.contains(&to) {
            return Ok(tick);
        }

        frontier = reached;
    }

    Err(SearchError::Unsolvable {
        from: format!("{from:?}"),
        to: format!("{to:?}"),
        tick,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor(x: i64) -> Vec<i64> {
        [x - 1, x + 1]
            .into_iter()
            .filter(|x| (0..=4).contains(x))
            .collect()
    }

    fn still(_: &HashSet<i64>) -> HashSet<i64> {
        HashSet::new()
    }

    #[test]
    fn empty_corridor() {
        let mut tl = Timeline::new(HashSet::new(), 1, still).unwrap();

        assert_eq!(traverse(&mut tl, 0, 4, Trip::OneWay, corridor), Ok(4));
        assert_eq!(traverse(&mut tl, 0, 4, Trip::RoundTrip, corridor), Ok(12));
    }

    #[test]
    fn waits_for_blinking_obstacle() {
        // x = 1 is blocked on odd ticks
        let mut tl = Timeline::new(HashSet::new(), 2, |s: &HashSet<i64>| {
            if s.is_empty() {
                HashSet::from([1])
            } else {
                HashSet::new()
            }
        })
        .unwrap();

        assert_eq!(traverse(&mut tl, 0, 4, Trip::OneWay, corridor), Ok(5));
        assert_eq!(tl.at(3), &HashSet::from([1]));
        assert_eq!(tl.at(10), &HashSet::new());
    }

    #[test]
    fn walled_off_goal() {
        let mut tl = Timeline::new(HashSet::from([2]), 1, |s: &HashSet<i64>| s.clone()).unwrap();

        assert!(matches!(
            traverse(&mut tl, 0, 4, Trip::OneWay, corridor),
            Err(SearchError::Unsolvable { tick: 2, .. })
        ));
    }

    #[test]
    fn start_is_goal() {
        let mut tl = Timeline::new(HashSet::new(), 1, still).unwrap();

        assert_eq!(traverse(&mut tl, 3, 3, Trip::RoundTrip, corridor), Ok(0));
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(matches!(
            Timeline::new(HashSet::<i64>::new(), 0, still),
            Err(SearchError::ZeroPeriod)
        ));
    }

    #[test]
    fn phases() {
        use Phase::*;

        assert_eq!(Exploring.after_arrival(Trip::OneWay), Done);
        assert_eq!(Exploring.after_arrival(Trip::RoundTrip), ReachedGoal);
        assert_eq!(ReachedGoal.after_arrival(Trip::RoundTrip), ReachedStart);
        assert_eq!(ReachedStart.after_arrival(Trip::RoundTrip), Done);
        assert_eq!(ReachedGoal.endpoints('s', 'g'), Some(('g', 's')));
        assert_eq!(Done.endpoints('s', 'g'), None);
    }
}
