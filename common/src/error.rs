use thiserror::Error;

/// Failures of a single search invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier emptied before the goal was reached.
    #[error("no path from {from} to {to} (frontier exhausted at tick {tick})")]
    Unsolvable {
        from: String,
        to: String,
        tick: usize,
    },
    /// The search was asked to start outside of the map.
    #[error("start point {at} is outside of the map")]
    OutOfBounds { at: String },
    #[error("obstacle timeline period must be greater than zero")]
    ZeroPeriod,
}

/// Failures while turning text into a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("empty grid")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid cell at {at}: {reason}")]
    Cell { at: String, reason: String },
    #[error("segment from {from} to {to} is not axis aligned")]
    Diagonal { from: String, to: String },
}
