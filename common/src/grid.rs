//! Occupancy maps: what sits at each coordinate.
//!
//! The search engine never looks at cells itself. Puzzles wrap their map in
//! an [`Occupancy`] and hand the engine a predicate deciding whether one
//! cell may be entered from another (climbing limits, walls, ...).

use std::{collections::HashMap, fmt::Display, hash::Hash};

use crate::{
    error::{GridError, SearchError},
    geom::{Lattice, Point2},
    search::{shortest_paths, Distances},
};

pub trait Occupancy<P> {
    type Cell;

    /// `None` means out of bounds, or otherwise not part of the map.
    fn cell_at(&self, p: P) -> Option<&Self::Cell>;
}

impl<P: Eq + Hash, C> Occupancy<P> for HashMap<P, C> {
    type Cell = C;

    fn cell_at(&self, p: P) -> Option<&C> {
        self.get(&p)
    }
}

/// Dense row-major rectangle of cells, `(0, 0)` being the top-left corner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid<T> {
    cells: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Grid<T> {
    /// Builds a grid out of text, one row per non-empty line.
    pub fn parse<F, E>(input: &str, mut cell: F) -> Result<Self, GridError>
    where
        F: FnMut(Point2, char) -> Result<T, E>,
        E: Display,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (j, line) in input.lines().map(str::trim_end).filter(|l| !l.is_empty()).enumerate() {
            let before = cells.len();

            for (i, c) in line.chars().enumerate() {
                let at = Point2::new(i as i64, j as i64);

                cells.push(cell(at, c).map_err(|e| GridError::Cell {
                    at: at.to_string(),
                    reason: e.to_string(),
                })?);
            }

            let found = cells.len() - before;

            match width {
                Some(expected) if expected != found => {
                    return Err(GridError::Ragged {
                        row: j,
                        expected,
                        found,
                    })
                }
                Some(_) => {}
                None => width = Some(found),
            }

            height += 1;
        }

        match width {
            Some(width) if width > 0 => Ok(Self {
                cells,
                width,
                height,
            }),
            _ => Err(GridError::Empty),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index_of(&self, Point2 { x, y }: Point2) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);

        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn contains(&self, p: Point2) -> bool {
        self.index_of(p).is_some()
    }

    pub fn get(&self, p: Point2) -> Option<&T> {
        self.index_of(p).map(|ix| &self.cells[ix])
    }

    /// Every cell with its coordinate, row by row.
    pub fn items(&self) -> impl Iterator<Item = (Point2, &T)> + '_ {
        let width = self.width;

        self.cells.iter().enumerate().map(move |(ix, c)| {
            (Point2::new((ix % width) as i64, (ix / width) as i64), c)
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width)
    }
}

impl<T> Occupancy<Point2> for Grid<T> {
    type Cell = T;

    fn cell_at(&self, p: Point2) -> Option<&T> {
        self.get(p)
    }
}

/// Shortest distances over an occupancy map.
///
/// Moving from `p` to one of its lattice neighbours `q` is allowed when `q`
/// is on the map and `can_step(cell(p), cell(q))` holds.
pub fn distances_from<O, P, F>(
    map: &O,
    start: P,
    mut can_step: F,
) -> Result<Distances<P>, SearchError>
where
    O: Occupancy<P>,
    P: Lattice + Display,
    F: FnMut(&O::Cell, &O::Cell) -> bool,
{
    if map.cell_at(start).is_none() {
        return Err(SearchError::OutOfBounds {
            at: start.to_string(),
        });
    }

    Ok(shortest_paths(start, |&p: &P| {
        let mut ret = Vec::new();

        if let Some(here) = map.cell_at(p) {
            for q in p.adjacents() {
                if let Some(there) = map.cell_at(q) {
                    if can_step(here, there) {
                        ret.push(q);
                    }
                }
            }
        }

        ret
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point3;

    fn digits(input: &str) -> Result<Grid<u8>, GridError> {
        Grid::parse(input, |_, c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| format!("not a digit: {c}"))
        })
    }

    #[test]
    fn parse_and_index() {
        let grid = digits("123\n456\n").unwrap();

        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.get(Point2::new(2, 1)), Some(&6));
        assert_eq!(grid.get(Point2::new(3, 0)), None);
        assert_eq!(grid.get(Point2::new(-1, 0)), None);
        assert_eq!(grid.rows().nth(1), Some(&[4, 5, 6][..]));
        assert_eq!(grid.items().nth(4), Some((Point2::new(1, 1), &5)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            digits("12\n345"),
            Err(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(digits("\n\n"), Err(GridError::Empty));
        assert!(matches!(digits("1x"), Err(GridError::Cell { .. })));
    }

    #[test]
    fn climbing_limit() {
        // each step may climb at most one level
        let grid = digits("0125\n1234\n9999").unwrap();
        let table = distances_from(&grid, Point2::new(0, 0), |&a, &b| b <= a + 1).unwrap();

        assert_eq!(table.get(&Point2::new(3, 1)), Some(4));
        assert_eq!(table.get(&Point2::new(3, 0)), Some(5));
        assert_eq!(table.get(&Point2::new(0, 2)), None);
    }

    #[test]
    fn start_outside_map() {
        let grid = digits("00\n00").unwrap();

        assert!(matches!(
            distances_from(&grid, Point2::new(5, 5), |_, _| true),
            Err(SearchError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn sparse_three_dimensional_map() {
        let map: HashMap<Point3, ()> = [(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 1, 1), (5, 5, 5)]
            .into_iter()
            .map(|p| (Point3::from(p), ()))
            .collect();

        let table = distances_from(&map, Point3::new(0, 0, 0), |_, _| true).unwrap();

        assert_eq!(table.get(&Point3::new(1, 1, 1)), Some(3));
        assert!(!table.contains(&Point3::new(5, 5, 5)));
    }
}
