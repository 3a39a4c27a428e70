//! Integer lattice points and the cardinal direction model.
//!
//! `x` grows east and `y` grows south, so "down" on a printed map is
//! `Direction::South` and increases the row index.

use std::{
    cmp::{max, min},
    fmt::{self, Debug, Display},
    hash::Hash,
    iter::zip,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::error::GridError;

#[repr(u8)]
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Hash, PartialEq)]
pub enum Turn {
    Left,
    Right,
    Around,
}

impl Direction {
    pub const fn versor(self) -> Point2 {
        use Direction::*;

        match self {
            North => Point2::new(0, -1),
            East => Point2::new(1, 0),
            South => Point2::new(0, 1),
            West => Point2::new(-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        self.rotate(Turn::Around)
    }

    /// Direction faced after turning on the spot. Total over every pair.
    pub const fn rotate(self, turn: Turn) -> Self {
        use Direction::*;
        use Turn::*;

        match (self, turn) {
            (North, Left) | (South, Right) | (East, Around) => West,
            (North, Right) | (South, Left) | (West, Around) => East,
            (East, Left) | (West, Right) | (South, Around) => North,
            (East, Right) | (West, Left) | (North, Around) => South,
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Direction::*;

        let glyph = match self {
            North => '^',
            East => '>',
            South => 'v',
            West => '<',
        };

        Display::fmt(&glyph, f)
    }
}

impl TryFrom<char> for Direction {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        use Direction::*;

        match c {
            '^' | 'U' => Ok(North),
            '>' | 'R' => Ok(East),
            'v' | 'D' => Ok(South),
            '<' | 'L' => Ok(West),
            _ => Err(format!("invalid direction `{c}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Point2 {
    pub x: i64,
    pub y: i64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn adjacent(self, dir: Direction) -> Self {
        self + dir
    }

    pub fn manhattan(self, other: Self) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four cardinal neighbours, in `Direction` order.
    pub fn neighbourhood(self) -> [Self; Direction::COUNT] {
        let mut ret = [self; Direction::COUNT];

        for (neigh, dir) in zip(&mut ret, Direction::iter()) {
            *neigh += dir;
        }

        ret
    }

    /// All eight surrounding points, diagonals included.
    pub fn surrounding(self) -> [Self; 8] {
        let Self { x, y } = self;

        [
            Self::new(x - 1, y - 1),
            Self::new(x, y - 1),
            Self::new(x + 1, y - 1),
            Self::new(x - 1, y),
            Self::new(x + 1, y),
            Self::new(x - 1, y + 1),
            Self::new(x, y + 1),
            Self::new(x + 1, y + 1),
        ]
    }

    pub fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// Every point on the straight segment from `self` to `other`, both ends
    /// included. Only horizontal and vertical segments exist on the lattice.
    pub fn stride_to(self, other: Self) -> Result<impl Iterator<Item = Self>, GridError> {
        if self.x != other.x && self.y != other.y {
            return Err(GridError::Diagonal {
                from: self.to_string(),
                to: other.to_string(),
            });
        }

        let step = (other - self).signum();

        Ok((0..=self.manhattan(other)).scan(self, move |cur, _| {
            let here = *cur;

            *cur = here + step;

            Some(here)
        }))
    }
}

impl Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<Direction> for Point2 {
    type Output = Self;

    fn add(self, rhs: Direction) -> Self::Output {
        self + rhs.versor()
    }
}

impl AddAssign for Point2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}

impl AddAssign<Direction> for Point2 {
    fn add_assign(&mut self, rhs: Direction) {
        *self = *self + rhs
    }
}

impl Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<Direction> for Point2 {
    type Output = Self;

    fn sub(self, rhs: Direction) -> Self::Output {
        self - rhs.versor()
    }
}

impl From<(i64, i64)> for Point2 {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point2> for (i64, i64) {
    fn from(Point2 { x, y }: Point2) -> Self {
        (x, y)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Point3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point3 {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn manhattan(self, other: Self) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    pub fn neighbourhood(self) -> [Self; 6] {
        const NEIGH: [Point3; 6] = [
            Point3::new(-1, 0, 0),
            Point3::new(1, 0, 0),
            Point3::new(0, -1, 0),
            Point3::new(0, 1, 0),
            Point3::new(0, 0, -1),
            Point3::new(0, 0, 1),
        ];

        NEIGH.map(|d| self + d)
    }

    pub fn is_within(self, bounds: &Bounds3) -> bool {
        bounds.contains(self)
    }

    pub const fn dot(self, other: Self) -> i64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Point3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i64> for Point3 {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<(i64, i64, i64)> for Point3 {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self::new(x, y, z)
    }
}

/// Inclusive axis-aligned box in 3D.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |some_bounds, p| {
            Some(match some_bounds {
                Some(Bounds3 { min: lo, max: hi }) => Bounds3 {
                    min: Point3::new(min(lo.x, p.x), min(lo.y, p.y), min(lo.z, p.z)),
                    max: Point3::new(max(hi.x, p.x), max(hi.y, p.y), max(hi.z, p.z)),
                },
                None => Bounds3 { min: p, max: p },
            })
        })
    }

    pub fn grow(self, n: i64) -> Self {
        Self {
            min: self.min + Point3::new(-n, -n, -n),
            max: self.max + Point3::new(n, n, n),
        }
    }

    pub fn contains(&self, p: Point3) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// A point type the generic search helpers can walk over.
pub trait Lattice: Copy + Debug + Eq + Hash + Ord {
    type Adjacents: IntoIterator<Item = Self>;

    fn adjacents(self) -> Self::Adjacents;

    fn manhattan(self, other: Self) -> u64;
}

impl Lattice for Point2 {
    type Adjacents = [Self; Direction::COUNT];

    fn adjacents(self) -> Self::Adjacents {
        self.neighbourhood()
    }

    fn manhattan(self, other: Self) -> u64 {
        Point2::manhattan(self, other)
    }
}

impl Lattice for Point3 {
    type Adjacents = [Self; 6];

    fn adjacents(self) -> Self::Adjacents {
        self.neighbourhood()
    }

    fn manhattan(self, other: Self) -> u64 {
        Point3::manhattan(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::iter().collect::<Vec<_>>())
    }

    fn arb_turn() -> impl Strategy<Value = Turn> {
        prop::sample::select(Turn::iter().collect::<Vec<_>>())
    }

    fn arb_point2() -> impl Strategy<Value = Point2> {
        (-1000i64..1000, -1000i64..1000).prop_map(Point2::from)
    }

    fn arb_point3() -> impl Strategy<Value = Point3> {
        (-100i64..100, -100i64..100, -100i64..100).prop_map(Point3::from)
    }

    #[test]
    fn south_increases_row() {
        assert_eq!(Point2::ORIGIN.adjacent(Direction::South), Point2::new(0, 1));
        assert_eq!(Point2::ORIGIN.adjacent(Direction::East), Point2::new(1, 0));
        assert_eq!(Point2::ORIGIN.adjacent(Direction::North), Point2::new(0, -1));
    }

    #[test]
    fn rotation_table() {
        use Direction::*;

        assert_eq!(North.rotate(Turn::Right), East);
        assert_eq!(East.rotate(Turn::Right), South);
        assert_eq!(South.rotate(Turn::Left), East);
        assert_eq!(West.rotate(Turn::Left), South);
        assert_eq!(West.rotate(Turn::Around), East);
    }

    #[test]
    fn direction_glyphs() {
        assert_eq!(Direction::try_from('v'), Ok(Direction::South));
        assert_eq!(Direction::try_from('L'), Ok(Direction::West));
        assert!(Direction::try_from('x').is_err());
        assert_eq!(Direction::North.to_string(), "^");
        assert_eq!(Direction::East.to_string(), ">");
        assert_eq!(Direction::South.to_string(), "v");
        assert_eq!(Direction::West.to_string(), "<");
        assert_eq!(format!("{:>3}", Direction::East), "  >");
    }

    #[test]
    fn strides_along_axes() {
        let row = Point2::new(2, 5).stride_to(Point2::new(-1, 5)).unwrap();

        assert_eq!(
            row.collect::<Vec<_>>(),
            [(2, 5), (1, 5), (0, 5), (-1, 5)].map(Point2::from)
        );

        let col = Point2::new(3, 0).stride_to(Point2::new(3, 2)).unwrap();

        assert_eq!(col.collect::<Vec<_>>(), [(3, 0), (3, 1), (3, 2)].map(Point2::from));

        let dot = Point2::new(4, 4).stride_to(Point2::new(4, 4)).unwrap();

        assert_eq!(dot.collect::<Vec<_>>(), [Point2::new(4, 4)]);
    }

    #[test]
    fn diagonal_strides_are_rejected() {
        let err = Point2::new(0, 0).stride_to(Point2::new(2, 2)).err();

        assert_eq!(
            err,
            Some(GridError::Diagonal {
                from: "(0, 0)".into(),
                to: "(2, 2)".into(),
            })
        );
    }

    #[test]
    fn bounds_grow_and_contain() {
        let b = Bounds3::from_points([Point3::new(1, 2, 3), Point3::new(3, 2, 1)]).unwrap();

        assert_eq!(b.min, Point3::new(1, 2, 1));
        assert_eq!(b.max, Point3::new(3, 2, 3));
        assert!(!b.contains(Point3::new(0, 2, 2)));
        assert!(b.grow(1).contains(Point3::new(0, 1, 4)));
        assert!(Bounds3::from_points([]).is_none());
    }

    proptest! {
        #[test]
        fn opposite_moves_cancel(p in arb_point2(), d in arb_direction()) {
            prop_assert_eq!(p.adjacent(d).adjacent(d.opposite()), p);
            prop_assert_eq!(p.adjacent(Direction::North).adjacent(Direction::South), p);
        }

        #[test]
        fn left_then_right_is_identity(d in arb_direction(), t in arb_turn()) {
            prop_assert_eq!(d.rotate(Turn::Left).rotate(Turn::Right), d);
            prop_assert_eq!(d.rotate(Turn::Around).rotate(Turn::Around), d);
            prop_assert_eq!(d.rotate(t).rotate(t).rotate(t).rotate(t), d);
        }

        #[test]
        fn manhattan_is_metric(a in arb_point2(), b in arb_point2(), c in arb_point2()) {
            prop_assert_eq!(a.manhattan(a), 0);
            prop_assert_eq!(a.manhattan(b), b.manhattan(a));
            prop_assert!(a.manhattan(c) <= a.manhattan(b) + b.manhattan(c));
        }

        #[test]
        fn neighbours_are_one_step_away(p in arb_point2(), q in arb_point3()) {
            prop_assert!(p.neighbourhood().iter().all(|&n| n.manhattan(p) == 1));
            prop_assert!(q.neighbourhood().iter().all(|&n| n.manhattan(q) == 1));
            prop_assert!(p.surrounding().iter().all(|&n| n != p && (n - p).signum() == n - p));
        }

        #[test]
        fn strides_cover_the_segment(p in arb_point2(), d in arb_direction(), n in 0i64..50) {
            let end = (0..n).fold(p, |q, _| q + d);
            let line: Vec<_> = p.stride_to(end).unwrap().collect();

            prop_assert_eq!(line.len() as u64, p.manhattan(end) + 1);
            prop_assert_eq!(line.first(), Some(&p));
            prop_assert_eq!(line.last(), Some(&end));
        }

        #[test]
        fn vector_algebra(a in arb_point3(), b in arb_point3(), k in -10i64..10) {
            prop_assert_eq!((a - b) + b, a);
            prop_assert_eq!(-(-a), a);
            prop_assert_eq!(a.dot(b), b.dot(a));
            prop_assert_eq!((a * k).dot(b), k * a.dot(b));
        }
    }
}
