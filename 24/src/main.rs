use std::{collections::HashMap, error::Error, fs};

use aoc_common::{traverse, Direction, ObstacleField, Point2, SearchError, Timeline, Trip};
use clap::Parser;
use log::debug;
use nom::{
    branch::alt,
    character::complete::{anychar, char, multispace1},
    combinator::{map, map_res, value},
    error::{Error as NomError, ParseError},
    multi::many1,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use nom_locate::{position, LocatedSpan};
use num::integer::lcm;

type Span<'a> = LocatedSpan<&'a str>;

fn get_point(pos: Span) -> Point2 {
    Point2::new(
        pos.get_column() as i64 - 1,
        i64::from(pos.location_line()) - 1,
    )
}

fn with_point<'a, F: 'a, O, E: ParseError<Span<'a>>>(
    inner: F,
) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, (Point2, O), E>
where
    F: Fn(Span<'a>) -> IResult<Span<'a>, O, E>,
{
    move |s: Span<'a>| {
        let (s, pos) = position(s)?;

        let point = get_point(pos);

        let (s, res) = inner(s)?;

        Ok((s, (point, res)))
    }
}

fn wall(s: Span) -> IResult<Span, ()> {
    value((), char('#'))(s)
}

#[derive(Clone, Copy, Debug)]
struct Blizzard {
    loc: Point2,
    dir: Direction,
}

fn blizzard(s: Span) -> IResult<Span, Blizzard> {
    map_res(with_point(anychar), |(loc, ch)| {
        Direction::try_from(ch).map(|dir| Blizzard { loc, dir })
    })(s)
}

/// Blizzards at a given minute; one cell can host several of them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Blizzards(HashMap<Point2, Vec<Direction>>);

impl Blizzards {
    fn advance(&self, bounds: MapSize) -> Self {
        let mut next: HashMap<Point2, Vec<Direction>> = HashMap::new();

        for (&loc, dirs) in &self.0 {
            for &dir in dirs {
                next.entry(rehome(loc, bounds, dir)).or_default().push(dir);
            }
        }

        // keep cells comparable regardless of hash iteration order
        for dirs in next.values_mut() {
            dirs.sort_unstable();
        }

        Self(next)
    }
}

impl ObstacleField<Point2> for Blizzards {
    fn blocks(&self, p: &Point2) -> bool {
        self.0.contains_key(p)
    }
}

/// Outer size of the valley, walls included.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct MapSize(i64, i64);

impl MapSize {
    fn from_edge(Point2 { x, y }: Point2) -> Self {
        Self(x + 1, y + 1)
    }

    fn is_inside(self, Point2 { x, y }: Point2) -> bool {
        // walls are on every border of the square
        let Self(cols, rows) = self;

        (1..(cols - 1)).contains(&x) && (1..(rows - 1)).contains(&y)
    }

    /// Blizzard patterns repeat once every inner row and column has cycled.
    fn period(self) -> usize {
        let Self(cols, rows) = self;

        match (usize::try_from(cols - 2), usize::try_from(rows - 2)) {
            (Ok(w), Ok(h)) => lcm(w, h),
            _ => 0,
        }
    }
}

fn rehome(p: Point2, MapSize(cols, rows): MapSize, direction: Direction) -> Point2 {
    // Columns `0` and `cols - 1` are walls
    // Rows `0` and `rows - 1` are walls too
    fn wrap(n: i64, size: i64) -> i64 {
        match n {
            0 => size - 2,
            n if n == size - 1 => 1,
            n => n,
        }
    }

    let Point2 { x, y } = p + direction;

    Point2::new(wrap(x, cols), wrap(y, rows))
}

#[derive(Clone, Copy, Debug)]
struct MapInfo {
    dims: MapSize,

    start: Point2,
    end: Point2,
}

struct Wall {
    hole: Point2,
    end: Point2,
}

fn pierced_wall(s: Span) -> IResult<Span, Wall> {
    let (r, hole) = map(
        delimited(many1(wall), with_point(char('.')), many1(wall)),
        |(p, _)| p,
    )(s)?;

    let end = get_point(r) - Direction::East;

    Ok((r, Wall { hole, end }))
}

fn single_line(s: Span) -> IResult<Span, Vec<Blizzard>> {
    #[derive(Clone)]
    enum LinePoint {
        Blizzard(Blizzard),
        Open,
    }

    map(
        delimited(
            wall,
            many1(alt((
                map(blizzard, LinePoint::Blizzard),
                value(LinePoint::Open, char('.')),
            ))),
            wall,
        ),
        |lps| {
            lps.into_iter()
                .filter_map(|lp| match lp {
                    LinePoint::Blizzard(bz) => Some(bz),
                    LinePoint::Open => None,
                })
                .collect()
        },
    )(s)
}

#[derive(Debug)]
struct Valley {
    blizzards: Blizzards,
    info: MapInfo,
}

fn valley(s: Span) -> IResult<Span, Valley> {
    map(
        tuple((
            pierced_wall,
            preceded(multispace1, many1(terminated(single_line, multispace1))),
            pierced_wall,
        )),
        |(st_w, lines, nd_w)| Valley {
            blizzards: Blizzards(
                lines
                    .into_iter()
                    .flatten()
                    .map(|Blizzard { loc, dir }| (loc, vec![dir]))
                    .collect(),
            ),
            info: MapInfo {
                dims: MapSize::from_edge(nd_w.end),
                start: st_w.hole,
                end: nd_w.hole,
            },
        },
    )(s)
}

fn load_valley(input: &str) -> Result<Valley, Box<dyn Error>> {
    let (_, valley) = valley(Span::new(input.trim_start()))
        .map_err(|e| e.map(|e| NomError::new(e.input.to_string(), e.code)))?;

    Ok(valley)
}

impl Valley {
    /// Minutes needed to walk `trip` without ever sharing a cell with a blizzard.
    fn crossing(&self, trip: Trip) -> Result<usize, SearchError> {
        let MapInfo { dims, start, end } = self.info;

        debug!("valley {dims:?}, blizzard period {}", dims.period());

        let mut timeline = Timeline::new(self.blizzards.clone(), dims.period(), |b: &Blizzards| {
            b.advance(dims)
        })?;

        traverse(&mut timeline, start, end, trip, |p: Point2| {
            p.neighbourhood()
                .into_iter()
                .filter(move |&n| dims.is_inside(n) || n == start || n == end)
        })
    }
}

fn dump_blizzards(bz: &Blizzards, info: &MapInfo) {
    let MapSize(cols, rows) = info.dims;

    let edge = |hole: Point2, mark: char| {
        (0..cols)
            .map(|i| if i == hole.x { mark } else { '#' })
            .collect::<String>()
    };

    println!("{}", edge(info.start, 'S'));

    for j in 1..(rows - 1) {
        print!("#");

        for i in 1..(cols - 1) {
            match bz.0.get(&Point2::new(i, j)).map(Vec::as_slice) {
                Some([dir]) => print!("{dir}"),
                Some(dirs) => print!("{}", dirs.len()),
                None => print!("."),
            }
        }

        println!("#");
    }

    println!("{}", edge(info.end, 'F'));
    println!();
}

/// AoC problem for Dec 24 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the valley before walking it
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let valley = load_valley(&fs::read_to_string(file)?)?;

    if dump {
        println!("Map:");
        dump_blizzards(&valley.blizzards, &valley.info);
    }

    let first = valley.crossing(Trip::OneWay)?;
    let round = valley.crossing(Trip::RoundTrip)?;

    println!("one way: {first}, there and back and there again: {round}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#.######\n#>>.<^<#\n#.<..<<#\n#>v.><>#\n#<^v^^>#\n######.#";

    #[test]
    fn parses_sample() {
        let v = load_valley(SAMPLE).unwrap();

        assert_eq!(v.info.dims, MapSize(8, 6));
        assert_eq!(v.info.start, Point2::new(1, 0));
        assert_eq!(v.info.end, Point2::new(6, 5));
        assert_eq!(v.blizzards.0.len(), 19);
        assert_eq!(
            v.blizzards.0.get(&Point2::new(1, 1)),
            Some(&vec![Direction::East])
        );
    }

    #[test]
    fn blizzards_wrap_around() {
        let dims = MapSize(7, 7);

        assert_eq!(rehome(Point2::new(5, 3), dims, Direction::East), Point2::new(1, 3));
        assert_eq!(rehome(Point2::new(2, 1), dims, Direction::North), Point2::new(2, 5));
        assert_eq!(rehome(Point2::new(2, 2), dims, Direction::South), Point2::new(2, 3));
    }

    #[test]
    fn pattern_repeats_with_period() {
        let v = load_valley(SAMPLE).unwrap();
        let dims = v.info.dims;

        assert_eq!(dims.period(), 12);

        let later = (0..12).fold(v.blizzards.clone(), |b, _| b.advance(dims));

        assert_eq!(later, v.blizzards);
        assert_ne!(v.blizzards.advance(dims), v.blizzards);
    }

    #[test]
    fn one_way() {
        let v = load_valley(SAMPLE).unwrap();

        assert_eq!(v.crossing(Trip::OneWay), Ok(18));
    }

    #[test]
    fn round_trip() {
        let v = load_valley(SAMPLE).unwrap();

        assert_eq!(v.crossing(Trip::RoundTrip), Ok(54));
    }

    #[test]
    fn sealed_valley_is_unsolvable() {
        // the exit is boxed in by a column of blizzards that never moves away
        let v = load_valley("#.###\n#..v#\n#..^#\n###.#").unwrap();

        assert!(matches!(
            v.crossing(Trip::OneWay),
            Err(SearchError::Unsolvable { .. })
        ));
    }
}
