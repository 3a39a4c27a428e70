use std::{
    collections::HashMap,
    error::Error,
    fmt::{self, Display},
    fs,
};

use aoc_common::{
    parse::{finish, unsigned, ws},
    Direction, Occupancy, Point2,
};
use clap::Parser;
use itertools::Itertools;
use log::debug;
use nom::{
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map},
    multi::separated_list1,
    sequence::{delimited, separated_pair},
    IResult,
};

/// Where every grain of sand enters the cave.
const SOURCE: Point2 = Point2::new(500, 0);

/// The floor lies this many rows below the deepest rock.
const FLOOR_DIFF: i64 = 2;

fn point2(input: &str) -> IResult<&str, Point2> {
    map(
        separated_pair(ws(unsigned::<u32>), char(','), ws(unsigned::<u32>)),
        |(x, y)| Point2::new(x.into(), y.into()),
    )(input)
}

fn path(input: &str) -> IResult<&str, Vec<Point2>> {
    separated_list1(tag("->"), ws(point2))(input)
}

fn paths(input: &str) -> IResult<&str, Vec<Vec<Point2>>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(multispace1, path),
        multispace0,
    ))(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Material {
    Rock,
    Sand,
}

impl Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self {
            Material::Rock => '#',
            Material::Sand => 'o',
        };

        Display::fmt(&glyph, f)
    }
}

#[derive(Clone, Debug)]
struct Cave {
    cells: HashMap<Point2, Material>,
    deepest: i64,
    floor: bool,
}

impl Cave {
    fn is_free(&self, p: Point2) -> bool {
        self.cells.cell_at(p).is_none() && !(self.floor && p.y >= self.deepest + FLOOR_DIFF)
    }

    /// Drops one grain from the source; returns where it came to rest, or
    /// `None` when it falls into the abyss or the source is already buried.
    fn drop_grain(&mut self) -> Option<Point2> {
        if !self.is_free(SOURCE) {
            return None;
        }

        let mut grain = SOURCE;

        loop {
            if !self.floor && grain.y > self.deepest {
                return None;
            }

            let below = grain + Direction::South;

            match [below, below + Direction::West, below + Direction::East]
                .into_iter()
                .find(|&p| self.is_free(p))
            {
                Some(next) => grain = next,
                None => break,
            }
        }

        self.cells.insert(grain, Material::Sand);

        Some(grain)
    }

    /// Pours sand until it stops settling; returns how many grains rest.
    fn fill(&mut self) -> usize {
        let grains = std::iter::from_fn(|| self.drop_grain()).count();

        debug!("{grains} grains settled (floor: {})", self.floor);

        grains
    }

    fn dump(&self) {
        let Some((x0, x1)) = self.cells.keys().map(|p| p.x).minmax().into_option() else {
            return;
        };

        let bottom = if self.floor {
            self.deepest + FLOOR_DIFF - 1
        } else {
            self.deepest
        };

        for y in 0..=bottom {
            let line: String = (x0..=x1)
                .map(|x| match self.cells.cell_at(Point2::new(x, y)) {
                    Some(mat) => mat.to_string(),
                    None => ".".into(),
                })
                .collect();

            println!("{line}");
        }

        if self.floor {
            println!("{}", "#".repeat((x1 - x0 + 1) as usize));
        }

        println!();
    }
}

fn load_cave(input: &str, floor: bool) -> Result<Cave, Box<dyn Error>> {
    let mut cells = HashMap::new();

    for path in finish(paths(input))? {
        for (&from, &to) in path.iter().tuple_windows() {
            cells.extend(from.stride_to(to)?.map(|p| (p, Material::Rock)));
        }
    }

    let deepest = cells.keys().map(|p| p.y).max().ok_or("no rocks in the cave")?;

    debug!("{} rock cells, deepest at row {deepest}", cells.len());

    Ok(Cave {
        cells,
        deepest,
        floor,
    })
}

/// AoC problem for Dec 14 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the cave once the sand settled
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let input = fs::read_to_string(file)?;

    for floor in [false, true] {
        let mut cave = load_cave(&input, floor)?;
        let grains = cave.fill();

        if dump {
            cave.dump();
        }

        if floor {
            println!("with a floor, {grains} grains settle before the source is blocked");
        } else {
            println!("{grains} grains settle before sand flows into the abyss");
        }
    }

    Ok(())
}
