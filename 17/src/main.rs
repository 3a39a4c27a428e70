use std::{
    cmp::max,
    collections::{hash_map::Entry, HashMap, HashSet},
    error::Error,
    fs,
};

use aoc_common::{parse::finish, Direction, Point2};
use clap::Parser;
use log::{debug, trace};
use nom::{
    character::complete::one_of,
    combinator::{all_consuming, map_res},
    multi::many1,
    IResult,
};
use strum::EnumCount;

const WIDTH: i64 = 7;
const COLUMNS: usize = WIDTH as usize;

/// Rocks fall towards lower `y` values inside the chamber.
const DOWN: Point2 = Point2::new(0, -1);

#[derive(Clone, Copy, Debug, EnumCount)]
enum Shape {
    Line,
    Plus,
    L,
    I,
    Square,
}

const ORDER: [Shape; Shape::COUNT] = [Shape::Line, Shape::Plus, Shape::L, Shape::I, Shape::Square];

// offsets from the bottom left corner of each shape's bounding box
const SHAPES: [&[Point2]; Shape::COUNT] = [
    &[
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(2, 0),
        Point2::new(3, 0),
    ],
    &[
        Point2::new(1, 0),
        Point2::new(0, 1),
        Point2::new(1, 1),
        Point2::new(2, 1),
        Point2::new(1, 2),
    ],
    &[
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(2, 0),
        Point2::new(2, 1),
        Point2::new(2, 2),
    ],
    &[
        Point2::new(0, 0),
        Point2::new(0, 1),
        Point2::new(0, 2),
        Point2::new(0, 3),
    ],
    &[
        Point2::new(0, 0),
        Point2::new(1, 0),
        Point2::new(0, 1),
        Point2::new(1, 1),
    ],
];

impl Shape {
    fn cells_at(self, corner: Point2) -> impl Iterator<Item = Point2> {
        SHAPES[self as usize].iter().map(move |&off| corner + off)
    }
}

fn jets(input: &str) -> IResult<&str, Vec<Direction>> {
    all_consuming(many1(map_res(one_of("<>"), Direction::try_from)))(input)
}

fn load_jets(input: &str) -> Result<Vec<Direction>, Box<dyn Error>> {
    Ok(finish(jets(input.trim()))?)
}

/// Column depths below the highest rock; two chambers with the same skyline
/// behave the same for every rock that follows.
type Skyline = [i64; COLUMNS];

#[derive(Debug, Default)]
struct Chamber {
    rocks: HashSet<Point2>,
    tops: [i64; COLUMNS],
    height: i64,
}

impl Chamber {
    fn fits(&self, shape: Shape, corner: Point2) -> bool {
        shape
            .cells_at(corner)
            .all(|p| (0..WIDTH).contains(&p.x) && p.y >= 0 && !self.rocks.contains(&p))
    }

    /// Lets `shape` fall until it rests, consuming jets starting from `*jet`.
    fn drop(&mut self, shape: Shape, jets: &[Direction], jet: &mut usize) {
        let mut at = Point2::new(2, self.height + 3);

        loop {
            let pushed = at + jets[*jet];

            *jet = (*jet + 1) % jets.len();

            if self.fits(shape, pushed) {
                at = pushed;
            }

            let fallen = at + DOWN;

            if !self.fits(shape, fallen) {
                break;
            }

            at = fallen;
        }

        trace!("{shape:?} rests at {at}");

        for p in shape.cells_at(at) {
            let col = p.x as usize;

            self.tops[col] = max(self.tops[col], p.y + 1);
            self.height = max(self.height, p.y + 1);
            self.rocks.insert(p);
        }
    }

    fn skyline(&self) -> Skyline {
        self.tops.map(|top| self.height - top)
    }

    fn draw(&self, rows: i64) {
        for y in (max(0, self.height - rows)..self.height).rev() {
            let line: String = (0..WIDTH)
                .map(|x| {
                    if self.rocks.contains(&Point2::new(x, y)) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();

            println!("|{line}|");
        }

        println!("+{}+", "-".repeat(COLUMNS));
    }
}

/// Height of the tower after `count` rocks have come to rest.
///
/// Once a (shape, jet, skyline) state repeats, the whole cycle is skipped as
/// many times as it fits in the remaining rocks.
fn tower_height(jets: &[Direction], count: usize) -> u64 {
    if jets.is_empty() {
        return 0;
    }

    let mut chamber = Chamber::default();
    let mut jet = 0;

    let mut seen: HashMap<(usize, usize, Skyline), (usize, i64)> = HashMap::new();
    let mut skipped = 0;
    let mut forwarded = false;

    let mut rock = 0;

    while rock < count {
        let shape_ix = rock % Shape::COUNT;

        chamber.drop(ORDER[shape_ix], jets, &mut jet);
        rock += 1;

        if forwarded {
            continue;
        }

        match seen.entry((shape_ix, jet, chamber.skyline())) {
            Entry::Occupied(e) => {
                let &(then, height) = e.get();
                let (len, dh) = (rock - then, chamber.height - height);
                let cycles = (count - rock) / len;

                debug!("cycle of {len} rocks (+{dh} rows) at rock {rock}, skipped {cycles} times");

                rock += cycles * len;
                skipped = cycles as u64 * dh as u64;
                forwarded = true;
            }
            Entry::Vacant(e) => {
                e.insert((rock, chamber.height));
            }
        }
    }

    chamber.height as u64 + skipped
}

/// AoC problem for Dec 17 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the top rows of the chamber after this many rocks
    #[arg(long)]
    dump: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let jets = load_jets(&fs::read_to_string(file)?)?;

    debug!("{} jets", jets.len());

    if let Some(rocks) = dump {
        let mut chamber = Chamber::default();
        let mut jet = 0;

        for shape in ORDER.into_iter().cycle().take(rocks) {
            chamber.drop(shape, &jets, &mut jet);
        }

        chamber.draw(30);
    }

    println!("after 2022 rocks: {} units tall", tower_height(&jets, 2022));
    println!(
        "after 1000000000000 rocks: {} units tall",
        tower_height(&jets, 1_000_000_000_000)
    );

    Ok(())
}
