use std::{collections::HashSet, error::Error, fs, iter::repeat};

use aoc_common::{
    parse::{finish, unsigned},
    Direction, Point2,
};
use clap::Parser;
use log::debug;
use nom::{
    character::complete::{anychar, space1},
    combinator::{all_consuming, map, map_res},
    sequence::separated_pair,
    IResult,
};

fn direction(input: &str) -> IResult<&str, Direction> {
    map_res(anychar, Direction::try_from)(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Command {
    direction: Direction,
    steps: u32,
}

impl Command {
    fn directions(self) -> impl Iterator<Item = Direction> {
        repeat(self.direction).take(self.steps as usize)
    }
}

impl From<(Direction, u32)> for Command {
    fn from((direction, steps): (Direction, u32)) -> Self {
        Self { direction, steps }
    }
}

fn command(input: &str) -> IResult<&str, Command> {
    all_consuming(map(
        separated_pair(direction, space1, unsigned),
        Command::from,
    ))(input)
}

fn load_commands(input: &str) -> Result<Vec<Command>, Box<dyn Error>> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| finish(command(line)).map_err(Into::into))
        .collect()
}

fn fixup_pair(lead: Point2, follow: Point2) -> Point2 {
    let diff = lead - follow;

    debug_assert!(diff.x.abs() < 3 && diff.y.abs() < 3, "knots torn apart: {diff}");

    if diff.x.abs() < 2 && diff.y.abs() < 2 {
        follow // do nothing, tail is fine
    } else {
        follow + diff.signum()
    }
}

#[derive(Debug)]
struct Rope {
    knots: Vec<Point2>,
}

impl Rope {
    fn new(len: usize) -> Self {
        Self {
            knots: vec![Point2::ORIGIN; len],
        }
    }

    fn fixup(&mut self) {
        let mut prev = None;

        for point in self.knots.iter_mut() {
            if let Some(prev) = prev {
                *point = fixup_pair(prev, *point);
            }

            prev = Some(*point);
        }
    }

    fn move_head(&mut self, dir: Direction) -> Option<Point2> {
        let head = self.knots.first_mut()?;

        *head += dir;

        self.fixup();

        self.knots.last().copied()
    }
}

/// Distinct positions visited by the last knot of a rope with `len` knots.
fn tail_visits(commands: &[Command], len: usize) -> usize {
    let mut rope = Rope::new(len);
    let mut tail_pos = HashSet::from([Point2::ORIGIN]);

    for dir in commands.iter().flat_map(|cmd| cmd.directions()) {
        tail_pos.extend(rope.move_head(dir));
    }

    debug!("rope of {len} knots ends at {:?}", rope.knots);

    tail_pos.len()
}

/// AoC problem for Dec 09 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file } = Args::parse();

    let commands = load_commands(&fs::read_to_string(file)?)?;

    println!("short rope: tail visited {} positions", tail_visits(&commands, 2));
    println!("long rope: tail visited {} positions", tail_visits(&commands, 10));

    Ok(())
}
