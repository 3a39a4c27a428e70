use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    error::Error,
    fs,
};

use aoc_common::{Direction, Grid, Point2, Turn};
use clap::Parser;
use itertools::Itertools;
use log::{debug, trace};

/// The three cells an elf looks at before stepping towards `dir`.
fn side(point: Point2, dir: Direction) -> [Point2; 3] {
    let ahead = point + dir;

    [
        ahead + dir.rotate(Turn::Left),
        ahead,
        ahead + dir.rotate(Turn::Right),
    ]
}

fn extent(points: &HashSet<Point2>) -> Option<(Point2, Point2)> {
    let (x0, x1) = points.iter().map(|p| p.x).minmax().into_option()?;
    let (y0, y1) = points.iter().map(|p| p.y).minmax().into_option()?;

    Some((Point2::new(x0, y0), Point2::new(x1, y1)))
}

#[derive(Clone, Copy)]
enum Slot {
    Taken(Point2),
    Spoilt,
}

#[derive(Debug)]
struct Grove {
    elves: HashSet<Point2>,
    order: [Direction; 4],
    rounds: usize,
    still: Option<usize>,
}

impl Grove {
    fn new(elves: HashSet<Point2>) -> Self {
        use Direction::*;

        Self {
            elves,
            order: [North, South, West, East],
            rounds: 0,
            still: None,
        }
    }

    fn proposal(&self, elf: Point2) -> Option<Point2> {
        let alone = elf.surrounding().iter().all(|p| !self.elves.contains(p));

        if alone {
            return None;
        }

        self.order
            .iter()
            .find(|&&dir| side(elf, dir).iter().all(|p| !self.elves.contains(p)))
            .map(|&dir| elf + dir)
    }

    /// Plays one round; returns whether any elf moved.
    fn round(&mut self) -> bool {
        let mut movements = HashMap::new();

        for &elf in &self.elves {
            let Some(dest) = self.proposal(elf) else {
                continue;
            };

            match movements.entry(dest) {
                Entry::Occupied(mut oe) => {
                    // two elves want the same cell, neither gets it
                    *oe.get_mut() = Slot::Spoilt;
                }
                Entry::Vacant(ve) => {
                    ve.insert(Slot::Taken(elf));
                }
            }
        }

        let movements: Vec<_> = movements
            .into_iter()
            .filter_map(|(dest, slot)| match slot {
                Slot::Taken(src) => Some((src, dest)),
                Slot::Spoilt => None,
            })
            .collect();

        for &(src, _) in &movements {
            self.elves.remove(&src);
        }

        self.elves.extend(movements.iter().map(|&(_, dest)| dest));

        self.order.rotate_left(1);
        self.rounds += 1;

        trace!("round {}: {} elves moved", self.rounds, movements.len());

        if movements.is_empty() && self.still.is_none() {
            self.still = Some(self.rounds);
        }

        !movements.is_empty()
    }

    /// Empty cells in the smallest rectangle holding every elf.
    fn empty_ground(&self) -> i64 {
        let Some((lo, hi)) = extent(&self.elves) else {
            return 0;
        };

        (hi.x - lo.x + 1) * (hi.y - lo.y + 1) - self.elves.len() as i64
    }

    /// Number of the first round where nobody moves, playing as many as needed.
    fn settle(&mut self) -> usize {
        loop {
            if let Some(still) = self.still {
                break still;
            }

            self.round();
        }
    }
}

fn dump_grove(grove: &Grove) {
    let Some((lo, hi)) = extent(&grove.elves) else {
        return;
    };

    for y in lo.y..=hi.y {
        let line: String = (lo.x..=hi.x)
            .map(|x| {
                if grove.elves.contains(&Point2::new(x, y)) {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();

        println!("{line}");
    }

    println!();
}

fn load_elves(input: &str) -> Result<HashSet<Point2>, Box<dyn Error>> {
    let map = Grid::parse(input, |_, c| match c {
        '#' => Ok(true),
        '.' => Ok(false),
        c => Err(format!("invalid character '{c}'")),
    })?;

    Ok(map.items().filter(|&(_, &elf)| elf).map(|(p, _)| p).collect())
}

/// AoC problem for Dec 23 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the grove after ten rounds and once everybody settled
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let mut grove = Grove::new(load_elves(&fs::read_to_string(file)?)?);

    debug!("{} elves", grove.elves.len());

    for _ in 0..10 {
        grove.round();
    }

    if dump {
        dump_grove(&grove);
    }

    println!("empty ground after 10 rounds: {}", grove.empty_ground());

    let last = grove.settle();

    if dump {
        dump_grove(&grove);
    }

    println!("first round where no elf moves: {last}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "....#..\n..###.#\n#...#.#\n.#...##\n#.###..\n##.#.##\n.#..#..";
    const SMALL: &str = "##\n#.\n..\n##";

    #[test]
    fn loads_elves() {
        let elves = load_elves(SMALL).unwrap();

        assert_eq!(elves.len(), 5);
        assert!(elves.contains(&Point2::new(1, 0)));
        assert!(!elves.contains(&Point2::new(1, 1)));
        assert!(load_elves("#.\n#x").is_err());
    }

    #[test]
    fn looks_at_three_cells() {
        let cells = side(Point2::new(5, 5), Direction::North);

        assert!(cells.contains(&Point2::new(4, 4)));
        assert!(cells.contains(&Point2::new(5, 4)));
        assert!(cells.contains(&Point2::new(6, 4)));
    }

    #[test]
    fn small_grove() {
        let mut grove = Grove::new(load_elves(SMALL).unwrap());

        assert!(grove.round());
        assert!(grove.elves.contains(&Point2::new(0, -1)));
        assert!(grove.elves.contains(&Point2::new(1, -1)));

        assert_eq!(grove.settle(), 4);
        assert_eq!(grove.empty_ground(), 25);
    }

    #[test]
    fn ten_rounds() {
        let mut grove = Grove::new(load_elves(SAMPLE).unwrap());

        for _ in 0..10 {
            grove.round();
        }

        assert_eq!(grove.empty_ground(), 110);
    }

    #[test]
    fn settles() {
        let mut grove = Grove::new(load_elves(SAMPLE).unwrap());

        assert_eq!(grove.settle(), 20);
    }
}
