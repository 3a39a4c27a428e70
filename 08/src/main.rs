use std::{collections::HashSet, error::Error, fs};

use aoc_common::{Direction, Grid, Point2};
use ansi_term::{Colour, Style};
use clap::Parser;
use log::debug;
use strum::IntoEnumIterator;

const TREE_MAX_HEIGHT: u8 = 9;

struct Forest {
    trees: Grid<u8>,
}

impl Forest {
    fn height(&self, p: Point2) -> Option<u8> {
        self.trees.get(p).copied()
    }

    /// Edge trees from which a walk in `dir` crosses the whole forest.
    fn edge(&self, dir: Direction) -> Vec<Point2> {
        use Direction::*;

        let (w, h) = (self.trees.width() as i64, self.trees.height() as i64);

        match dir {
            North => (0..w).map(|x| Point2::new(x, h - 1)).collect(),
            South => (0..w).map(|x| Point2::new(x, 0)).collect(),
            East => (0..h).map(|y| Point2::new(0, y)).collect(),
            West => (0..h).map(|y| Point2::new(w - 1, y)).collect(),
        }
    }

    /// Trees visible from outside the forest along any row or column.
    fn visible(&self) -> HashSet<Point2> {
        let mut visible = HashSet::new();

        for dir in Direction::iter() {
            for first in self.edge(dir) {
                let Some(mut tallest) = self.height(first) else {
                    continue;
                };

                visible.insert(first);

                let mut p = first + dir;

                // nothing past a maximum height tree can be seen
                while let (Some(h), false) = (self.height(p), tallest == TREE_MAX_HEIGHT) {
                    if h > tallest {
                        visible.insert(p);
                        tallest = h;
                    }

                    p += dir;
                }
            }
        }

        visible
    }

    fn scenic_score(&self, at: Point2) -> usize {
        let Some(this) = self.height(at) else {
            return 0;
        };

        Direction::iter()
            .map(|dir| {
                let mut seen = 0;
                let mut p = at + dir;

                while let Some(h) = self.height(p) {
                    seen += 1; // gets a one for simply having a neighbour

                    if h >= this {
                        break; // stop, we will not see anything past this tree
                    }

                    p += dir;
                }

                seen
            })
            .product()
    }

    fn best_tree(&self) -> Option<(Point2, usize)> {
        self.trees
            .items()
            .map(|(p, _)| (p, self.scenic_score(p)))
            .max_by_key(|&(_, score)| score)
    }
}

fn dump_forest(forest: &Forest, visible: &HashSet<Point2>, best: Point2) {
    for (j, row) in forest.trees.rows().enumerate() {
        for (i, height) in row.iter().enumerate() {
            let p = Point2::new(i as i64, j as i64);

            print!(
                "{}",
                Style::new()
                    .on(match (visible.contains(&p), best == p) {
                        (_, true) => Colour::Blue,
                        (true, _) => Colour::Green,
                        (false, _) => Colour::Red,
                    })
                    .paint(height.to_string())
            );
        }

        println!();
    }
}

fn load_forest(input: &str) -> Result<Forest, Box<dyn Error>> {
    let trees = Grid::parse(input, |_, c| {
        c.to_digit(10)
            .map(|d| d as u8)
            .ok_or_else(|| format!("invalid character '{c}'"))
    })?;

    Ok(Forest { trees })
}

/// AoC problem for Dec 08 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the forest, visible trees in green and the best one in blue
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let forest = load_forest(&fs::read_to_string(file)?)?;

    let visible = forest.visible();
    let (best, score) = forest.best_tree().ok_or("failed to find the best tree")?;

    debug!("best tree at {best}");

    if dump {
        dump_forest(&forest, &visible, best);
    }

    println!(
        "The forest has {} visible trees. The best one has score = {score}",
        visible.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "30373\n25512\n65332\n33549\n35390";

    #[test]
    fn visible_from_outside() {
        let forest = load_forest(SAMPLE).unwrap();

        assert_eq!(forest.visible().len(), 21);
        assert!(!forest.visible().contains(&Point2::new(3, 1)));
    }

    #[test]
    fn scenic_scores() {
        let forest = load_forest(SAMPLE).unwrap();

        assert_eq!(forest.scenic_score(Point2::new(2, 1)), 4);
        assert_eq!(forest.scenic_score(Point2::new(0, 0)), 0);
        assert_eq!(forest.best_tree(), Some((Point2::new(2, 3), 8)));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(load_forest("12\n3a").is_err());
    }
}
