use std::{error::Error, fs};

use aoc_common::{distances_from, Grid, Point2};
use ansi_term::{Colour, Style};
use clap::Parser;
use log::debug;

#[derive(Debug)]
struct HeightMap {
    points: Grid<u8>,
    start: Point2,
    end: Point2,
}

impl HeightMap {
    /// Steps from `S` to `E`, climbing at most one level per step.
    fn climb(&self) -> Result<usize, Box<dyn Error>> {
        let table = distances_from(&self.points, self.start, |&from, &to| to <= from + 1)?;

        debug!("forward search reached {} squares", table.len());

        table
            .get(&self.end)
            .ok_or_else(|| "failed to find a path".into())
    }

    /// Fewest steps from any lowest square to `E`.
    ///
    /// Walks downhill from `E` once instead of searching from every `a`.
    fn best_trail(&self) -> Result<usize, Box<dyn Error>> {
        let table = distances_from(&self.points, self.end, |&from, &to| from <= to + 1)?;

        debug!("reversed search reached {} squares", table.len());

        table
            .min_over(|&p| self.points.get(p) == Some(&0))
            .ok_or_else(|| "no lowest square reaches the summit".into())
    }
}

fn dump_hmap(hmap: &HeightMap) {
    for (j, row) in hmap.points.rows().enumerate() {
        for (i, &height) in row.iter().enumerate() {
            fn compute_shade(lvl: u8) -> u8 {
                const SLOPE: f64 = u8::MAX as f64 / 26.0f64;

                (SLOPE * lvl as f64) as u8
            }

            let here = Point2::new(i as i64, j as i64);

            let (c, fg, bg) = if here == hmap.start {
                ('S', Colour::White, Colour::Green)
            } else if here == hmap.end {
                ('E', Colour::Black, Colour::Red)
            } else {
                let lvl = compute_shade(height);

                let fg = if lvl < 128 {
                    Colour::White
                } else {
                    Colour::Black
                };

                let bg = Colour::RGB(lvl, lvl, lvl);

                (char::from(height + b'a'), fg, bg)
            };

            print!("{}", Style::new().on(bg).fg(fg).paint(c.to_string()));
        }

        println!();
    }

    println!();
}

fn load_heightmap(input: &str) -> Result<HeightMap, Box<dyn Error>> {
    let mut some_start = None;
    let mut some_end = None;

    let points = Grid::parse(input, |p, c| {
        match c {
            'a'..='z' => Ok(c),
            'E' => {
                some_end = Some(p);

                Ok('z')
            }
            'S' => {
                some_start = Some(p); // always starts at 'a'

                Ok('a')
            }
            c => Err(format!("invalid character '{c}'")),
        }
        .map(|c| c as u8 - b'a')
    })?;

    match (some_start, some_end) {
        (Some(start), Some(end)) => Ok(HeightMap { points, start, end }),
        _ => Err("missing start or end".into()),
    }
}

/// AoC problem for Dec 12 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the coloured heightmap
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let hmap = load_heightmap(&fs::read_to_string(file)?)?;

    if dump {
        dump_hmap(&hmap);
    }

    println!("path from S: {} steps", hmap.climb()?);
    println!("best path from any 'a': {} steps", hmap.best_trail()?);

    Ok(())
}
