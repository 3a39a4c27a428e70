use std::{
    collections::{HashMap, HashSet},
    error::Error,
    fs,
};

use aoc_common::{
    distances_from,
    parse::{finish, signed, ws},
    Bounds3, Point3, SearchError,
};
use clap::Parser;
use log::debug;
use nom::{
    character::complete::{char, multispace1},
    combinator::{all_consuming, map},
    multi::separated_list1,
    sequence::{terminated, tuple},
    IResult,
};

fn point3(input: &str) -> IResult<&str, Point3> {
    map(
        tuple((
            terminated(ws(signed), char(',')),
            terminated(ws(signed), char(',')),
            ws(signed),
        )),
        Point3::from,
    )(input)
}

fn droplet(input: &str) -> IResult<&str, Vec<Point3>> {
    all_consuming(separated_list1(multispace1, point3))(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Material {
    Lava,
    Air,
}

#[derive(Debug)]
struct Droplet {
    cubes: HashSet<Point3>,
}

impl Droplet {
    /// Faces not shared with another cube, air pockets included.
    fn surface_area(&self) -> usize {
        self.cubes
            .iter()
            .flat_map(|p| p.neighbourhood())
            .filter(|n| !self.cubes.contains(n))
            .count()
    }

    /// Faces that steam flowing around the droplet can reach.
    fn exterior_surface_area(&self) -> Result<usize, SearchError> {
        let Some(bounds) = Bounds3::from_points(self.cubes.iter().copied()) else {
            return Ok(0);
        };

        // one layer of air all around, so the outside is connected
        let bounds = bounds.grow(1);

        self.exterior_from(bounds, bounds.min)
    }

    /// Faces reached by steam spreading from `source` inside `bounds`.
    fn exterior_from(&self, bounds: Bounds3, source: Point3) -> Result<usize, SearchError> {
        let Bounds3 { min, max } = bounds;

        let mut space = HashMap::new();

        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let p = Point3::new(x, y, z);

                    let mat = if self.cubes.contains(&p) {
                        Material::Lava
                    } else {
                        Material::Air
                    };

                    space.insert(p, mat);
                }
            }
        }

        let outside = distances_from(&space, source, |_, &to| to == Material::Air)?;

        debug!("{} of {} cells are outside air", outside.len(), space.len());

        Ok(self
            .cubes
            .iter()
            .flat_map(|p| p.neighbourhood())
            .filter(|n| outside.contains(n))
            .count())
    }
}

fn load_droplet(input: &str) -> Result<Droplet, Box<dyn Error>> {
    let cubes = finish(droplet(input.trim()))?;

    Ok(Droplet {
        cubes: cubes.into_iter().collect(),
    })
}

/// AoC problem for Dec 18 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file } = Args::parse();

    let droplet = load_droplet(&fs::read_to_string(file)?)?;

    println!("surface area = {}", droplet.surface_area());
    println!("exterior surface area = {}", droplet.exterior_surface_area()?);

    Ok(())
}
