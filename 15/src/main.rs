use std::{cmp::max, error::Error, fs, ops::RangeInclusive};

use aoc_common::{
    parse::{finish, signed, ws},
    Point2,
};
use clap::Parser;
use itertools::Itertools;
use log::debug;
use nom::{
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

const TUNING_SLOPE: i64 = 4_000_000;

fn coord<'a>(c: char) -> impl FnMut(&'a str) -> IResult<&'a str, i64> {
    map(separated_pair(char(c), ws(char('=')), signed), |(_, v)| v)
}

fn point2(input: &str) -> IResult<&str, Point2> {
    map(
        separated_pair(coord('x'), ws(char(',')), coord('y')),
        Point2::from,
    )(input)
}

fn sensor_at(input: &str) -> IResult<&str, Point2> {
    preceded(ws(tag("Sensor at")), point2)(input)
}

fn beacon_at(input: &str) -> IResult<&str, Point2> {
    preceded(ws(tag("closest beacon is at")), point2)(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Sensor {
    loc: Point2,
    closest: Point2,
    range: u64, // memoized manhattan distance
}

impl Sensor {
    fn covers(&self, point: Point2) -> bool {
        point.manhattan(self.loc) <= self.range
    }

    /// Columns of `row` within range, if any.
    fn span(&self, row: i64) -> Option<RangeInclusive<i64>> {
        let reach = self.range as i64 - (self.loc.y - row).abs();

        (reach >= 0).then(|| self.loc.x - reach..=self.loc.x + reach)
    }

    /// The points just out of range, walking the diamond clockwise from its
    /// northern tip.
    fn border(&self) -> impl Iterator<Item = Point2> {
        let r = self.range as i64 + 1;
        let Point2 { x, y } = self.loc;

        (0..r).flat_map(move |i| {
            let j = r - i;

            [
                Point2::new(x + i, y - j),
                Point2::new(x + j, y + i),
                Point2::new(x - i, y + j),
                Point2::new(x - j, y - i),
            ]
        })
    }
}

impl From<(Point2, Point2)> for Sensor {
    fn from((loc, closest): (Point2, Point2)) -> Self {
        Self {
            loc,
            closest,
            range: loc.manhattan(closest),
        }
    }
}

fn sensor(input: &str) -> IResult<&str, Sensor> {
    map(
        separated_pair(sensor_at, ws(char(':')), beacon_at),
        Sensor::from,
    )(input)
}

fn sensors(input: &str) -> IResult<&str, Vec<Sensor>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(multispace1, sensor),
        multispace0,
    ))(input)
}

fn load_sensors(input: &str) -> Result<Vec<Sensor>, Box<dyn Error>> {
    Ok(finish(sensors(input))?)
}

/// Disjoint, sorted column intervals of `row` seen by at least one sensor.
fn covered_spans(sensors: &[Sensor], row: i64) -> Vec<(i64, i64)> {
    sensors
        .iter()
        .filter_map(|s| s.span(row))
        .map(|span| (*span.start(), *span.end()))
        .sorted()
        .fold(Vec::new(), |mut spans: Vec<(i64, i64)>, (lo, hi)| {
            match spans.last_mut() {
                Some(last) if lo <= last.1 + 1 => last.1 = max(last.1, hi),
                _ => spans.push((lo, hi)),
            }

            spans
        })
}

/// Positions in `row` where no beacon can be.
fn excluded_in_row(sensors: &[Sensor], row: i64) -> usize {
    let spans = covered_spans(sensors, row);
    let covered: i64 = spans.iter().map(|(lo, hi)| hi - lo + 1).sum();

    // a known beacon is always inside its own sensor's span
    let beacons = sensors
        .iter()
        .map(|s| s.closest)
        .filter(|b| b.y == row)
        .unique()
        .count();

    debug!("row {row}: {} spans, {beacons} beacons", spans.len());

    covered as usize - beacons
}

/// The only point in `0..=boundary` squared that no sensor covers.
///
/// Being unique, it must lie just outside the range of some sensor, so only
/// the diamond borders are searched.
fn distress_beacon(sensors: &[Sensor], boundary: i64) -> Option<Point2> {
    let area = 0..=boundary;

    sensors
        .iter()
        .flat_map(|s| s.border())
        .filter(|p| area.contains(&p.x) && area.contains(&p.y))
        .find(|&p| sensors.iter().all(|s| !s.covers(p)))
}

fn tuning_frequency(p: Point2) -> i64 {
    p.x * TUNING_SLOPE + p.y
}

/// AoC problem for Dec 15 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// row to count excluded positions on
    #[arg(long, default_value_t = 2_000_000)]
    row: i64,

    /// highest coordinate the distress beacon can have
    #[arg(long, default_value_t = 4_000_000)]
    boundary: i64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args {
        file,
        row,
        boundary,
    } = Args::parse();

    let sensors = load_sensors(&fs::read_to_string(file)?)?;

    debug!("{} sensors", sensors.len());

    println!(
        "{} positions cannot contain a beacon in row {row}",
        excluded_in_row(&sensors, row)
    );

    let beacon = distress_beacon(&sensors, boundary).ok_or("no uncovered position found")?;

    println!(
        "distress beacon at {beacon}, tuning frequency = {}",
        tuning_frequency(beacon)
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Sensor at x=2, y=18: closest beacon is at x=-2, y=15
Sensor at x=9, y=16: closest beacon is at x=10, y=16
Sensor at x=13, y=2: closest beacon is at x=15, y=3
Sensor at x=12, y=14: closest beacon is at x=10, y=16
Sensor at x=10, y=20: closest beacon is at x=10, y=16
Sensor at x=14, y=17: closest beacon is at x=10, y=16
Sensor at x=8, y=7: closest beacon is at x=2, y=10
Sensor at x=2, y=0: closest beacon is at x=2, y=10
Sensor at x=0, y=11: closest beacon is at x=2, y=10
Sensor at x=20, y=14: closest beacon is at x=25, y=17
Sensor at x=17, y=20: closest beacon is at x=21, y=22
Sensor at x=16, y=7: closest beacon is at x=15, y=3
Sensor at x=14, y=3: closest beacon is at x=15, y=3
Sensor at x=20, y=1: closest beacon is at x=15, y=3
";

    #[test]
    fn parses_sensors() {
        let sensors = load_sensors(SAMPLE).unwrap();

        assert_eq!(sensors.len(), 14);
        assert_eq!(sensors[0].loc, Point2::new(2, 18));
        assert_eq!(sensors[0].closest, Point2::new(-2, 15));
        assert_eq!(sensors[0].range, 7);
        assert!(load_sensors("Sensor at x=2, y=18: closest beacon is at x=-2").is_err());
    }

    #[test]
    fn spans_shrink_away_from_the_sensor() {
        let s = Sensor::from((Point2::new(8, 7), Point2::new(2, 10)));

        assert_eq!(s.range, 9);
        assert_eq!(s.span(7), Some(-1..=17));
        assert_eq!(s.span(16), Some(8..=8));
        assert_eq!(s.span(17), None);
    }

    #[test]
    fn border_is_just_out_of_range() {
        let s = Sensor::from((Point2::new(0, 0), Point2::new(1, 1)));
        let border: Vec<_> = s.border().collect();

        assert_eq!(border.len(), 12);
        assert_eq!(border.iter().unique().count(), 12);
        assert!(border.iter().all(|&p| p.manhattan(s.loc) == 3));
    }

    #[test]
    fn row_ten() {
        assert_eq!(excluded_in_row(&load_sensors(SAMPLE).unwrap(), 10), 26);
    }

    #[test]
    fn distress_signal() {
        let sensors = load_sensors(SAMPLE).unwrap();
        let beacon = distress_beacon(&sensors, 20).unwrap();

        assert_eq!(beacon, Point2::new(14, 11));
        assert_eq!(tuning_frequency(beacon), 56_000_011);
    }
}
