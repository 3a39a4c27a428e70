use std::{
    collections::{HashMap, VecDeque},
    error::Error,
    fs,
};

use aoc_common::{parse::unsigned, Direction, Point2, Point3, Turn};
use clap::Parser;
use itertools::Itertools;
use log::{debug, trace};
use nom::{
    branch::alt,
    character::complete::{char, line_ending, multispace0},
    combinator::{all_consuming, map, value},
    error::Error as NomError,
    multi::many1,
    sequence::{separated_pair, terminated},
    IResult,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tile {
    Outside,
    Open,
    Wall,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Command {
    Forward(usize),
    Turn(Turn),
}

fn row(input: &str) -> IResult<&str, Vec<Tile>> {
    use Tile::*;

    terminated(
        many1(alt((
            value(Outside, char(' ')),
            value(Open, char('.')),
            value(Wall, char('#')),
        ))),
        line_ending,
    )(input)
}

fn commands(input: &str) -> IResult<&str, Vec<Command>> {
    many1(alt((
        map(unsigned, Command::Forward),
        value(Command::Turn(Turn::Left), char('L')),
        value(Command::Turn(Turn::Right), char('R')),
    )))(input)
}

fn notes(input: &str) -> IResult<&str, (Vec<Vec<Tile>>, Vec<Command>)> {
    all_consuming(terminated(
        separated_pair(many1(row), line_ending, commands),
        multispace0,
    ))(input)
}

/// The walkable part of the map; anything not in `tiles` is off the board.
#[derive(Debug)]
struct Board {
    tiles: HashMap<Point2, Tile>,
}

impl Board {
    fn new(rows: Vec<Vec<Tile>>) -> Self {
        let tiles = rows
            .into_iter()
            .enumerate()
            .flat_map(|(j, row)| {
                row.into_iter()
                    .enumerate()
                    .filter(|&(_, t)| t != Tile::Outside)
                    .map(move |(i, t)| (Point2::new(i as i64, j as i64), t))
            })
            .collect();

        Self { tiles }
    }

    /// Leftmost open tile of the top row.
    fn spawn(&self) -> Option<Point2> {
        self.tiles
            .iter()
            .filter(|&(_, &t)| t == Tile::Open)
            .map(|(&p, _)| p)
            .min_by_key(|p| (p.y, p.x))
    }

    fn walk<W: Wrap>(&self, wrap: &W, cmds: &[Command]) -> Result<Walker, Box<dyn Error>> {
        let mut me = Walker {
            pos: self.spawn().ok_or("the board has no open tile")?,
            dir: Direction::East,
            trail: HashMap::new(),
        };

        for &cmd in cmds {
            match cmd {
                Command::Turn(turn) => me.dir = me.dir.rotate(turn),
                Command::Forward(n) => {
                    for _ in 0..n {
                        me.trail.insert(me.pos, me.dir);

                        let ahead = me.pos + me.dir;

                        let (next, dir) = if self.tiles.contains_key(&ahead) {
                            (ahead, me.dir)
                        } else {
                            wrap.wrap(me.pos, me.dir)
                                .ok_or_else(|| format!("cannot leave the board from {}", me.pos))?
                        };

                        if self.tiles.get(&next) != Some(&Tile::Open) {
                            break;
                        }

                        (me.pos, me.dir) = (next, dir);
                    }
                }
            }
        }

        debug!("walk ends at {} facing {}", me.pos, me.dir);

        Ok(me)
    }
}

#[derive(Debug)]
struct Walker {
    pos: Point2,
    dir: Direction,
    trail: HashMap<Point2, Direction>,
}

impl Walker {
    fn password(&self) -> i64 {
        use Direction::*;

        let facing = match self.dir {
            East => 0,
            South => 1,
            West => 2,
            North => 3,
        };

        1000 * (self.pos.y + 1) + 4 * (self.pos.x + 1) + facing
    }
}

/// Where a step that falls off the board lands, and the direction held after.
trait Wrap {
    fn wrap(&self, from: Point2, dir: Direction) -> Option<(Point2, Direction)>;
}

/// Re-enters from the opposite side of the same row or column.
struct Flat<'a>(&'a Board);

impl Wrap for Flat<'_> {
    fn wrap(&self, from: Point2, dir: Direction) -> Option<(Point2, Direction)> {
        let Self(board) = self;

        let mut p = from;

        while board.tiles.contains_key(&(p - dir)) {
            p = p - dir;
        }

        Some((p, dir))
    }
}

/// Placement of one face of the folded cube.
///
/// `corner` is the face slot on the net, in face sized units. `right` and
/// `down` are the 3D directions of east and south on the net.
#[derive(Clone, Copy, Debug)]
struct Face {
    corner: Point2,
    normal: Point3,
    right: Point3,
    down: Point3,
}

impl Face {
    fn unit(&self, dir: Direction) -> Point3 {
        use Direction::*;

        match dir {
            North => -self.down,
            East => self.right,
            South => self.down,
            West => -self.right,
        }
    }

    fn facing(&self, unit: Point3) -> Option<Direction> {
        use Direction::*;

        [North, East, South, West]
            .into_iter()
            .find(|&d| self.unit(d) == unit)
    }
}

/// The board folded into a cube with side `size`.
///
/// Cell centres live in doubled coordinates, so the cube spans `-size..=size`
/// on every axis and each face lies on the plane `normal · p == size`.
#[derive(Debug)]
struct Cube {
    size: i64,
    faces: HashMap<Point2, Face>,
}

impl Cube {
    fn fold(board: &Board) -> Result<Self, Box<dyn Error>> {
        let area = board.tiles.len() as i64;
        let size = (1..).take_while(|n| 6 * n * n <= area).last().unwrap_or(0);

        if size == 0 || 6 * size * size != area {
            return Err(format!("{area} tiles cannot cover a cube").into());
        }

        let slots: Vec<Point2> = board
            .tiles
            .keys()
            .map(|p| Point2::new(p.x.div_euclid(size), p.y.div_euclid(size)))
            .unique()
            .collect();

        let first = board
            .spawn()
            .map(|p| Point2::new(p.x.div_euclid(size), p.y.div_euclid(size)))
            .ok_or("the board has no open tile")?;

        let mut faces = HashMap::from([(
            first,
            Face {
                corner: first,
                normal: Point3::new(0, 0, 1),
                right: Point3::new(1, 0, 0),
                down: Point3::new(0, 1, 0),
            },
        )]);

        let mut queue = VecDeque::from([first]);

        while let Some(slot) = queue.pop_front() {
            let Face {
                normal,
                right,
                down,
                ..
            } = faces[&slot];

            // roll the cube over the edge shared with each neighbouring slot
            let rolled = [
                (Direction::East, right, -normal, down),
                (Direction::West, -right, normal, down),
                (Direction::South, down, right, -normal),
                (Direction::North, -down, right, normal),
            ];

            for (dir, normal, right, down) in rolled {
                let next = slot + dir;

                if !slots.contains(&next) || faces.contains_key(&next) {
                    continue;
                }

                faces.insert(
                    next,
                    Face {
                        corner: next,
                        normal,
                        right,
                        down,
                    },
                );
                queue.push_back(next);
            }
        }

        let normals = faces.values().map(|f| f.normal).unique().count();

        if faces.len() != 6 || normals != 6 || slots.len() != 6 {
            return Err("the board does not fold into a cube".into());
        }

        for (slot, face) in faces.iter().sorted_by_key(|&(s, _)| (s.y, s.x)) {
            debug!("face at {slot}: normal {}", face.normal);
        }

        Ok(Self { size, faces })
    }

    fn face_of(&self, p: Point2) -> Option<&Face> {
        self.faces
            .get(&Point2::new(p.x.div_euclid(self.size), p.y.div_euclid(self.size)))
    }

    fn face_with_normal(&self, normal: Point3) -> Option<&Face> {
        self.faces.values().find(|f| f.normal == normal)
    }

    fn to_space(&self, face: &Face, p: Point2) -> Point3 {
        let n = self.size;
        let (u, v) = (p.x - face.corner.x * n, p.y - face.corner.y * n);

        face.normal * n + face.right * (2 * u + 1 - n) + face.down * (2 * v + 1 - n)
    }

    fn to_net(&self, face: &Face, p: Point3) -> Point2 {
        let n = self.size;
        let (u, v) = ((p.dot(face.right) + n - 1) / 2, (p.dot(face.down) + n - 1) / 2);

        Point2::new(face.corner.x * n + u, face.corner.y * n + v)
    }
}

impl Wrap for Cube {
    fn wrap(&self, from: Point2, dir: Direction) -> Option<(Point2, Direction)> {
        let face = self.face_of(from)?;
        let heading = face.unit(dir);

        // over the edge and one half cell down the next face
        let landing = self.to_space(face, from) + heading - face.normal;

        let next = self.face_with_normal(heading)?;
        let turned = next.facing(-face.normal)?;
        let at = self.to_net(next, landing);

        trace!("{from} {dir} wraps to {at} {turned}");

        Some((at, turned))
    }
}

fn dump_trail(board: &Board, trail: &HashMap<Point2, Direction>) {
    let Some((x_min, x_max)) = board.tiles.keys().map(|p| p.x).minmax().into_option() else {
        return;
    };

    let y_max = board.tiles.keys().map(|p| p.y).max().unwrap_or(0);

    for y in 0..=y_max {
        let line: String = (x_min..=x_max)
            .map(|x| {
                let p = Point2::new(x, y);

                match (trail.get(&p), board.tiles.get(&p)) {
                    (Some(dir), _) => dir.to_string(),
                    (None, Some(Tile::Wall)) => "#".into(),
                    (None, Some(_)) => ".".into(),
                    (None, None) => " ".into(),
                }
            })
            .collect();

        println!("{}", line.trim_end());
    }

    println!();
}

fn load_notes(input: &str) -> Result<(Board, Vec<Command>), Box<dyn Error>> {
    let (_, (rows, cmds)) =
        notes(input).map_err(|e| e.map(|e| NomError::new(e.input.to_string(), e.code)))?;

    Ok((Board::new(rows), cmds))
}

/// AoC problem for Dec 22 2022
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,

    /// print the path taken on the cube over the map
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Args { file, dump } = Args::parse();

    let (board, cmds) = load_notes(&fs::read_to_string(file)?)?;

    let flat = board.walk(&Flat(&board), &cmds)?;
    let cube = board.walk(&Cube::fold(&board)?, &cmds)?;

    if dump {
        dump_trail(&board, &cube.trail);
    }

    println!("flat password = {}", flat.password());
    println!("cube password = {}", cube.password());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "        ...#\n",
        "        .#..\n",
        "        #...\n",
        "        ....\n",
        "...#.......#\n",
        "........#...\n",
        "..#....#....\n",
        "..........#.\n",
        "        ...#....\n",
        "        .....#..\n",
        "        .#......\n",
        "        ......#.\n",
        "\n",
        "10R5L5R10L4R5L5\n",
    );

    #[test]
    fn parses_notes() {
        let (board, cmds) = load_notes(SAMPLE).unwrap();

        assert_eq!(board.tiles.len(), 96);
        assert_eq!(board.spawn(), Some(Point2::new(8, 0)));
        assert_eq!(board.tiles.get(&Point2::new(11, 0)), Some(&Tile::Wall));
        assert_eq!(board.tiles.get(&Point2::new(0, 0)), None);
        assert_eq!(cmds.len(), 13);
        assert_eq!(cmds[1], Command::Turn(Turn::Right));
        assert!(load_notes("..\n\n3X").is_err());
    }

    #[test]
    fn flat_wrap_goes_around_the_row() {
        let (board, _) = load_notes(SAMPLE).unwrap();

        assert_eq!(
            Flat(&board).wrap(Point2::new(11, 6), Direction::East),
            Some((Point2::new(0, 6), Direction::East))
        );
        assert_eq!(
            Flat(&board).wrap(Point2::new(5, 4), Direction::North),
            Some((Point2::new(5, 7), Direction::North))
        );
    }

    #[test]
    fn flat_password() {
        let (board, cmds) = load_notes(SAMPLE).unwrap();

        assert_eq!(board.walk(&Flat(&board), &cmds).unwrap().password(), 6032);
    }

    #[test]
    fn cube_folds() {
        let (board, _) = load_notes(SAMPLE).unwrap();
        let cube = Cube::fold(&board).unwrap();

        assert_eq!(cube.size, 4);
        assert_eq!(cube.faces.len(), 6);

        // the step from A to B in the puzzle statement
        assert_eq!(
            cube.wrap(Point2::new(11, 5), Direction::East),
            Some((Point2::new(14, 8), Direction::South))
        );
        // and from C to D
        assert_eq!(
            cube.wrap(Point2::new(10, 11), Direction::South),
            Some((Point2::new(1, 7), Direction::North))
        );
    }

    #[test]
    fn cube_wraps_are_reversible() {
        let (board, _) = load_notes(SAMPLE).unwrap();
        let cube = Cube::fold(&board).unwrap();

        for &p in board.tiles.keys() {
            for dir in [Direction::North, Direction::East, Direction::South, Direction::West] {
                if board.tiles.contains_key(&(p + dir)) {
                    continue;
                }

                let (q, turned) = cube.wrap(p, dir).unwrap();

                assert!(board.tiles.contains_key(&q));
                assert_eq!(cube.wrap(q, turned.opposite()), Some((p, dir.opposite())));
            }
        }
    }

    #[test]
    fn cube_password() {
        let (board, cmds) = load_notes(SAMPLE).unwrap();
        let cube = Cube::fold(&board).unwrap();

        assert_eq!(board.walk(&cube, &cmds).unwrap().password(), 5031);
    }

    #[test]
    fn rejects_non_cubes() {
        let (board, _) = load_notes("...\n...\n\n1\n").unwrap();

        assert!(Cube::fold(&board).is_err());
    }
}
