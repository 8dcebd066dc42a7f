use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::env::{Command, Direction, World};

/// A compact Wumpus World simulator
///
/// Implements the subset of the course rules the agent can observe: percepts
/// are derived from adjacency, cells become revealed by visiting them, the
/// arrow flies in a straight line along the current heading, pits hold the
/// agent until it climbs out, and the episode ends on death, on grabbing the
/// gold, or when the step budget runs out. Scoring follows the course scale:
/// every action costs 1, the arrow costs 100, a pit fall 500, death 1000,
/// and the gold pays 1000.
#[derive(Debug, Clone)]
pub struct WumpusWorld {
    width: i32,
    height: i32,
    pits: HashSet<(i32, i32)>,
    wumpus: Option<(i32, i32)>,
    wumpus_alive: bool,
    gold: Option<(i32, i32)>,
    visited: HashSet<(i32, i32)>,
    pos: (i32, i32),
    facing: Direction,
    arrows: u32,
    has_gold: bool,
    eaten: bool,
    in_pit: bool,
    steps: u32,
    max_steps: u32,
    score: f64,
}

impl WumpusWorld {
    const DEFAULT_MAX_STEPS: u32 = 200;

    /// Build a world from an ASCII layout
    ///
    /// Lines run north to south. `A` marks the agent start (facing east),
    /// `P` a pit, `W` the wumpus, `G` the gold, `.` an empty cell.
    ///
    /// **Panics** on characters outside that alphabet; layouts are test
    /// fixtures and a typo should fail loudly.
    pub fn from_layout(layout: &str) -> Self {
        let lines: Vec<&str> = layout.lines().filter(|l| !l.is_empty()).collect();
        let height = lines.len() as i32;
        let width = lines.first().map_or(0, |l| l.len()) as i32;

        let mut pits = HashSet::new();
        let mut wumpus = None;
        let mut gold = None;
        let mut start = (0, 0);
        for (row, line) in lines.iter().enumerate() {
            let y = height - 1 - row as i32;
            for (col, c) in line.chars().enumerate() {
                let cell = (col as i32, y);
                match c {
                    'A' => start = cell,
                    'P' => {
                        pits.insert(cell);
                    }
                    'W' => wumpus = Some(cell),
                    'G' => gold = Some(cell),
                    '.' => {}
                    other => panic!("unexpected layout character {other:?}"),
                }
            }
        }

        Self::build(width, height, pits, wumpus, gold, start)
    }

    /// Generate a random square world from a seed
    ///
    /// The agent starts in the south-west corner; every other cell is a pit
    /// with probability 0.1, and the wumpus and gold land on distinct
    /// non-start cells.
    pub fn random(size: i32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = (0, 0);

        let mut pits = HashSet::new();
        for x in 0..size {
            for y in 0..size {
                if (x, y) != start && rng.gen::<f64>() < 0.1 {
                    pits.insert((x, y));
                }
            }
        }

        let mut pick = |taken: &[(i32, i32)]| loop {
            let cell = (rng.gen_range(0..size), rng.gen_range(0..size));
            if cell != start && !taken.contains(&cell) {
                break cell;
            }
        };
        let wumpus = pick(&[]);
        let gold = pick(&[wumpus]);
        pits.remove(&gold);

        Self::build(size, size, pits, Some(wumpus), Some(gold), start)
    }

    fn build(
        width: i32,
        height: i32,
        pits: HashSet<(i32, i32)>,
        wumpus: Option<(i32, i32)>,
        gold: Option<(i32, i32)>,
        start: (i32, i32),
    ) -> Self {
        Self {
            width,
            height,
            in_pit: pits.contains(&start),
            pits,
            wumpus,
            wumpus_alive: wumpus.is_some(),
            gold,
            visited: HashSet::from([start]),
            pos: start,
            facing: Direction::East,
            arrows: 1,
            has_gold: false,
            eaten: false,
            steps: 0,
            max_steps: Self::DEFAULT_MAX_STEPS,
            score: 0.0,
        }
    }

    /// Number of commands executed so far
    pub fn steps(&self) -> u32 {
        self.steps
    }

    fn shot_connects(&self) -> bool {
        let Some((wx, wy)) = self.wumpus else {
            return false;
        };
        let (x, y) = self.pos;
        match self.facing {
            Direction::East => wy == y && wx > x,
            Direction::West => wy == y && wx < x,
            Direction::North => wx == x && wy > y,
            Direction::South => wx == x && wy < y,
        }
    }
}

impl World for WumpusWorld {
    fn position(&self) -> (i32, i32) {
        self.pos
    }

    fn facing(&self) -> Direction {
        self.facing
    }

    fn has_glitter(&self, x: i32, y: i32) -> bool {
        !self.has_gold && self.gold == Some((x, y))
    }

    fn has_pit(&self, x: i32, y: i32) -> bool {
        self.pits.contains(&(x, y))
    }

    fn has_wumpus(&self, x: i32, y: i32) -> bool {
        self.wumpus == Some((x, y))
    }

    fn has_breeze(&self, x: i32, y: i32) -> bool {
        crate::state::NEIGHBOUR_OFFSETS
            .iter()
            .any(|(dx, dy)| self.pits.contains(&(x + dx, y + dy)))
    }

    fn has_stench(&self, x: i32, y: i32) -> bool {
        self.wumpus_alive
            && crate::state::NEIGHBOUR_OFFSETS
                .iter()
                .any(|(dx, dy)| self.wumpus == Some((x + dx, y + dy)))
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    fn is_unknown(&self, x: i32, y: i32) -> bool {
        !self.visited.contains(&(x, y))
    }

    fn has_arrow(&self) -> bool {
        self.arrows > 0
    }

    fn wumpus_alive(&self) -> bool {
        self.wumpus_alive
    }

    fn has_gold(&self) -> bool {
        self.has_gold
    }

    fn game_over(&self) -> bool {
        self.eaten || self.has_gold || self.steps >= self.max_steps
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn perform(&mut self, command: Command) {
        if self.game_over() {
            return;
        }
        self.steps += 1;
        self.score -= 1.0;

        match command {
            Command::Forward => {
                let (dx, dy) = self.facing.delta();
                let target = (self.pos.0 + dx, self.pos.1 + dy);
                if self.in_bounds(target.0, target.1) {
                    self.pos = target;
                    self.visited.insert(target);
                    if self.wumpus_alive && self.wumpus == Some(target) {
                        self.eaten = true;
                        self.score -= 1000.0;
                    }
                    let landed_in_pit = self.pits.contains(&target);
                    if landed_in_pit && !self.in_pit {
                        self.score -= 500.0;
                    }
                    self.in_pit = landed_in_pit;
                }
            }
            Command::Shoot => {
                if self.arrows > 0 {
                    self.arrows -= 1;
                    self.score -= 100.0;
                    if self.wumpus_alive && self.shot_connects() {
                        self.wumpus_alive = false;
                    }
                }
            }
            Command::TurnLeft => self.facing = self.facing.left(),
            Command::TurnRight => self.facing = self.facing.right(),
            Command::Grab => {
                if self.has_glitter(self.pos.0, self.pos.1) {
                    self.has_gold = true;
                    self.score += 1000.0;
                }
            }
            Command::Climb => self.in_pit = false,
        }
    }
}
