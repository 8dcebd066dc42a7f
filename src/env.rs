use strum::{FromRepr, VariantArray};

/// Number of learnable actions, and therefore the length of every action-value vector
pub const ACTION_COUNT: usize = 4;

/// The four headings the agent can face
///
/// `left`/`right` rotate counterclockwise/clockwise, matching the turn actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromRepr)]
#[repr(u8)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Direction {
    /// Unit offset of one forward move along this heading
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::North => (0, 1),
            Self::West => (-1, 0),
            Self::South => (0, -1),
        }
    }

    pub fn left(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Self::East => Self::South,
            Self::North => Self::East,
            Self::West => Self::North,
            Self::South => Self::West,
        }
    }
}

/// An action the agent can learn a value for
///
/// The discriminant doubles as the action's index into a value vector
/// and fixes the serialization order of the per-action values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, VariantArray)]
#[repr(u8)]
pub enum Action {
    Forward = 0,
    Shoot = 1,
    TurnLeft = 2,
    TurnRight = 3,
}

/// A command the world executor accepts
///
/// Every [`Action`] is a command; `Grab` and `Climb` are reflexes issued by the
/// agent outside of the learned policy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Forward,
    Shoot,
    TurnLeft,
    TurnRight,
    Grab,
    Climb,
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::Forward => Self::Forward,
            Action::Shoot => Self::Shoot,
            Action::TurnLeft => Self::TurnLeft,
            Action::TurnRight => Self::TurnRight,
        }
    }
}

/// A lightweight capture of the observable agent situation, taken before an
/// action so the reward rules can compare it against the world afterwards
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Snapshot {
    pub position: (i32, i32),
    pub facing: Direction,
    pub has_arrow: bool,
    pub wumpus_alive: bool,
    /// Whether the current cell is a pit
    pub in_pit: bool,
    /// Whether the cell straight ahead is in bounds but not yet revealed
    pub ahead_unseen: bool,
}

/// The query/command surface the agent requires from a Wumpus World simulator
///
/// Per-coordinate predicates report ground truth; the agent only consults them
/// for cells the world reports as already revealed (`is_unknown` is false).
/// `game_over` must eventually become true for every episode, either through a
/// terminal event or the world's own step budget.
pub trait World {
    fn position(&self) -> (i32, i32);
    fn facing(&self) -> Direction;

    fn has_glitter(&self, x: i32, y: i32) -> bool;
    fn has_pit(&self, x: i32, y: i32) -> bool;
    fn has_wumpus(&self, x: i32, y: i32) -> bool;
    fn has_breeze(&self, x: i32, y: i32) -> bool;
    fn has_stench(&self, x: i32, y: i32) -> bool;
    fn in_bounds(&self, x: i32, y: i32) -> bool;
    fn is_unknown(&self, x: i32, y: i32) -> bool;

    fn has_arrow(&self) -> bool;
    fn wumpus_alive(&self) -> bool;
    fn has_gold(&self) -> bool;
    fn game_over(&self) -> bool;
    fn score(&self) -> f64;

    /// Execute a single command, advancing the world one step
    fn perform(&mut self, command: Command);

    /// Capture the pre-action situation used by the reward rules
    fn snapshot(&self) -> Snapshot {
        let (x, y) = self.position();
        let facing = self.facing();
        let (dx, dy) = facing.delta();
        Snapshot {
            position: (x, y),
            facing,
            has_arrow: self.has_arrow(),
            wumpus_alive: self.wumpus_alive(),
            in_pit: self.has_pit(x, y),
            ahead_unseen: self.in_bounds(x + dx, y + dy) && self.is_unknown(x + dx, y + dy),
        }
    }
}
