use crate::env::{Direction, World};

/// Offsets of the four cardinal neighbours, in encoding order
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Offsets of the eight cells at taxicab distance 2, in encoding order
pub const RING2_OFFSETS: [(i32, i32); 8] = [
    (2, 0),
    (1, 1),
    (0, 2),
    (-1, 1),
    (-2, 0),
    (-1, -1),
    (0, -2),
    (1, -1),
];

/// Percept bitmask for a single cell
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Percepts(u8);

impl Percepts {
    const BREEZE: u8 = 1;
    const STENCH: u8 = 2;

    pub fn new(breeze: bool, stench: bool) -> Self {
        Self((breeze as u8) * Self::BREEZE | (stench as u8) * Self::STENCH)
    }

    pub fn breeze(self) -> bool {
        self.0 & Self::BREEZE != 0
    }

    pub fn stench(self) -> bool {
        self.0 & Self::STENCH != 0
    }

    fn bits(self) -> u8 {
        self.0
    }

    fn from_bits(bits: u8) -> Option<Self> {
        (bits <= Self::BREEZE | Self::STENCH).then_some(Self(bits))
    }
}

/// Hazard bitmask for a single cell
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Hazards(u8);

impl Hazards {
    const PIT: u8 = 1;
    const WUMPUS: u8 = 2;

    pub fn new(pit: bool, wumpus: bool) -> Self {
        Self((pit as u8) * Self::PIT | (wumpus as u8) * Self::WUMPUS)
    }

    pub fn pit(self) -> bool {
        self.0 & Self::PIT != 0
    }

    pub fn wumpus(self) -> bool {
        self.0 & Self::WUMPUS != 0
    }

    fn bits(self) -> u8 {
        self.0
    }

    fn from_bits(bits: u8) -> Option<Self> {
        (bits <= Self::PIT | Self::WUMPUS).then_some(Self(bits))
    }
}

/// Classification of a nearby cell
///
/// A cell's payload (its hazard or percept bits) is only available once the
/// cell has been revealed; unseen and out-of-bounds cells carry nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Cell<B> {
    Known(B),
    Unseen,
    Wall,
}

const TAG_KNOWN: u8 = 0;
const TAG_UNSEEN: u8 = 1;
const TAG_WALL: u8 = 2;

impl<B: Copy> Cell<B> {
    fn encode(self, bits: impl Fn(B) -> u8) -> (u8, u8) {
        match self {
            Self::Known(b) => (TAG_KNOWN, bits(b)),
            Self::Unseen => (TAG_UNSEEN, 0),
            Self::Wall => (TAG_WALL, 0),
        }
    }

    fn decode(tag: u8, payload: u8, from_bits: impl Fn(u8) -> Option<B>) -> Option<Self> {
        match (tag, payload) {
            (TAG_KNOWN, _) => from_bits(payload).map(Self::Known),
            (TAG_UNSEEN, 0) => Some(Self::Unseen),
            (TAG_WALL, 0) => Some(Self::Wall),
            _ => None,
        }
    }
}

/// Everything the agent currently knows that is relevant to decision-making,
/// discretized into a table key
///
/// Structural equality and hashing are derived over every field, so two
/// identical observations always land on the same table entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct State {
    pub facing: Direction,
    pub percepts: Percepts,
    pub hazards: Hazards,
    pub wumpus_alive: bool,
    pub has_arrow: bool,
    pub neighbours: [Cell<Hazards>; 4],
    pub ring2: [Cell<Percepts>; 8],
}

impl State {
    /// Width of one serialized state, in bytes
    pub(crate) const ENCODED_LEN: usize = 5 + 2 * 4 + 2 * 8;

    /// Discretize the currently observable situation at the agent's position
    ///
    /// Pure over the world's query surface: hazard and percept payloads are
    /// read only for cells the world reports as revealed, so the encoding
    /// never leaks ground truth the agent has not legitimately observed.
    pub fn observe<W: World + ?Sized>(world: &W) -> Self {
        let (x, y) = world.position();

        let neighbours = NEIGHBOUR_OFFSETS.map(|(dx, dy)| {
            classify(world, x + dx, y + dy, |w, cx, cy| {
                Hazards::new(w.has_pit(cx, cy), w.has_wumpus(cx, cy))
            })
        });
        let ring2 = RING2_OFFSETS.map(|(dx, dy)| {
            classify(world, x + dx, y + dy, |w, cx, cy| {
                Percepts::new(w.has_breeze(cx, cy), w.has_stench(cx, cy))
            })
        });

        Self {
            facing: world.facing(),
            percepts: Percepts::new(world.has_breeze(x, y), world.has_stench(x, y)),
            hazards: Hazards::new(world.has_pit(x, y), world.has_wumpus(x, y)),
            wumpus_alive: world.wumpus_alive(),
            has_arrow: world.has_arrow(),
            neighbours,
            ring2,
        }
    }

    /// Serialize into the fixed-width byte layout used by the table file
    pub(crate) fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        let mut buf = [0; Self::ENCODED_LEN];
        buf[0] = self.facing as u8;
        buf[1] = self.percepts.bits();
        buf[2] = self.hazards.bits();
        buf[3] = self.wumpus_alive as u8;
        buf[4] = self.has_arrow as u8;
        for (i, cell) in self.neighbours.into_iter().enumerate() {
            (buf[5 + 2 * i], buf[6 + 2 * i]) = cell.encode(Hazards::bits);
        }
        for (i, cell) in self.ring2.into_iter().enumerate() {
            (buf[13 + 2 * i], buf[14 + 2 * i]) = cell.encode(Percepts::bits);
        }
        buf
    }

    /// Deserialize from the fixed-width byte layout; `None` marks a malformed record
    pub(crate) fn from_bytes(buf: &[u8; Self::ENCODED_LEN]) -> Option<Self> {
        let mut neighbours = [Cell::Unseen; 4];
        for (i, cell) in neighbours.iter_mut().enumerate() {
            *cell = Cell::decode(buf[5 + 2 * i], buf[6 + 2 * i], Hazards::from_bits)?;
        }
        let mut ring2 = [Cell::Unseen; 8];
        for (i, cell) in ring2.iter_mut().enumerate() {
            *cell = Cell::decode(buf[13 + 2 * i], buf[14 + 2 * i], Percepts::from_bits)?;
        }
        Some(Self {
            facing: Direction::from_repr(buf[0])?,
            percepts: Percepts::from_bits(buf[1])?,
            hazards: Hazards::from_bits(buf[2])?,
            wumpus_alive: decode_bool(buf[3])?,
            has_arrow: decode_bool(buf[4])?,
            neighbours,
            ring2,
        })
    }
}

fn classify<W, B, F>(world: &W, x: i32, y: i32, payload: F) -> Cell<B>
where
    W: World + ?Sized,
    F: Fn(&W, i32, i32) -> B,
{
    if !world.in_bounds(x, y) {
        Cell::Wall
    } else if world.is_unknown(x, y) {
        Cell::Unseen
    } else {
        Cell::Known(payload(world, x, y))
    }
}

fn decode_bool(byte: u8) -> Option<bool> {
    match byte {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// A structurally varied state for table and persistence tests
#[cfg(test)]
pub(crate) fn sample_state(seed: u8) -> State {
    // Low seed bits map to distinct fields so distinct seeds below 16 always
    // produce structurally distinct states.
    State {
        facing: Direction::from_repr(seed % 4).unwrap(),
        percepts: Percepts::new(seed & 1 != 0, seed & 2 != 0),
        hazards: Hazards::new(seed & 4 != 0, seed & 8 != 0),
        wumpus_alive: seed & 4 != 0,
        has_arrow: seed & 8 != 0,
        neighbours: [
            Cell::Known(Hazards::new(seed & 1 != 0, false)),
            Cell::Unseen,
            Cell::Wall,
            Cell::Known(Hazards::default()),
        ],
        ring2: [
            Cell::Unseen,
            Cell::Wall,
            Cell::Known(Percepts::new(true, seed & 2 != 0)),
            Cell::Unseen,
            Cell::Known(Percepts::default()),
            Cell::Wall,
            Cell::Wall,
            Cell::Unseen,
        ],
    }
}
