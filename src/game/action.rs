use crate::error::GameError;

/// Compass direction the snake can face
///
/// Screen coordinates: north decreases `y`, east increases `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Clockwise order starting east, used for relative turns
    const CLOCKWISE: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::North, Direction::South)
                | (Direction::South, Direction::North)
                | (Direction::East, Direction::West)
                | (Direction::West, Direction::East)
        )
    }

    /// Returns the unit delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    /// Direction after a clockwise quarter turn (E -> S -> W -> N)
    pub fn turned_right(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// Direction after a counter-clockwise quarter turn (E -> N -> W -> S)
    pub fn turned_left(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    fn clockwise_index(&self) -> usize {
        match self {
            Direction::East => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::North => 3,
        }
    }
}

/// Action relative to the snake's current facing
///
/// The agent emits these as one-hot vectors in the order
/// `[straight, right, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Straight,
    TurnRight,
    TurnLeft,
}

impl Action {
    /// Number of distinct actions
    pub const COUNT: usize = 3;

    /// All actions in one-hot index order
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Position of this action in the one-hot encoding
    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    /// Action at the given one-hot index, if in range
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// One-hot encoding `[straight, right, left]`
    pub fn one_hot(&self) -> [u8; 3] {
        let mut encoding = [0; 3];
        encoding[self.index()] = 1;
        encoding
    }

    /// Decode a one-hot vector
    ///
    /// Anything other than exactly three entries with a single `1` and two
    /// `0`s is rejected rather than coerced.
    pub fn from_one_hot(encoding: &[u8]) -> Result<Action, GameError> {
        let invalid = || GameError::InvalidAction {
            encoding: encoding.to_vec(),
        };

        if encoding.len() != Self::COUNT || encoding.iter().any(|&v| v > 1) {
            return Err(invalid());
        }

        let mut hot = encoding.iter().enumerate().filter(|&(_, &v)| v == 1);
        match (hot.next(), hot.next()) {
            (Some((index, _)), None) => Self::from_index(index).ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    /// Absolute direction this action leads to from `facing`
    pub fn apply(&self, facing: Direction) -> Direction {
        match self {
            Action::Straight => facing,
            Action::TurnRight => facing.turned_right(),
            Action::TurnLeft => facing.turned_left(),
        }
    }
}
