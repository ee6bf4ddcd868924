use super::action::Direction;

/// A pixel position on the game field, aligned to the cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell of `cell_size` pixels in a direction
    pub fn moved_in_direction(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with its segments trailing behind the head
    pub fn new(head: Position, direction: Direction, length: usize, cell_size: i32) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx * cell_size, -dy * cell_size);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Prepend a new head segment
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCause {
    /// Snake left the field
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Snake went too long without eating
    Stalled,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub score: u32,
    /// Frames elapsed in the current episode
    pub frame: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            snake,
            food,
            width,
            height,
            cell_size,
            score: 0,
            frame: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the field
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Collision predicate shared by the step rule and the state encoder
    ///
    /// Walls, or any body segment other than the head.
    pub fn collision_at(&self, pos: Position) -> Option<TerminalCause> {
        if !self.is_in_bounds(pos) {
            return Some(TerminalCause::Wall);
        }

        if self.snake.collides_with_body(pos) {
            return Some(TerminalCause::SelfCollision);
        }

        None
    }

    /// Boolean form of [`GameState::collision_at`]
    pub fn is_collision(&self, pos: Position) -> bool {
        self.collision_at(pos).is_some()
    }

    /// Cell adjacent to the head in the given direction
    pub fn neighbor_of_head(&self, direction: Direction) -> Position {
        self.snake
            .head()
            .moved_in_direction(direction, self.cell_size as i32)
    }
}
