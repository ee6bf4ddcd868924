use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::{Action, Direction, GameState};

/// Number of features in an encoded state
pub const STATE_SIZE: usize = 11;

/// Binary feature vector describing the game from the snake's point of view
///
/// Layout:
/// - 0..3: danger straight / right / left
/// - 3..7: facing west / east / north / south
/// - 7..11: fruit west / east / north / south of the head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateVector(pub [u8; STATE_SIZE]);

impl StateVector {
    /// Raw 0/1 features
    pub fn as_array(&self) -> &[u8; STATE_SIZE] {
        &self.0
    }

    /// Features as network input
    pub fn to_floats(&self) -> [f32; STATE_SIZE] {
        self.0.map(f32::from)
    }

    /// Danger flags `[straight, right, left]`
    pub fn danger(&self) -> &[u8] {
        &self.0[0..3]
    }

    /// Facing one-hot `[west, east, north, south]`
    pub fn facing(&self) -> &[u8] {
        &self.0[3..7]
    }

    /// Fruit flags `[west, east, north, south]`
    pub fn fruit(&self) -> &[u8] {
        &self.0[7..11]
    }
}

/// Encode the game state into an 11-feature binary vector
///
/// Pure and deterministic. The danger flags reuse the game's own collision
/// predicate on the cell the corresponding action would move into.
pub fn encode_state(state: &GameState) -> StateVector {
    let facing = state.snake.direction;
    let head = state.snake.head();
    let fruit = state.food;

    let danger = |action: Action| state.is_collision(state.neighbor_of_head(action.apply(facing)));

    StateVector(
        [
            danger(Action::Straight),
            danger(Action::TurnRight),
            danger(Action::TurnLeft),
            facing == Direction::West,
            facing == Direction::East,
            facing == Direction::North,
            facing == Direction::South,
            fruit.x < head.x,
            fruit.x > head.x,
            fruit.y < head.y,
            fruit.y > head.y,
        ]
        .map(u8::from),
    )
}

/// Stack encoded states into a `[batch, 11]` tensor
pub fn states_to_tensor<B: Backend>(states: &[StateVector], device: &B::Device) -> Tensor<B, 2> {
    let data: Vec<f32> = states.iter().flat_map(|s| s.to_floats()).collect();
    let tensor_data = TensorData::new(data, [states.len(), STATE_SIZE]);

    Tensor::<B, 2>::from_data(tensor_data, device)
}
