pub const NUM_ACTIONS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    pub fn from_action(action: i64) -> Self {
        match action {
            1 => Direction::Down,
            2 => Direction::Right,
            3 => Direction::Left,
            _ => Direction::Up,
        }
    }
}

pub trait BaseEnv: Send {
    /// Flattened grid of cell values, row-major.
    fn state(&self) -> &[u32];
    /// Returns false when no tile moved or the game is over.
    fn shift(&mut self, direction: Direction) -> bool;
    fn current_score(&self) -> u32;
    fn is_won(&self) -> bool;
    fn is_lost(&self) -> bool;
    fn reset(&mut self);

    fn encoded_state(&self) -> Vec<f32> {
        self.state().iter().map(|&v| v as f32).collect()
    }
}
