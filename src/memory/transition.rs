use tch::Tensor;

/// One experience tuple. A `None` next state marks a terminal transition.
pub struct Transition {
    pub state: Tensor,
    pub action: i64,
    pub reward: f64,
    pub next_state: Option<Tensor>,
}

impl Transition {
    pub fn new(state: Tensor, action: i64, reward: f64, next_state: Option<Tensor>) -> Self {
        Transition {
            state,
            action,
            reward,
            next_state,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let terminal = Transition::new(Tensor::from_slice(&[1.0f32]), 0, 1.0, None);
        assert!(terminal.next_state.is_none());

        let ongoing = Transition::new(
            Tensor::from_slice(&[1.0f32]),
            2,
            -1.0,
            Some(Tensor::from_slice(&[2.0f32])),
        );
        assert!(ongoing.next_state.is_some());
        assert_eq!(ongoing.action, 2);
        assert_eq!(ongoing.reward, -1.0);
    }
}
