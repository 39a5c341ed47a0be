use tch::{Kind, Tensor};

/// Categorical action distribution over raw Q-values: elementwise sigmoid,
/// then divide by the sum. Not a softmax; previously trained weights were
/// selected through this exact transform.
pub struct SigmoidCategorical {
    probs: Tensor,
}

impl SigmoidCategorical {
    pub fn new(q_values: &Tensor) -> Self {
        let squashed = q_values.view([1, -1]).sigmoid();
        let probs = &squashed / squashed.sum(Kind::Float);
        SigmoidCategorical { probs }
    }

    pub fn sample(&self) -> i64 {
        self.probs.multinomial(1, true).int64_value(&[0, 0])
    }

    pub fn probs(&self) -> Vec<f64> {
        let n = self.probs.size()[1];
        (0..n).map(|i| self.probs.double_value(&[0, i])).collect()
    }
}
