use super::codec::{self, WeightMatrices};
use super::error::EngineError;
use super::shape::NetworkShape;

/// Borrowed view of one step's activations. Invalidated by the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activations<'a> {
    pub hidden: &'a [f64],
    pub output: &'a [f64],
}

/// Elman network: input (+bias) -> hidden (fed back through the context) -> output.
#[derive(Clone, Debug)]
pub struct RecurrentCell {
    shape: NetworkShape,
    weights: WeightMatrices,
    input: Vec<f64>,
    hidden: Vec<f64>,
    context: Vec<f64>,
    output: Vec<f64>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn dot(weights: &[f64], values: &[f64]) -> f64 {
    debug_assert_eq!(weights.len(), values.len());
    weights.iter().zip(values).fold(0., |acc, (w, v)| acc + w * v)
}

impl RecurrentCell {
    /// Zero weights and zero state.
    pub fn configure(shape: NetworkShape) -> Result<RecurrentCell, EngineError> {
        let shape = NetworkShape::new(shape.input_size(), shape.hidden_size(), shape.output_size())?;
        Ok(RecurrentCell {
            weights: WeightMatrices::zeros(&shape),
            input: vec![0.; shape.input_width()],
            hidden: vec![0.; shape.hidden_size()],
            context: vec![0.; shape.hidden_size()],
            output: vec![0.; shape.output_size()],
            shape,
        })
    }

    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    pub fn weights(&self) -> &WeightMatrices {
        &self.weights
    }

    /// Fails without touching the current weights when `genes` has the wrong length.
    pub fn load_parameters(&mut self, genes: &[f64]) -> Result<(), EngineError> {
        codec::decode_into(&self.shape, genes, &mut self.weights)
    }

    /// Clears the context. Weights are kept.
    pub fn reset(&mut self) {
        self.context.fill(0.);
    }

    /// `input[0]` is expected to be the bias (1.0).
    pub fn step(&mut self, input: &[f64]) -> Result<Activations<'_>, EngineError> {
        if input.len() != self.shape.input_width() {
            return Err(EngineError::InputWidthMismatch { expected: self.shape.input_width(), actual: input.len() });
        }
        self.input.copy_from_slice(input);

        for i in 0..self.shape.hidden_size() {
            let sum = dot(self.weights.input_hidden.row(i), &self.input)
                + dot(self.weights.hidden_hidden.row(i), &self.context);
            self.hidden[i] = sum.tanh();
        }

        for k in 0..self.shape.output_size() {
            self.output[k] = sigmoid(dot(self.weights.hidden_output.row(k), &self.hidden));
        }

        self.context.copy_from_slice(&self.hidden);
        Ok(self.activations())
    }

    /// Runs a step for inspection, then puts the previous context back.
    pub fn probe(&mut self, input: &[f64]) -> Result<Activations<'_>, EngineError> {
        let saved = self.context.clone();
        self.step(input)?;
        self.context = saved;
        Ok(self.activations())
    }

    pub fn activations(&self) -> Activations<'_> {
        Activations { hidden: &self.hidden, output: &self.output }
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    pub fn hidden(&self) -> &[f64] {
        &self.hidden
    }

    pub fn context(&self) -> &[f64] {
        &self.context
    }

    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Index of the strongest output; the first one wins a tie.
    pub fn predicted_class(&self) -> usize {
        self.output
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_value), (k, &value)| {
                if value > best_value {
                    (k, value)
                } else {
                    (best, best_value)
                }
            })
            .0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elman::codec::{gene_index, WeightBlock};
    use assert_approx_eq::assert_approx_eq;

    fn shape_1_1_1() -> NetworkShape {
        NetworkShape::new(1, 1, 1).unwrap()
    }

    #[test]
    fn configure_allocates_zeroed_state() {
        let shape = NetworkShape::new(3, 8, 3).unwrap();
        let cell = RecurrentCell::configure(shape).unwrap();
        assert_eq!(cell.input().len(), 4);
        assert_eq!(cell.hidden().len(), 8);
        assert_eq!(cell.context(), &[0.; 8]);
        assert_eq!(cell.output().len(), 3);
        assert_eq!(cell.weights(), &WeightMatrices::zeros(&shape));
    }

    #[test]
    fn zero_weights_give_half_outputs() {
        let mut cell = RecurrentCell::configure(NetworkShape::new(3, 2, 3).unwrap()).unwrap();
        let activations = cell.step(&[1., 0., 1., 0.]).unwrap();
        assert_eq!(activations.hidden, &[0., 0.]);
        for &o in activations.output {
            assert_approx_eq!(o, 0.5);
        }
    }

    #[test]
    fn single_neuron_recurrence() {
        // genes: [bias->h, x->h, h->h, h->o]
        let mut cell = RecurrentCell::configure(shape_1_1_1()).unwrap();
        cell.load_parameters(&[0.5, -0.3, 0.8, 2.0]).unwrap();

        let h1 = (0.5f64 - 0.3).tanh();
        let a = cell.step(&[1., 1.]).unwrap();
        assert_approx_eq!(a.hidden[0], h1);
        assert_approx_eq!(a.output[0], 1. / (1. + (-2. * h1).exp()));

        let h2 = (0.5 + 0.8 * h1).tanh();
        let a = cell.step(&[1., 0.]).unwrap();
        assert_approx_eq!(a.hidden[0], h2);
        assert_approx_eq!(a.output[0], 1. / (1. + (-2. * h2).exp()));
    }

    #[test]
    fn self_feedback_weights_are_used() {
        let shape = NetworkShape::new(1, 2, 1).unwrap();
        let mut genes = vec![0.; shape.parameter_count()];
        genes[gene_index(&shape, WeightBlock::InputHidden, 0, 0)] = 1.;
        genes[gene_index(&shape, WeightBlock::HiddenHidden, 1, 0)] = 1.;

        let mut cell = RecurrentCell::configure(shape).unwrap();
        cell.load_parameters(&genes).unwrap();
        cell.step(&[1., 0.]).unwrap();
        assert_approx_eq!(cell.hidden()[0], 1f64.tanh());
        assert_eq!(cell.hidden()[1], 0.);

        cell.step(&[1., 0.]).unwrap();
        assert_approx_eq!(cell.hidden()[1], 1f64.tanh().tanh());
    }

    #[test]
    fn context_follows_hidden() {
        let shape = NetworkShape::new(3, 4, 3).unwrap();
        let genes: Vec<f64> = (0..shape.parameter_count()).map(|i| ((i % 7) as f64 - 3.) / 5.).collect();
        let mut cell = RecurrentCell::configure(shape).unwrap();
        cell.load_parameters(&genes).unwrap();

        cell.step(&[1., 0., 1., 0.]).unwrap();
        assert_eq!(cell.context(), cell.hidden());
        cell.step(&[1., 1., 0., 0.]).unwrap();
        assert_eq!(cell.context(), cell.hidden());

        cell.reset();
        assert!(cell.context().iter().all(|&c| c == 0.));
        assert_eq!(cell.weights().hidden_hidden.as_slice().len(), 16);
        assert_ne!(cell.weights(), &WeightMatrices::zeros(&shape));
    }

    #[test]
    fn reset_replays_identically() {
        let mut cell = RecurrentCell::configure(shape_1_1_1()).unwrap();
        cell.load_parameters(&[0.2, 0.7, -0.9, 1.5]).unwrap();
        let first = cell.step(&[1., 1.]).unwrap().output.to_vec();
        cell.step(&[1., 1.]).unwrap();
        cell.reset();
        let again = cell.step(&[1., 1.]).unwrap().output.to_vec();
        assert_eq!(first, again);
    }

    #[test]
    fn probe_keeps_context() {
        let mut cell = RecurrentCell::configure(shape_1_1_1()).unwrap();
        cell.load_parameters(&[0.2, 0.7, -0.9, 1.5]).unwrap();
        cell.step(&[1., 1.]).unwrap();
        let before = cell.context().to_vec();
        let probed = cell.probe(&[1., 0.]).unwrap().hidden.to_vec();
        assert_eq!(cell.context(), &before[..]);
        assert_approx_eq!(probed[0], (0.2 - 0.9 * before[0]).tanh());
    }

    #[test]
    fn wrong_parameter_count() {
        let mut cell = RecurrentCell::configure(shape_1_1_1()).unwrap();
        cell.load_parameters(&[1., 1., 1., 1.]).unwrap();
        let res = cell.load_parameters(&[0.; 3]);
        assert_eq!(res, Err(EngineError::ParameterCountMismatch { expected: 4, actual: 3 }));
        assert_eq!(codec::encode(cell.weights()), vec![1.; 4]);
    }

    #[test]
    fn wrong_input_width() {
        let mut cell = RecurrentCell::configure(shape_1_1_1()).unwrap();
        assert_eq!(cell.step(&[1.]), Err(EngineError::InputWidthMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn predicted_class_prefers_first_maximum() {
        let shape = NetworkShape::new(1, 1, 3).unwrap();
        let mut cell = RecurrentCell::configure(shape).unwrap();
        cell.step(&[1., 0.]).unwrap();
        assert_eq!(cell.predicted_class(), 0);

        // h > 0, outputs 1 and 2 tie above output 0
        cell.load_parameters(&[1., 0., 0., 0.2, 0.9, 0.9]).unwrap();
        cell.step(&[1., 0.]).unwrap();
        assert_eq!(cell.predicted_class(), 1);
    }
}
