use burn::{
    nn::{Linear, LinearConfig, Lstm, LstmConfig},
    prelude::*,
    tensor::{
        Tensor,
        activation::{relu, softmax},
        backend::Backend,
    },
};

/// A single LSTM layer reading one-hot characters, followed by dense layers mapping its final
/// hidden state to logits over the vocabulary.
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    lstm: Lstm<B>,
    hidden: Option<Linear<B>>,
    output: Linear<B>,
}

impl<B: Backend> Model<B> {
    /// Input `[batch, seq, vocab_size]` one-hot, output `[batch, vocab_size]` logits
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let (_, state) = self.lstm.forward(input, None);
        let x = state.hidden;
        let x = match &self.hidden {
            Some(hidden) => relu(hidden.forward(x)),
            None => x,
        };
        self.output.forward(x)
    }

    /// Probabilities of the next character, `[batch, vocab_size]`
    pub fn predict(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        softmax(self.forward(input), 1)
    }
}

#[derive(Config, Debug)]
pub struct ModelConfig {
    pub vocab_size: usize,
    #[config(default = 128)]
    pub d_hidden: usize,
    /// Width of an optional dense layer between the LSTM and the output layer
    pub d_dense: Option<usize>,
}

impl ModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let (hidden, d_output_input) = match self.d_dense {
            Some(d_dense) => (
                Some(LinearConfig::new(self.d_hidden, d_dense).init(device)),
                d_dense,
            ),
            None => (None, self.d_hidden),
        };
        Model {
            lstm: LstmConfig::new(self.vocab_size, self.d_hidden, true).init(device),
            hidden,
            output: LinearConfig::new(d_output_input, self.vocab_size).init(device),
        }
    }
}
