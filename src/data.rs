use burn::tensor::{Tensor, TensorData, backend::Backend};
use log::info;
use rand::{Rng, seq::SliceRandom};

use crate::error::{Error, Result};
use crate::window::sliding_windows;

/// The encoded corpus together with the start offsets of all training windows. Windows are kept
/// as offsets into the corpus and only one-hot encoded once a batch is requested, as the fully
/// encoded corpus would be `windows * window_len * vocab_size` floats.
pub struct TrainingSet {
    tokens: Vec<u32>,
    starts: Vec<usize>,
    window_len: usize,
    vocab_size: usize,
}

impl TrainingSet {
    pub fn new(
        tokens: Vec<u32>,
        window_len: usize,
        step: usize,
        vocab_size: usize,
    ) -> Result<Self> {
        let starts: Vec<usize> = sliding_windows(&tokens, window_len, step)?
            .map(|w| w.start)
            .collect();
        if starts.is_empty() {
            return Err(Error::CorpusTooShort {
                len: tokens.len(),
                window_len,
            });
        }
        info!("number of sequences: {}", starts.len());
        Ok(TrainingSet {
            tokens,
            starts,
            window_len,
            vocab_size,
        })
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Shuffled start offsets, chunked into batches of `batch_size`. The last batch holds the
    /// remainder and may be smaller.
    pub fn batches(&self, batch_size: usize, rng: &mut impl Rng) -> Vec<Vec<usize>> {
        let mut starts = self.starts.clone();
        starts.shuffle(rng);
        starts
            .chunks(batch_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// One-hot encodes the windows starting at `starts`.
    ///
    /// Returns contexts of shape `[batch, window_len, vocab_size]` and targets of shape
    /// `[batch, vocab_size]`.
    pub fn encode_batch<B: Backend>(
        &self,
        starts: &[usize],
        device: &B::Device,
    ) -> (Tensor<B, 3>, Tensor<B, 2>) {
        let contexts: Vec<&[u32]> = starts
            .iter()
            .map(|&s| &self.tokens[s..s + self.window_len])
            .collect();
        let targets: Vec<u32> = starts
            .iter()
            .map(|&s| self.tokens[s + self.window_len])
            .collect();
        let x = Tensor::from_data(one_hot_contexts(&contexts, self.vocab_size), device);
        let y = Tensor::from_data(one_hot_targets(&targets, self.vocab_size), device);
        (x, y)
    }
}

/// Encodes sequences of equal length into a `[sequences, length, vocab_size]` one-hot tensor.
pub fn one_hot_contexts(sequences: &[&[u32]], vocab_size: usize) -> TensorData {
    let len = sequences.first().map_or(0, |s| s.len());
    let mut values = vec![0.0f32; sequences.len() * len * vocab_size];
    for (i, sequence) in sequences.iter().enumerate() {
        debug_assert_eq!(len, sequence.len());
        for (t, &token) in sequence.iter().enumerate() {
            values[(i * len + t) * vocab_size + token as usize] = 1.0;
        }
    }
    TensorData::new(values, [sequences.len(), len, vocab_size])
}

/// Encodes single tokens into a `[tokens, vocab_size]` one-hot tensor.
pub fn one_hot_targets(tokens: &[u32], vocab_size: usize) -> TensorData {
    let mut values = vec![0.0f32; tokens.len() * vocab_size];
    for (i, &token) in tokens.iter().enumerate() {
        values[i * vocab_size + token as usize] = 1.0;
    }
    TensorData::new(values, [tokens.len(), vocab_size])
}
