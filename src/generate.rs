use std::collections::VecDeque;
use std::io::Write;

use burn::tensor::{Tensor, backend::Backend};
use log::warn;
use rand::Rng;

use crate::data::one_hot_contexts;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::sample::sample;
use crate::vocab::Vocabulary;

/// Generates text one character at a time. Each step feeds the current window into the model,
/// samples the next character at the configured temperature and slides the window forward.
pub struct Generator<'a, B: Backend, R> {
    model: &'a Model<B>,
    vocab: &'a Vocabulary,
    window: VecDeque<u32>,
    window_len: usize,
    temperature: f64,
    rng: R,
    device: B::Device,
}

impl<'a, B: Backend, R: Rng> Generator<'a, B, R> {
    /// The seed is lowercased and only its last `window_len` characters are used as context.
    pub fn new(
        model: &'a Model<B>,
        vocab: &'a Vocabulary,
        seed: &str,
        window_len: usize,
        temperature: f64,
        rng: R,
        device: &B::Device,
    ) -> Result<Self> {
        if window_len == 0 {
            return Err(Error::InvalidWindow {
                len: window_len,
                step: 1,
            });
        }
        let seed: Vec<char> = seed.to_lowercase().chars().collect();
        if seed.is_empty() {
            return Err(Error::EmptySeed);
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(Error::InvalidTemperature(temperature));
        }
        let skip = seed.len().saturating_sub(window_len);
        if skip > 0 {
            warn!("seed text longer than {window_len} characters, using its tail only");
        }
        let window = vocab.encode_chars(&seed[skip..])?.into();
        Ok(Generator {
            model,
            vocab,
            window,
            window_len,
            temperature,
            rng,
            device: device.clone(),
        })
    }

    fn next_char(&mut self) -> Result<char> {
        let context: Vec<u32> = self.window.iter().copied().collect();
        let input = Tensor::<B, 3>::from_data(
            one_hot_contexts(&[context.as_slice()], self.vocab.len()),
            &self.device,
        );
        let probabilities: Vec<f32> = self
            .model
            .predict(input)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| Error::Tensor(format!("{e:?}")))?;
        let next = sample(&probabilities, self.temperature, &mut self.rng)? as u32;
        if self.window.len() == self.window_len {
            self.window.pop_front();
        }
        self.window.push_back(next);
        self.vocab.char_at(next)
    }

    /// Streams `length` generated characters into `out`, flushing after each one, and returns
    /// them.
    pub fn write_to(&mut self, out: &mut impl Write, length: usize) -> Result<String> {
        let mut text = String::with_capacity(length);
        for _ in 0..length {
            let c = self.next_char()?;
            write!(out, "{c}")
                .and_then(|()| out.flush())
                .map_err(|e| Error::io("<output>", e))?;
            text.push(c);
        }
        Ok(text)
    }
}

impl<B: Backend, R: Rng> Iterator for Generator<'_, B, R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_char())
    }
}

/// A random window of the corpus to start generating from
pub fn random_seed(chars: &[char], window_len: usize, rng: &mut impl Rng) -> Result<String> {
    if chars.len() <= window_len {
        return Err(Error::CorpusTooShort {
            len: chars.len(),
            window_len,
        });
    }
    let start = rng.random_range(0..chars.len() - window_len);
    Ok(chars[start..start + window_len].iter().collect())
}
