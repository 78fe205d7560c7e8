//! Character-level text generation with an LSTM.
//!
//! A corpus is split into overlapping windows of characters, each paired with the character that
//! follows it. A single LSTM layer learns to predict that character, and text is generated by
//! repeatedly sampling the prediction at a chosen temperature.

pub mod corpus;
pub mod data;
pub mod error;
pub mod generate;
pub mod model;
pub mod plot;
pub mod sample;
pub mod train;
pub mod vocab;
pub mod window;

pub use error::{Error, Result};
