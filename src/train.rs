use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use burn::{
    LearningRate,
    module::{AutodiffModule, Module},
    nn::loss::CrossEntropyLossConfig,
    optim::{GradientsParams, Optimizer, RmsPropConfig},
    prelude::*,
    record::CompactRecorder,
    tensor::{ElementConversion, backend::AutodiffBackend},
};
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::corpus::Corpus;
use crate::data::TrainingSet;
use crate::error::{self, Error};
use crate::generate::{Generator, random_seed};
use crate::model::{Model, ModelConfig};
use crate::plot::{LossHistory, render_loss_curve};
use crate::vocab::Vocabulary;

pub const MODEL_FILE: &str = "model";
pub const CONFIG_FILE: &str = "config.json";
pub const VOCAB_FILE: &str = "vocab.json";
pub const LOSS_FILE: &str = "loss.json";

#[derive(Config)]
pub struct TrainingConfig {
    pub model: ModelConfig,
    pub optimizer: RmsPropConfig,
    /// Number of characters the model sees before predicting the next one
    #[config(default = 40)]
    pub window_len: usize,
    /// Distance between the starts of two consecutive training windows
    #[config(default = 3)]
    pub step: usize,
    #[config(default = 128)]
    pub batch_size: usize,
    #[config(default = 60)]
    pub epochs: usize,
    #[config(default = 0.01)]
    pub learning_rate: f64,
    #[config(default = 1337)]
    pub seed: u64,
    /// Temperatures at which text is sampled after every epoch
    #[config(default = "vec![0.2, 0.5, 1.0, 1.2]")]
    pub temperatures: Vec<f64>,
    /// Characters generated per temperature after every epoch
    #[config(default = 400)]
    pub generate_len: usize,
}

impl TrainingConfig {
    pub fn for_vocab_size(vocab_size: usize) -> Self {
        TrainingConfig::new(ModelConfig::new(vocab_size), RmsPropConfig::new())
    }

    pub fn load_file(path: &Path) -> error::Result<Self> {
        TrainingConfig::load(path).map_err(|e| Error::Config(format!("{e:?}")))
    }
}

/// Everything a finished training run produced
pub struct Trained<B: Backend> {
    pub model: Model<B>,
    pub history: LossHistory,
}

/// Trains a model on `corpus`. After every epoch text is sampled at each configured temperature
/// and streamed into `out`. Weights, configuration, vocabulary and loss history are written into
/// `artifact_dir`.
pub fn train<B: AutodiffBackend>(
    config: &TrainingConfig,
    corpus: &Corpus,
    vocab: &Vocabulary,
    artifact_dir: &Path,
    out: &mut impl Write,
    device: B::Device,
) -> error::Result<Trained<B::InnerBackend>> {
    let tokens = vocab.encode_chars(corpus.chars())?;
    let data = TrainingSet::new(tokens, config.window_len, config.step, vocab.len())?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    B::seed(config.seed);

    let mut model: Model<B> = config.model.init(&device);
    info!("number of parameters: {}", model.num_params());
    let mut optimizer = config.optimizer.init::<B, Model<B>>();
    let lr: LearningRate = config.learning_rate;
    let loss_fn = CrossEntropyLossConfig::new().init(&device);
    let mut history = LossHistory::default();

    for epoch in 1..=config.epochs {
        let batches = data.batches(config.batch_size, &mut rng);
        let mut total_loss = 0.0;
        for (i, batch) in batches.iter().enumerate() {
            let (x, y) = data.encode_batch::<B>(batch, &device);
            let logits = model.forward(x);
            // One-hot rows back to class ids, [batch, 1] -> [batch]
            let targets = y.argmax(1).squeeze::<1>(1);
            let loss = loss_fn.forward(logits, targets);
            let batch_loss: f32 = loss.clone().into_scalar().elem();
            debug!("epoch {epoch}, batch {i}, loss {batch_loss}");
            total_loss += batch_loss * batch.len() as f32;
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optimizer.step(lr, model, grads);
        }
        let loss = total_loss / data.len() as f32;
        info!("epoch: {epoch}/{}, loss: {loss}", config.epochs);
        history.push(epoch, loss);

        sample_epoch(config, corpus, vocab, &model.valid(), &device, &mut rng, out)?;
    }

    let model = model.valid();
    save_artifacts(config, vocab, &model, &history, artifact_dir)?;
    write!(out, "\n{}", render_loss_curve(&history.losses(), 10))
        .map_err(|e| Error::io("<output>", e))?;
    Ok(Trained { model, history })
}

/// Samples text from a random corpus window at every configured temperature
fn sample_epoch<B: Backend>(
    config: &TrainingConfig,
    corpus: &Corpus,
    vocab: &Vocabulary,
    model: &Model<B>,
    device: &B::Device,
    rng: &mut StdRng,
    out: &mut impl Write,
) -> error::Result<()> {
    let seed = random_seed(corpus.chars(), config.window_len, rng)?;
    for &temperature in &config.temperatures {
        writeln!(out, "----- temperature: {temperature}")
            .and_then(|()| writeln!(out, "----- generating with seed: {seed:?}"))
            .map_err(|e| Error::io("<output>", e))?;
        let mut generator = Generator::new(
            model,
            vocab,
            &seed,
            config.window_len,
            temperature,
            &mut *rng,
            device,
        )?;
        generator.write_to(out, config.generate_len)?;
        writeln!(out).map_err(|e| Error::io("<output>", e))?;
    }
    Ok(())
}

fn save_artifacts<B: Backend>(
    config: &TrainingConfig,
    vocab: &Vocabulary,
    model: &Model<B>,
    history: &LossHistory,
    artifact_dir: &Path,
) -> error::Result<()> {
    fs::create_dir_all(artifact_dir).map_err(|e| Error::io(artifact_dir, e))?;
    let config_path = artifact_dir.join(CONFIG_FILE);
    config
        .save(&config_path)
        .map_err(|e| Error::io(&config_path, e))?;
    vocab.save(&artifact_dir.join(VOCAB_FILE))?;
    history.save(&artifact_dir.join(LOSS_FILE))?;
    let model_path = artifact_dir.join(MODEL_FILE);
    model
        .clone()
        .save_file(model_path.clone(), &CompactRecorder::new())
        .map_err(|e| Error::Record(format!("{e:?}")))?;
    info!("saved model to {}", model_path.display());
    Ok(())
}

/// A model restored from the artifact directory of a previous training run
pub struct Artifacts<B: Backend> {
    pub config: TrainingConfig,
    pub vocab: Vocabulary,
    pub model: Model<B>,
}

pub fn load_artifacts<B: Backend>(
    artifact_dir: &Path,
    device: &B::Device,
) -> error::Result<Artifacts<B>> {
    let config = TrainingConfig::load_file(&artifact_dir.join(CONFIG_FILE))?;
    let vocab = Vocabulary::load(&artifact_dir.join(VOCAB_FILE))?;
    let model_path: PathBuf = artifact_dir.join(MODEL_FILE);
    let model = config
        .model
        .init::<B>(device)
        .load_file(model_path.clone(), &CompactRecorder::new(), device)
        .map_err(|e| Error::Record(format!("{e:?}")))?;
    info!("loaded model from {}", model_path.display());
    Ok(Artifacts {
        config,
        vocab,
        model,
    })
}
