use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use burn::backend::Autodiff;
use burn_ndarray::NdArray;
use clap::{Parser, Subcommand};
use log::info;
use rand::{SeedableRng, rngs::StdRng};

use lstm_textgen::corpus::{Corpus, NIETZSCHE_URL, fetch};
use lstm_textgen::generate::Generator;
use lstm_textgen::plot::{LossHistory, render_loss_curve};
use lstm_textgen::train::{LOSS_FILE, TrainingConfig, load_artifacts, train};
use lstm_textgen::vocab::Vocabulary;

type TrainBackend = Autodiff<NdArray>;
type InferenceBackend = NdArray;

/// Character-level text generation with an LSTM
#[derive(Parser, Debug)]
#[command(name = "lstm-textgen", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on a corpus, sampling text after every epoch
    Train {
        /// Local text file to train on. Downloaded from --url when absent.
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Remote corpus, cached in --data-dir
        #[arg(long, default_value = NIETZSCHE_URL)]
        url: String,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Where weights, configuration, vocabulary and loss history are written
        #[arg(long, default_value = "artifacts")]
        artifact_dir: PathBuf,

        /// JSON training configuration. The vocabulary size is always taken from the corpus.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        epochs: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate text with a trained model
    Generate {
        /// Text to start from, only its last window is fed to the model
        #[arg(long)]
        seed_text: String,

        #[arg(long, default_value = "artifacts")]
        artifact_dir: PathBuf,

        #[arg(long, default_value_t = 0.5)]
        temperature: f64,

        #[arg(long, default_value_t = 400)]
        length: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print the loss curve of a finished training run
    Plot {
        #[arg(long, default_value = "artifacts")]
        artifact_dir: PathBuf,

        #[arg(long, default_value_t = 15)]
        height: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            corpus,
            url,
            data_dir,
            artifact_dir,
            config,
            epochs,
            seed,
        } => {
            let path = match corpus {
                Some(path) => path,
                None => fetch(&url, &data_dir).context("Error fetching corpus.")?,
            };
            let corpus = Corpus::load(&path).context("Error opening corpus.")?;
            let vocab = Vocabulary::from_chars(corpus.chars().iter().copied());
            info!("total chars: {}", vocab.len());

            let mut config = match config {
                Some(path) => TrainingConfig::load_file(&path)
                    .with_context(|| format!("Error loading config {}.", path.display()))?,
                None => TrainingConfig::for_vocab_size(vocab.len()),
            };
            config.model.vocab_size = vocab.len();
            if let Some(epochs) = epochs {
                config.epochs = epochs;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }

            let device = Default::default();
            let mut stdout = io::stdout().lock();
            train::<TrainBackend>(&config, &corpus, &vocab, &artifact_dir, &mut stdout, device)
                .context("Error training model.")?;
        }
        Command::Generate {
            seed_text,
            artifact_dir,
            temperature,
            length,
            seed,
        } => {
            let device = Default::default();
            let artifacts = load_artifacts::<InferenceBackend>(&artifact_dir, &device)
                .with_context(|| {
                    format!("Error loading artifacts from {}.", artifact_dir.display())
                })?;
            let rng = StdRng::seed_from_u64(seed);
            let mut generator = Generator::new(
                &artifacts.model,
                &artifacts.vocab,
                &seed_text,
                artifacts.config.window_len,
                temperature,
                rng,
                &device,
            )?;
            let mut stdout = io::stdout().lock();
            generator.write_to(&mut stdout, length)?;
            writeln!(stdout)?;
        }
        Command::Plot {
            artifact_dir,
            height,
        } => {
            let history = LossHistory::load(&artifact_dir.join(LOSS_FILE))
                .with_context(|| {
                    format!("Error loading loss history from {}.", artifact_dir.display())
                })?;
            print!("{}", render_loss_curve(&history.losses(), height));
        }
    }
    Ok(())
}
