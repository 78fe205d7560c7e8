// Runs in its own process: burn's backend seed is global and would be raced by parallel unit tests.
use burn::{backend::Autodiff, optim::RmsPropConfig};
use burn_ndarray::{NdArray, NdArrayDevice};
use lstm_textgen::corpus::Corpus;
use lstm_textgen::model::ModelConfig;
use lstm_textgen::train::{TrainingConfig, train};
use lstm_textgen::vocab::Vocabulary;

type B = Autodiff<NdArray<f32>>;

fn run(config: &TrainingConfig, corpus: &Corpus, vocab: &Vocabulary) -> Vec<f32> {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let trained = train::<B>(
        config,
        corpus,
        vocab,
        dir.path(),
        &mut out,
        NdArrayDevice::default(),
    )
    .unwrap();
    trained.history.losses()
}

#[test]
fn same_seed_reproduces_training_run() {
    let corpus = Corpus::from_text(&"To be or not to be. ".repeat(10)).unwrap();
    let vocab = Vocabulary::from_chars(corpus.chars().iter().copied());
    let model = ModelConfig::new(vocab.len()).with_d_hidden(16);
    let config = TrainingConfig::new(model, RmsPropConfig::new())
        .with_window_len(6)
        .with_step(2)
        .with_batch_size(16)
        .with_epochs(2)
        .with_temperatures(vec![1.0])
        .with_generate_len(10)
        .with_seed(99);

    let first_losses = run(&config, &corpus, &vocab);
    let second_losses = run(&config, &corpus, &vocab);

    assert_eq!(first_losses.len(), second_losses.len());
    for (a, b) in first_losses.iter().zip(&second_losses) {
        assert!((a - b).abs() < 1e-5, "{first_losses:?} vs {second_losses:?}");
    }
}
