use std::{env, path::PathBuf};

use gradlearn::machine_learning::{
    dataset::{Blob, Dataset},
    linear_classifier::{
        logistic_regression::LogisticRegressor, training_parameters::RegressorConfig,
    },
    regression_error::Result,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!("Usage: {} [seed] [loss_curves.json]", args[0]);
        std::process::exit(1);
    }
    let seed = match args.get(1).map(|seed| seed.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(_)) => {
            eprintln!("The seed must be a non-negative integer, got {}.", args[1]);
            std::process::exit(1);
        }
        None => 16,
    };
    let curves_path = args.get(2).map(PathBuf::from);

    let dataset = Dataset::gaussian_blobs(
        200,
        Blob::new((-1.0, -0.5), (0.8, 0.6)),
        Blob::new((1.0, 0.5), (0.7, 0.9)),
        seed,
    )?;
    let (train_dataset, validation_dataset) = dataset.random_split(0.8, seed)?;
    info!(
        "Training on {} rows, validating on {} rows.",
        train_dataset.len(),
        validation_dataset.len()
    );

    let mut config = RegressorConfig::new(dataset.num_features());
    config.learning_rate = 0.001;
    config.max_iterations = 10_000;
    config.batch_size = 20;
    config.seed = Some(seed);
    let mut model = LogisticRegressor::logistic(config)?;

    let accuracy_before =
        model.accuracy(validation_dataset.features(), validation_dataset.labels())?;
    model.train(
        train_dataset.features(),
        train_dataset.labels(),
        validation_dataset.features(),
        validation_dataset.labels(),
    )?;
    let accuracy_after =
        model.accuracy(validation_dataset.features(), validation_dataset.labels())?;
    println!(
        "Model accuracy before training: {}, after training: {}",
        accuracy_before, accuracy_after
    );
    println!("Weights: {:?}", model.weights());

    if let Some(path) = curves_path {
        model.loss_history().curves()?.save(&path)?;
        info!("Wrote the loss curves to {}.", path.display());
    }
    Ok(())
}
