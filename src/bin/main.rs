use std::env;

use log::info;

use frecency_optim::data::{DataLoader, FrecencyGenerator};
use frecency_optim::loss::{self, Loss, MSELoss};
use frecency_optim::optimizer::{SignAgreementConfig, StepRule};
use frecency_optim::{
    DataGenerator, LinearModel, Model, ModelCheckpoint, Optimizer, OptimizerConfig, RunConfig,
};

/// Outcome of training with one optimizer
struct RunSummary {
    label: String,
    train_losses: Vec<f64>,
    validation: Vec<f64>,
    best_metric: f64,
    best_model: Option<LinearModel>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("loading run config from {path}");
            RunConfig::load(path)?
        }
        None => RunConfig::default(),
    };

    let generator = FrecencyGenerator::new(&config.generator)?;
    let num_features = generator.num_categories();

    let optimizers = match &config.optimizer {
        Some(optimizer) => vec![optimizer.clone()],
        None => comparison_suite(num_features),
    };

    let mut summaries = Vec::with_capacity(optimizers.len());
    for optimizer_config in &optimizers {
        println!("\nTraining with {}:", optimizer_config.label());
        let mut optimizer = optimizer_config.build()?;
        let label = optimizer_config.label();
        summaries.push(train_with_optimizer(&config, &generator, label, &mut optimizer)?);
    }

    println!("\n{:<48} {:>12} {:>12} {:>12}", "optimizer", "final loss", "final r2", "best r2");
    for summary in &summaries {
        println!(
            "{:<48} {:>12.4} {:>12.5} {:>12.5}",
            summary.label,
            summary.train_losses.last().copied().unwrap_or(f64::NAN),
            summary.validation.last().copied().unwrap_or(f64::NAN),
            summary.best_metric,
        );
    }

    let best = summaries
        .iter()
        .filter_map(|s| s.best_model.as_ref().map(|model| (s, model)))
        .max_by(|(a, _), (b, _)| a.best_metric.total_cmp(&b.best_metric));

    if let Some((best, model)) = best {
        println!("\nBest run: {}", best.label);
        println!("{:<28} {:>10} {:>10}", "category", "learned", "actual");
        for ((name, learned), actual) in generator
            .category_names()
            .iter()
            .zip(&model.weights)
            .zip(generator.points())
        {
            println!("{name:<28} {learned:>10.3} {actual:>10.3}");
        }
    }

    Ok(())
}

/// One of each optimizer variant, tuned loosely for the default frecency tables
fn comparison_suite(num_features: usize) -> Vec<OptimizerConfig> {
    vec![
        OptimizerConfig::FixedStep { learning_rate: 2.0 },
        OptimizerConfig::DecayedStep {
            learning_rate: 2.0,
            decay: 1e-5,
        },
        OptimizerConfig::SignAgreement(SignAgreementConfig::new(
            0.5,
            num_features,
            StepRule::Scaled,
        )),
        OptimizerConfig::SignAgreement(SignAgreementConfig::new(
            1.0,
            num_features,
            StepRule::Resilient,
        )),
        OptimizerConfig::SignAgreement(SignAgreementConfig::new(
            1.0,
            num_features,
            StepRule::ResilientQuantized,
        )),
        OptimizerConfig::Adam { learning_rate: 1.0 },
    ]
}

/// Train a fresh linear model, checkpointing after every epoch
fn train_with_optimizer<O: Optimizer>(
    config: &RunConfig,
    generator: &FrecencyGenerator,
    label: String,
    optimizer: &mut O,
) -> frecency_optim::Result<RunSummary> {
    let mut model = LinearModel::new(generator.num_categories());
    let mut checkpoint =
        ModelCheckpoint::with_num_sampled(loss::r2_score, generator.clone(), config.num_sampled);

    let mut train_losses = Vec::with_capacity(config.epochs);
    let mut validation = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        let samples = generator.sample(config.samples_per_epoch);
        let loader = DataLoader::new(samples, config.batch_size, true);

        let mut epoch_loss = 0.0;
        for batch in loader.iter() {
            let predictions = model.predict(&batch.features);
            epoch_loss += MSELoss::forward(&predictions, &batch.labels) * batch.len() as f64;

            let grad = model.gradient(&batch.features, &batch.labels)?;
            optimizer.step(&mut model.weights, &grad)?;
        }
        epoch_loss /= loader.len() as f64;
        train_losses.push(epoch_loss);

        let outcome = checkpoint.evaluate(&model);
        validation.push(outcome.metric);

        if epoch % 10 == 0 || epoch == config.epochs - 1 {
            println!(
                "Epoch {}: loss = {:.4}, validation r2 = {:.5}",
                epoch, epoch_loss, outcome.metric
            );
        }
    }

    Ok(RunSummary {
        label,
        train_losses,
        validation,
        best_metric: checkpoint.best_metric(),
        best_model: checkpoint.into_best_model(),
    })
}
