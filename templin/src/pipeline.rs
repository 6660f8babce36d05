//! End-to-end evaluation of a template image as an MNIST classifier.

use crate::backend::CpuBackend;
use crate::bias::{Bias, BiasSource};
use crate::classifier::LinearClassifier;
use crate::dataset::{DataLoader, MnistSource, Partition, Standardization};
use crate::error::{Error, Result};
use crate::scoring::{evaluate_with, MulticlassScorer, ScoreReport};
use crate::tensor::ITensor;
use crate::template::{check_eta, decode_template, extract_weights, normalize_template, TemplateWeights};
use image::DynamicImage;
use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables of a pipeline run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EvalConfig {
    /// Inversion factor in `[0, 1]`, 0 keeps the template as is
    pub eta: f32,
    pub batch_size: usize,
    pub bias: BiasSource,
    pub standardization: Standardization,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            eta: 0.0,
            batch_size: 1000,
            bias: BiasSource::default(),
            standardization: Standardization::MNIST,
        }
    }
}

impl EvalConfig {
    pub fn with_eta(mut self, eta: f32) -> Self {
        self.eta = eta;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_bias(mut self, bias: BiasSource) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_standardization(mut self, standardization: Standardization) -> Self {
        self.standardization = standardization;
        self
    }

    fn validate(&self) -> Result<()> {
        check_eta(self.eta)?;
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Test accuracy in percent
    pub accuracy: f64,
    pub weights: TemplateWeights,
    pub bias: Bias,
    pub report: ScoreReport,
}

/// Normalizes the template at `path`, turns it into classifier weights and scores the
/// classifier on the test partition of `source`.
pub fn run_pipeline<P, S>(path: P, config: &EvalConfig, source: &S) -> Result<PipelineOutput>
where
    P: AsRef<Path>,
    S: MnistSource + ?Sized,
{
    config.validate()?;
    let path = path.as_ref();
    info!("Normalizing template {} with eta = {}", path.display(), config.eta);
    let image = decode_template(path)?;
    let weights = template_weights(&image, config.eta)?;
    let bias = config.bias.resolve()?;
    info!("Using bias {:?}", bias.values());
    let loader = load_test_set(source, config)?;
    let (accuracy, report) = score(&weights, &bias, &loader)?;
    Ok(PipelineOutput {
        accuracy,
        weights,
        bias,
        report,
    })
}

/// Runs the pipeline once per inversion factor, sharing the decoded template, the bias and
/// the test set between runs. Returns `(eta, accuracy)` pairs in the order of `etas`.
pub fn sweep_eta<P, S>(path: P, etas: &[f32], config: &EvalConfig, source: &S) -> Result<Vec<(f32, f64)>>
where
    P: AsRef<Path>,
    S: MnistSource + ?Sized,
{
    config.validate()?;
    for &eta in etas {
        check_eta(eta)?;
    }
    let image = decode_template(path)?;
    let bias = config.bias.resolve()?;
    let loader = load_test_set(source, config)?;
    etas.iter()
        .map(|&eta| {
            info!("Sweeping eta = {eta}");
            let weights = template_weights(&image, eta)?;
            let (accuracy, _) = score(&weights, &bias, &loader)?;
            Ok((eta, accuracy))
        })
        .collect()
}

fn template_weights(image: &DynamicImage, eta: f32) -> Result<TemplateWeights> {
    let canvas = normalize_template(image, eta)?;
    let weights = extract_weights(&canvas)?;
    info!("Extracted {} template weights", weights.matrix().len());
    Ok(weights)
}

fn load_test_set<S: MnistSource + ?Sized>(source: &S, config: &EvalConfig) -> Result<DataLoader> {
    let partition = source.fetch(Partition::Test)?;
    info!("Loaded {} test samples", partition.len());
    Ok(DataLoader::new(partition, config.batch_size)?.with_standardization(config.standardization))
}

fn score(weights: &TemplateWeights, bias: &Bias, loader: &DataLoader) -> Result<(f64, ScoreReport)> {
    let classifier = LinearClassifier::new(CpuBackend::<f32>::new(), weights, bias);
    if classifier.input_size() != loader.input_size() {
        return Err(Error::shape(
            format!("images of {} pixels", classifier.input_size()),
            format!("images of {} pixels", loader.input_size()),
        ));
    }
    let mut scorer = MulticlassScorer::for_classifier(&classifier);
    evaluate_with(&classifier, loader, &mut scorer)?;
    scorer.log_report();
    let report = scorer.report();
    info!("Accuracy: {:.2}%", report.accuracy);
    Ok((report.accuracy, report))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvalConfig::default();
        assert_eq!(config.eta, 0.0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.bias, BiasSource::Random { seed: None });
        assert_eq!(config.standardization, Standardization::MNIST);
    }

    #[test]
    fn test_builder() {
        let config = EvalConfig::default()
            .with_eta(0.5)
            .with_batch_size(10)
            .with_bias(BiasSource::Zero)
            .with_standardization(Standardization::UNIT);
        assert_eq!(config.eta, 0.5);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.bias, BiasSource::Zero);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            EvalConfig::default().with_eta(1.5).validate(),
            Err(Error::InvalidEta(_))
        ));
        assert!(matches!(
            EvalConfig::default().with_batch_size(0).validate(),
            Err(Error::InvalidBatchSize)
        ));
    }
}
