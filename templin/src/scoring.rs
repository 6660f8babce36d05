use crate::backend::Backend;
use crate::classifier::LinearClassifier;
use crate::dataset::DataLoader;
use crate::error::Result;
use crate::tensor::{Dim2, ITensor, Tensor, Tensor2, TensorBase, TensorView2};
use crate::NUM_CLASSES;
use log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::iter::zip;

pub trait Scorer<B: Backend> {
    fn process_batch(&mut self, backend: &B, scores: TensorView2<B::Float>, labels: &[u8]);
}

/// Counts how many arg-max predictions match their label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccuracyScorer {
    correct: usize,
    total: usize,
}

impl AccuracyScorer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Percentage of correct predictions, 0 before any sample was scored.
    pub fn accuracy(&self) -> f64 {
        percentage(self.correct, self.total)
    }
}

impl<B: Backend> Scorer<B> for AccuracyScorer {
    fn process_batch(&mut self, backend: &B, scores: TensorView2<B::Float>, labels: &[u8]) {
        assert_eq!(scores.dims().rows(), labels.len());
        let predicted = backend.argmax_rows(scores);
        self.correct += zip(predicted, labels).filter(|&(p, &l)| p == usize::from(l)).count();
        self.total += labels.len();
    }
}

/// Accumulates a confusion matrix, rows are indexed by the expected label and columns by the
/// predicted one.
#[derive(Clone, Debug, PartialEq)]
pub struct MulticlassScorer {
    matrix: Tensor2<usize>,
    count: usize,
}

impl Default for MulticlassScorer {
    fn default() -> Self {
        Self::new(NUM_CLASSES)
    }
}

impl MulticlassScorer {
    pub fn new(num_classes: usize) -> Self {
        MulticlassScorer {
            matrix: Tensor::zeroed(Dim2(num_classes, num_classes)),
            count: 0,
        }
    }

    pub fn for_classifier<B: Backend>(classifier: &LinearClassifier<B>) -> Self {
        Self::new(classifier.num_classes())
    }

    #[inline]
    pub fn confusion(&self) -> &Tensor2<usize> {
        &self.matrix
    }

    pub fn report(&self) -> ScoreReport {
        let correct = (0..self.matrix.dims().rows()).map(|i| self.matrix[[i, i]]).sum();
        let per_class_accuracy = self
            .matrix
            .iter_major_axis()
            .enumerate()
            .map(|(i, row)| {
                let total: usize = row.iter().sum();
                (total > 0).then(|| percentage(row[i], total))
            })
            .collect();
        ScoreReport {
            accuracy: percentage(correct, self.count),
            correct,
            total: self.count,
            per_class_accuracy,
            confusion: self.matrix.iter_major_axis().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn log_report(&self) {
        let report = self.report();
        let incorrect = report.total - report.correct;
        let error_rate = if report.total > 0 { 100.0 - report.accuracy } else { 0.0 };
        debug!("Confusion matrix: {:?}", self.matrix);
        for (class, accuracy) in report.per_class_accuracy.iter().enumerate() {
            if let Some(accuracy) = accuracy {
                info!("Class {class}: {accuracy:.2}%");
            }
        }
        info!("Error rate: {error_rate:.2}% ({incorrect}/{})", report.total);
    }
}

impl<B: Backend> Scorer<B> for MulticlassScorer {
    fn process_batch(&mut self, backend: &B, scores: TensorView2<B::Float>, labels: &[u8]) {
        self.count += scores.dims().rows();
        backend.accum_confusion_matrix_multiclass(&mut self.matrix, scores, labels);
    }
}

/// Summary of a [`MulticlassScorer`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreReport {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    /// `None` for classes without samples
    pub per_class_accuracy: Vec<Option<f64>>,
    pub confusion: Vec<Vec<usize>>,
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Feeds every batch of `loader` through `classifier` into `scorer`.
pub fn evaluate_with<B, S>(classifier: &LinearClassifier<B>, loader: &DataLoader, scorer: &mut S) -> Result<()>
where
    B: Backend<Float = f32>,
    S: Scorer<B>,
{
    for batch in loader {
        let scores = classifier.scores(batch.images().view())?;
        scorer.process_batch(classifier.backend(), scores.view(), batch.labels());
    }
    Ok(())
}

/// Classification accuracy of `classifier` over `loader`, in percent.
pub fn evaluate<B: Backend<Float = f32>>(classifier: &LinearClassifier<B>, loader: &DataLoader) -> Result<f64> {
    let mut scorer = AccuracyScorer::new();
    evaluate_with(classifier, loader, &mut scorer)?;
    info!(
        "Scored {} samples: {}/{} correct",
        scorer.total(),
        scorer.correct(),
        scorer.total()
    );
    Ok(scorer.accuracy())
}
