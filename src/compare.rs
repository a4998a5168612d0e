//! Confusion-matrix statistics from true and detected position sets

use crate::{table::PositionTable, PositionRecord, VarbenchError, VarbenchResult};
use std::collections::HashSet;

/// Counts and rates derived from comparing detected positions against the truth
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub reference_size: u64,
    pub true_all: usize,
    pub true_valid: usize,
    pub detected_all: usize,
    pub detected_valid: usize,
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
    pub accuracy: Option<f64>,
    pub specificity: Option<f64>,
    pub sensitivity: Option<f64>,
    pub precision: Option<f64>,
    pub fp_rate: Option<f64>,
    pub f1_score: Option<f64>,
}

/// Ratio of two counts, undefined when the denominator is zero
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Compare detected valid positions against true valid positions.
///
/// `reference_size` is the number of positions in the genome; every position
/// that was not detected counts as a true negative. Rates whose denominator is
/// zero are reported as `None`.
///
/// Only the valid sets are seen here, so `true_all` and `detected_all` are
/// filled with the valid set sizes. Use [`compare_tables`] to report the full
/// table sizes.
pub fn compare(
    true_set: &HashSet<PositionRecord>,
    detected_set: &HashSet<PositionRecord>,
    reference_size: u64,
) -> VarbenchResult<ComparisonResult> {
    let detected = detected_set.len() as u64;
    if detected > reference_size {
        return Err(VarbenchError::InvalidInput(format!(
            "{} detected positions exceed the reference size of {}",
            detected, reference_size
        )));
    }

    let tp = true_set.intersection(detected_set).count() as u64;
    let fp = detected_set.difference(true_set).count() as u64;
    let fn_ = true_set.difference(detected_set).count() as u64;
    let tn = reference_size - detected;

    log::debug!("TP={} FP={} TN={} FN={}", tp, fp, tn, fn_);

    let result = ComparisonResult {
        reference_size,
        true_all: true_set.len(),
        true_valid: true_set.len(),
        detected_all: detected_set.len(),
        detected_valid: detected_set.len(),
        tp,
        fp,
        tn,
        fn_,
        accuracy: ratio(tp + tn, tp + fp + tn + fn_),
        specificity: ratio(tn, tn + fp),
        sensitivity: ratio(tp, tp + fn_),
        precision: ratio(tp, tp + fp),
        fp_rate: ratio(fp, tn + fp),
        f1_score: ratio(2 * tp, 2 * tp + fp + fn_),
    };

    for (name, value) in result.rates() {
        if value.is_none() {
            log::warn!("{} is undefined (zero denominator), reporting NA", name);
        }
    }

    Ok(result)
}

/// Compare the valid sets of two tables after checking their headers agree
pub fn compare_tables(
    truth: &PositionTable,
    detected: &PositionTable,
    reference_size: u64,
) -> VarbenchResult<ComparisonResult> {
    truth.ensure_same_header(detected)?;

    let mut result = compare(truth.valid(), detected.valid(), reference_size)?;
    result.true_all = truth.all().len();
    result.detected_all = detected.all().len();

    Ok(result)
}

impl ComparisonResult {
    /// The derived rates in report order
    pub fn rates(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("accuracy", self.accuracy),
            ("specificity", self.specificity),
            ("sensitivity", self.sensitivity),
            ("precision", self.precision),
            ("fp_rate", self.fp_rate),
            ("f1_score", self.f1_score),
        ]
    }
}
