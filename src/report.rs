//! Tab-separated benchmark report

use crate::{compare::ComparisonResult, VarbenchResult};
use serde::Serialize;
use std::io::Write;

/// Placeholder for rates with a zero denominator
pub const UNDEFINED: &str = "NA";

/// One report line, in output column order
#[derive(Debug, Serialize)]
struct ReportRow {
    reference_size: u64,
    true_all: usize,
    true_valid: usize,
    detected_all: usize,
    detected_valid: usize,
    #[serde(rename = "TP")]
    tp: u64,
    #[serde(rename = "FP")]
    fp: u64,
    #[serde(rename = "TN")]
    tn: u64,
    #[serde(rename = "FN")]
    fn_: u64,
    accuracy: String,
    specificity: String,
    sensitivity: String,
    precision: String,
    fp_rate: String,
    f1_score: String,
}

impl From<&ComparisonResult> for ReportRow {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            reference_size: result.reference_size,
            true_all: result.true_all,
            true_valid: result.true_valid,
            detected_all: result.detected_all,
            detected_valid: result.detected_valid,
            tp: result.tp,
            fp: result.fp,
            tn: result.tn,
            fn_: result.fn_,
            accuracy: format_rate(result.accuracy),
            specificity: format_rate(result.specificity),
            sensitivity: format_rate(result.sensitivity),
            precision: format_rate(result.precision),
            fp_rate: format_rate(result.fp_rate),
            f1_score: format_rate(result.f1_score),
        }
    }
}

/// Format a rate to four decimal places
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{:.4}", value),
        None => UNDEFINED.to_string(),
    }
}

/// Write the header line and the data line for one comparison
pub fn write_report<W: Write>(result: &ComparisonResult, writer: W) -> VarbenchResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    wtr.serialize(ReportRow::from(result))?;
    wtr.flush()?;

    Ok(())
}
