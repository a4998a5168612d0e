//! # varbench - Variant call benchmarking tool
//!
//! Compares a table of detected variant positions against a table of true
//! positions and derives confusion-matrix statistics, using the length of the
//! reference genome as the universe of possible positions.

pub mod compare;
pub mod fasta;
pub mod report;
pub mod table;
pub mod utils;

/// A labeled genomic position, keyed by everything except its status
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionRecord {
    pub chrom: String,
    pub pos: u64,
    pub bases: Vec<String>,
}

impl PositionRecord {
    pub fn new(chrom: String, pos: u64, bases: Vec<String>) -> Self {
        Self { chrom, pos, bases }
    }
}

/// Settings for parsing position tables
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub header_marker: char,
    pub valid_status: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_marker: '#',
            valid_status: "valid".to_string(),
        }
    }
}

/// Validate table parsing parameters
pub fn validate_table_config(config: &TableConfig) -> VarbenchResult<()> {
    if config.valid_status.trim().is_empty() {
        return Err(VarbenchError::InvalidConfig(
            "valid status label must not be empty".to_string(),
        ));
    }

    if config.header_marker.is_whitespace() {
        return Err(VarbenchError::InvalidConfig(
            "header marker must not be whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Error types for the varbench library
#[derive(Debug, thiserror::Error)]
pub enum VarbenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Header mismatch: {0}")]
    HeaderMismatch(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type VarbenchResult<T> = Result<T, VarbenchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_position_record_base_order_matters() {
        let a = PositionRecord::new("chr1".to_string(), 10, vec!["A".to_string(), "T".to_string()]);
        let b = PositionRecord::new("chr1".to_string(), 10, vec!["A".to_string(), "T".to_string()]);
        let c = PositionRecord::new("chr1".to_string(), 10, vec!["T".to_string(), "A".to_string()]);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_validate_table_config() {
        assert!(validate_table_config(&TableConfig::default()).is_ok());

        let config = TableConfig {
            header_marker: '#',
            valid_status: "  ".to_string(),
        };
        assert!(validate_table_config(&config).is_err());

        let config = TableConfig {
            header_marker: '\t',
            valid_status: "valid".to_string(),
        };
        assert!(validate_table_config(&config).is_err());
    }
}
