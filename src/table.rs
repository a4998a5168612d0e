//! Position table parsing
//!
//! A position table is a tab-separated file whose first line is a header
//! starting with a marker character (`#` by default). Every following line is
//! `chrom<TAB>position<TAB>status<TAB>base1<TAB>base2...`. Rows are keyed by
//! everything except the status and sorted into valid and invalid sets.
//! Trailing empty base fields (a row ending in a tab) are dropped, so they do
//! not change the key. Blank lines are skipped.

use crate::{utils::open_reader, PositionRecord, TableConfig, VarbenchError, VarbenchResult};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

/// Column indices of the fixed leading fields
const CHROM_COL: usize = 0;
const POS_COL: usize = 1;
const STATUS_COL: usize = 2;
const BASES_START: usize = 3;

/// The parsed contents of one position table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    header: String,
    valid: HashSet<PositionRecord>,
    invalid: HashSet<PositionRecord>,
    all: HashSet<PositionRecord>,
}

impl PositionTable {
    /// Load a table from a plain or gzip compressed file
    pub fn from_path<P: AsRef<Path>>(path: P, config: &TableConfig) -> VarbenchResult<Self> {
        let reader = open_reader(&path)?;
        let display = path.as_ref().display();

        let table = Self::from_reader(reader, config).map_err(|e| match e {
            VarbenchError::InvalidHeader(msg) => {
                VarbenchError::InvalidHeader(format!("{}: {}", display, msg))
            }
            VarbenchError::InvalidRecord(msg) => {
                VarbenchError::InvalidRecord(format!("{}: {}", display, msg))
            }
            other => other,
        })?;

        log::info!(
            "Loaded {} positions from {} ({} valid, {} invalid)",
            table.all.len(),
            display,
            table.valid.len(),
            table.invalid.len()
        );

        Ok(table)
    }

    /// Parse a table from any buffered reader
    pub fn from_reader<R: BufRead>(mut reader: R, config: &TableConfig) -> VarbenchResult<Self> {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Err(VarbenchError::InvalidHeader("file is empty".to_string()));
        }
        let header = header.trim_end_matches(&['\r', '\n'][..]).to_string();

        if !header.starts_with(config.header_marker) {
            return Err(VarbenchError::InvalidHeader(format!(
                "first line must start with '{}', found: {}",
                config.header_marker, header
            )));
        }

        let mut valid = HashSet::new();
        let mut invalid = HashSet::new();
        let mut all = HashSet::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            // 1-based, counting the header
            let line_number = index + 2;

            let record: csv::StringRecord = line.split('\t').collect();
            let (position, status) = parse_row(&record).map_err(|msg| {
                VarbenchError::InvalidRecord(format!("line {}: {}", line_number, msg))
            })?;

            if status == config.valid_status {
                valid.insert(position.clone());
            } else {
                invalid.insert(position.clone());
            }
            all.insert(position);
        }

        Ok(PositionTable {
            header,
            valid,
            invalid,
            all,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn valid(&self) -> &HashSet<PositionRecord> {
        &self.valid
    }

    pub fn invalid(&self) -> &HashSet<PositionRecord> {
        &self.invalid
    }

    pub fn all(&self) -> &HashSet<PositionRecord> {
        &self.all
    }

    /// Fail unless both tables were written against the same genome ordering
    pub fn ensure_same_header(&self, other: &PositionTable) -> VarbenchResult<()> {
        if self.header != other.header {
            return Err(VarbenchError::HeaderMismatch(format!(
                "'{}' != '{}'",
                self.header, other.header
            )));
        }
        Ok(())
    }
}

/// Split one data row into its position key and status
fn parse_row(record: &csv::StringRecord) -> Result<(PositionRecord, &str), String> {
    let chrom = record
        .get(CHROM_COL)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| "missing chromosome".to_string())?;

    let pos_field = record
        .get(POS_COL)
        .ok_or_else(|| "missing position".to_string())?;
    let pos = pos_field
        .parse::<u64>()
        .map_err(|_| format!("position is not numeric: '{}'", pos_field))?;

    let status = record
        .get(STATUS_COL)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "missing status".to_string())?;

    let mut bases: Vec<String> = record
        .iter()
        .skip(BASES_START)
        .map(|b| b.to_string())
        .collect();
    while bases.last().is_some_and(|b| b.is_empty()) {
        bases.pop();
    }

    Ok((PositionRecord::new(chrom.to_string(), pos, bases), status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const HEADER: &str = "#chrom\tpos\tstatus\tgenomeA\tgenomeB";

    fn parse(content: &str) -> VarbenchResult<PositionTable> {
        PositionTable::from_reader(Cursor::new(content.to_string()), &TableConfig::default())
    }

    fn key(chrom: &str, pos: u64, bases: &[&str]) -> PositionRecord {
        PositionRecord::new(
            chrom.to_string(),
            pos,
            bases.iter().map(|b| b.to_string()).collect(),
        )
    }

    #[test]
    fn test_parse_sorts_by_status() {
        let content = format!(
            "{}\nchr1\t100\tvalid\tA\tT\nchr1\t200\tinvalid\tG\tC\nchr2\t5\tvalid\tC\tC\n",
            HEADER
        );
        let table = parse(&content).unwrap();

        assert_eq!(table.header(), HEADER);
        assert_eq!(table.valid().len(), 2);
        assert_eq!(table.invalid().len(), 1);
        assert_eq!(table.all().len(), 3);
        assert!(table.valid().contains(&key("chr1", 100, &["A", "T"])));
        assert!(table.invalid().contains(&key("chr1", 200, &["G", "C"])));
        assert!(table.all().contains(&key("chr1", 200, &["G", "C"])));
    }

    #[test]
    fn test_parse_without_bases() {
        let content = format!("{}\nchr1\t100\tvalid\n", HEADER);
        let table = parse(&content).unwrap();
        assert!(table.valid().contains(&key("chr1", 100, &[])));
    }

    #[test]
    fn test_status_is_not_part_of_key() {
        let content = format!(
            "{}\nchr1\t100\tvalid\tA\nchr1\t100\tfiltered\tA\n",
            HEADER
        );
        let table = parse(&content).unwrap();
        assert_eq!(table.all().len(), 1);
        assert_eq!(table.valid().len(), 1);
        assert_eq!(table.invalid().len(), 1);
    }

    #[test]
    fn test_header_only() {
        let table = parse(&format!("{}\n", HEADER)).unwrap();
        assert!(table.all().is_empty());
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let content = format!("{}\r\nchr1\t100\tvalid\tA\r\n\r\nchr1\t101\tvalid\tG\r\n", HEADER);
        let table = parse(&content).unwrap();
        assert_eq!(table.header(), HEADER);
        assert_eq!(table.valid().len(), 2);
        assert!(table.valid().contains(&key("chr1", 100, &["A"])));
    }

    #[test]
    fn test_error_line_counts_blank_lines() {
        let content = "#h\n\n\nchr1\tx\tvalid\n";
        match parse(content) {
            Err(VarbenchError::InvalidRecord(msg)) => assert!(msg.starts_with("line 4:"), "{}", msg),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }

        let content = format!("{}\r\nchr1\t1\tvalid\r\n\r\nchr1\t\tvalid\r\n", HEADER);
        match parse(&content) {
            Err(VarbenchError::InvalidRecord(msg)) => assert!(msg.starts_with("line 4:"), "{}", msg),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tab_does_not_change_key() {
        let with_tab = parse(&format!("{}\nchr1\t1\tvalid\tA\t\n", HEADER)).unwrap();
        let without_tab = parse(&format!("{}\nchr1\t1\tvalid\tA\n", HEADER)).unwrap();
        assert_eq!(with_tab.valid(), without_tab.valid());

        // Interior empty calls are kept
        let table = parse(&format!("{}\nchr1\t1\tvalid\t\tA\n", HEADER)).unwrap();
        assert!(table.valid().contains(&key("chr1", 1, &["", "A"])));
    }

    #[test]
    fn test_bad_header() {
        let content = "chrom\tpos\tstatus\nchr1\t100\tvalid\n";
        assert!(matches!(parse(content), Err(VarbenchError::InvalidHeader(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(VarbenchError::InvalidHeader(_))));
    }

    #[test]
    fn test_non_numeric_position() {
        let content = format!("{}\nchr1\t100\tvalid\tA\nchr1\tabc\tvalid\tA\n", HEADER);
        match parse(&content) {
            Err(VarbenchError::InvalidRecord(msg)) => {
                assert!(msg.contains("line 3"));
                assert!(msg.contains("abc"));
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_position() {
        let content = format!("{}\nchr1\n", HEADER);
        assert!(matches!(parse(&content), Err(VarbenchError::InvalidRecord(_))));
    }

    #[test]
    fn test_missing_or_empty_status() {
        let content = format!("{}\nchr1\t100\n", HEADER);
        assert!(matches!(parse(&content), Err(VarbenchError::InvalidRecord(_))));

        let content = format!("{}\nchr1\t100\t\tA\n", HEADER);
        assert!(matches!(parse(&content), Err(VarbenchError::InvalidRecord(_))));
    }

    #[test]
    fn test_empty_chromosome() {
        let content = format!("{}\n\t100\tvalid\tA\n", HEADER);
        assert!(matches!(parse(&content), Err(VarbenchError::InvalidRecord(_))));
    }

    #[test]
    fn test_custom_valid_status() {
        let config = TableConfig {
            header_marker: '#',
            valid_status: "PASS".to_string(),
        };
        let content = format!("{}\nchr1\t1\tPASS\tA\nchr1\t2\tvalid\tA\n", HEADER);
        let table = PositionTable::from_reader(Cursor::new(content), &config).unwrap();
        assert_eq!(table.valid().len(), 1);
        assert!(table.valid().contains(&key("chr1", 1, &["A"])));
    }

    #[test]
    fn test_from_path_is_idempotent() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", HEADER).unwrap();
        writeln!(temp_file, "chr1\t100\tvalid\tA\tT").unwrap();
        writeln!(temp_file, "chr1\t150\tambiguous\tN\tT").unwrap();
        writeln!(temp_file, "chrM\t7\tvalid\tC\tG").unwrap();

        let config = TableConfig::default();
        let first = PositionTable::from_path(temp_file.path(), &config).unwrap();
        let second = PositionTable::from_path(temp_file.path(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_path_error_names_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "no marker here").unwrap();

        match PositionTable::from_path(temp_file.path(), &TableConfig::default()) {
            Err(VarbenchError::InvalidHeader(msg)) => {
                assert!(msg.contains(&temp_file.path().display().to_string()))
            }
            other => panic!("expected InvalidHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_same_header() {
        let a = parse(&format!("{}\n", HEADER)).unwrap();
        let b = parse(&format!("{}\n", HEADER)).unwrap();
        let c = parse("#chrom\tpos\tstatus\tgenomeB\tgenomeA\n").unwrap();

        assert!(a.ensure_same_header(&b).is_ok());
        assert!(matches!(
            a.ensure_same_header(&c),
            Err(VarbenchError::HeaderMismatch(_))
        ));
    }
}
