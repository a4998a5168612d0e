//! Reference genome length from FASTA files

use crate::{utils::open_reader, VarbenchError, VarbenchResult};
use bio::io::fasta;
use std::path::Path;

/// Read the id and sequence length of every record in a FASTA file
pub fn sequence_lengths<P: AsRef<Path>>(path: P) -> VarbenchResult<Vec<(String, u64)>> {
    let reader = fasta::Reader::from_bufread(open_reader(&path)?);

    let mut lengths = Vec::new();
    for record in reader.records() {
        let record = record?;
        lengths.push((record.id().to_string(), record.seq().len() as u64));
    }

    Ok(lengths)
}

/// Sum the sequence lengths of all records in a FASTA file
pub fn reference_length<P: AsRef<Path>>(path: P) -> VarbenchResult<u64> {
    let lengths = sequence_lengths(&path)?;

    if lengths.is_empty() {
        return Err(VarbenchError::InvalidReference(format!(
            "no sequences found in {}",
            path.as_ref().display()
        )));
    }

    for (id, len) in &lengths {
        log::debug!("Reference sequence {}: {} bp", id, len);
    }

    let total: u64 = lengths.iter().map(|(_, len)| len).sum();
    log::info!(
        "Reference genome: {} sequences, {} bp",
        lengths.len(),
        total
    );

    Ok(total)
}
