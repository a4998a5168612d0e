//! Utility functions for file handling and common operations

use crate::{VarbenchError, VarbenchResult};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Check if a file is gzip compressed
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> VarbenchResult<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0; 2];

    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1f, 0x8b]),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(VarbenchError::Io(e)),
    }
}

/// Open a plain or gzip compressed text file for buffered reading
pub fn open_reader<P: AsRef<Path>>(path: P) -> VarbenchResult<Box<dyn BufRead>> {
    let file = File::open(&path)
        .map_err(|_| VarbenchError::FileNotFound(path.as_ref().to_string_lossy().to_string()))?;

    let reader: Box<dyn BufRead> = if is_gzipped(&path)? {
        log::debug!("Reading {} as gzip", path.as_ref().display());
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

/// Validate file paths and check if they exist
pub fn validate_file_exists<P: AsRef<Path>>(path: P) -> VarbenchResult<()> {
    if !path.as_ref().exists() {
        return Err(VarbenchError::FileNotFound(
            path.as_ref().to_string_lossy().to_string(),
        ));
    }
    Ok(())
}

/// Validate that a file is readable
pub fn validate_file_readable<P: AsRef<Path>>(path: P) -> VarbenchResult<()> {
    validate_file_exists(&path)?;

    if path.as_ref().is_dir() {
        return Err(VarbenchError::InvalidInput(format!(
            "{} is a directory",
            path.as_ref().display()
        )));
    }

    File::open(&path)
        .map_err(|_| VarbenchError::FileNotFound(path.as_ref().to_string_lossy().to_string()))?;

    Ok(())
}

/// Timer utility for measuring execution time
pub struct Timer {
    start: std::time::Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::info!("Starting timer: {}", name);
        Timer {
            start: std::time::Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    pub fn log_elapsed(&self) {
        log::info!("Timer '{}' elapsed: {:.2?}", self.name, self.elapsed());
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.log_elapsed();
    }
}
