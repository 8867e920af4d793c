use std::{
    error::Error,
    fmt::Display,
    fs::OpenOptions,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;

use crate::linalg::Matrix;

/// Read a dataset from a file. One sample per line, comma separated
/// floating point fields, no header.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("Opening dataset {}", path.display()))?;
    from_reader(BufReader::new(file))
}

/// Parse a dataset from any buffered reader. The column count is fixed by
/// the first non-empty line; rows of a different length surface as a size
/// mismatch when the matrix is assembled.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Matrix> {
    let context = "Parsing dataset";

    let mut elements: Vec<f64> = Vec::new();
    let mut width = 0;
    let mut height = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line.context(context)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = 0;
        for (j, token) in line.split(',').enumerate() {
            let value: f64 = token
                .trim()
                .parse()
                .context(format!(
                    "Failed to parse numeric on line {}, field {}",
                    i + 1,
                    j + 1,
                ))
                .context(context)?;
            elements.push(value);
            fields += 1;
        }
        if height == 0 {
            width = fields;
        }
        height += 1;
    }
    if height == 0 {
        return Err(DatasetError::EmptyFile.into());
    }

    debug!("parsed {} samples with {} features", height, width);
    Matrix::new(elements, height, width).context(context)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatasetError {
    EmptyFile,
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for DatasetError {}
