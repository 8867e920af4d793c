use std::{
    fs::OpenOptions,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};

pub fn get_buff_reader(filename: &Option<PathBuf>) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if let Some(filename) = filename {
        let file = OpenOptions::new()
            .read(true)
            .open(filename)
            .with_context(|| format!("Opening {}", filename.display()))?;

        Box::new(BufReader::new(file))
    } else {
        let stdin = io::stdin();
        Box::new(BufReader::new(stdin))
    };
    Ok(reader)
}
