use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use derive_more::derive::{Display, Error};

use super::Holiday;

pub const REQUIRED_HEADERS: [&str; 4] = [
    "Year",
    "Yom Tov",
    "Start of First Days",
    "Start of Last Day (After Chol Hamoed)",
];

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("CSV is missing required headers: {}", missing.join(", "))]
pub struct MissingHeaders {
    pub missing: Vec<&'static str>,
}

/// Reads the whole holiday calendar. Fails before returning any row if a required header is
/// missing or any row is malformed.
pub fn read_holidays(path: &Path) -> anyhow::Result<Vec<Holiday>> {
    let file = File::open(path).with_context(|| format!("CSV file '{}' cannot be opened", path.display()))?;

    read_holidays_from(file).with_context(|| format!("Error reading CSV file '{}'", path.display()))
}

pub fn read_holidays_from(source: impl Read) -> anyhow::Result<Vec<Holiday>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().context("Error reading CSV header row")?;
    let missing: Vec<&'static str> = REQUIRED_HEADERS
        .into_iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .collect();

    if !missing.is_empty() {
        return Err(MissingHeaders { missing }.into());
    }

    reader
        .deserialize::<Holiday>()
        .enumerate()
        .map(|(index, row)| row.with_context(|| format!("Error parsing CSV row {}", index + 1)))
        .collect()
}
