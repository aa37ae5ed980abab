//! Survey loading: CSV rows in, [`Participant`]s out.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Columns;
use crate::error::{MatchError, Result};
use crate::normalize::Normalizer;
use crate::participant::{Participant, SurveyRecord};

/// Reads header-keyed rows. Short rows are kept so missing fields can be
/// reported by name instead of as a CSV length error.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<SurveyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let records = csv_reader
        .records()
        .map(|row| {
            let row = row?;
            // Cells past the end of a short row stay absent.
            Ok(headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect::<SurveyRecord>())
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(rows = records.len(), "Read survey rows");
    Ok(records)
}

pub fn read_records_from_path(path: &Path) -> Result<Vec<SurveyRecord>> {
    let file = File::open(path).map_err(|e| {
        MatchError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open survey '{}': {}", path.display(), e),
        ))
    })?;
    read_records(file)
}

/// Converts rows to participants, stopping at the first malformed row.
pub fn load_participants(
    records: &[SurveyRecord],
    columns: &Columns,
    normalizer: &Normalizer,
) -> Result<Vec<Participant>> {
    let participants = records
        .iter()
        .enumerate()
        .map(|(i, record)| Participant::from_record(record, i + 1, columns, normalizer))
        .collect::<Result<Vec<_>>>()?;
    info!(participants = participants.len(), "Loaded participants");
    Ok(participants)
}
