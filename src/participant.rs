use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::Columns;
use crate::error::{MatchError, Result};
use crate::normalize::Normalizer;

/// One survey row: column header -> raw answer.
pub type SurveyRecord = BTreeMap<String, String>;

/// A participant with preferences already reduced to canonical tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: String,
    pub favorite_entities: BTreeSet<String>,
    pub refused_entities: BTreeSet<String>,
    pub favorite_pairings: BTreeSet<String>,
    pub refused_pairings: BTreeSet<String>,
}

impl Participant {
    /// Builds a participant from a survey row. `row` is 1-based and only used
    /// to name the row in errors when the id itself is missing.
    pub fn from_record(
        record: &SurveyRecord,
        row: usize,
        columns: &Columns,
        normalizer: &Normalizer,
    ) -> Result<Self> {
        let id = record
            .get(&columns.id)
            .map(|id| id.trim().to_string())
            .ok_or_else(|| MatchError::MissingField {
                field: columns.id.clone(),
                row: format!("row {}", row),
            })?;

        let field = |name: &String| -> Result<BTreeSet<String>> {
            record
                .get(name)
                .map(|raw| normalizer.normalize_set(raw))
                .ok_or_else(|| MatchError::MissingField {
                    field: name.clone(),
                    row: format!("participant '{}' (row {})", id, row),
                })
        };

        Ok(Self {
            favorite_entities: field(&columns.favorite_entities)?,
            refused_entities: field(&columns.refused_entities)?,
            favorite_pairings: field(&columns.favorite_pairings)?,
            refused_pairings: field(&columns.refused_pairings)?,
            id,
        })
    }
}
