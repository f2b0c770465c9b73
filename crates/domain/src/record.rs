//! Registration record schema.
//!
//! The ledger holds one row per registration attempt under a fixed header
//! row.  Column order below is the on-sheet order; the first column is the
//! stable key every later write resolves by.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::ActorId;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Columns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    RegistrationId,
    ActorId,
    Date,
    Crew,
    CrewType,
    StartPhoto,
    StartLatitude,
    StartLongitude,
    StartTime,
    EndTime,
    EndPhoto,
    EndLatitude,
    EndLongitude,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::RegistrationId,
        Column::ActorId,
        Column::Date,
        Column::Crew,
        Column::CrewType,
        Column::StartPhoto,
        Column::StartLatitude,
        Column::StartLongitude,
        Column::StartTime,
        Column::EndTime,
        Column::EndPhoto,
        Column::EndLatitude,
        Column::EndLongitude,
    ];

    /// Header text written in row 1 of the sheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::RegistrationId => "ID REGISTRO",
            Column::ActorId => "ID ACTOR",
            Column::Date => "FECHA",
            Column::Crew => "CUADRILLA",
            Column::CrewType => "TIPO DE CUADRILLA",
            Column::StartPhoto => "FOTO INICIO CUADRILLA",
            Column::StartLatitude => "LATITUD",
            Column::StartLongitude => "LONGITUD",
            Column::StartTime => "HORA INGRESO",
            Column::EndTime => "HORA SALIDA",
            Column::EndPhoto => "FOTO FIN CUADRILLA",
            Column::EndLatitude => "LATITUD SALIDA",
            Column::EndLongitude => "LONGITUD SALIDA",
        }
    }

    /// Zero-based position in the header row.
    pub fn index(self) -> usize {
        Column::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }

    /// Cells filled after the row exists.  Each is write-once per
    /// registration; a retry rewrites the same cell.
    pub fn is_step_cell(self) -> bool {
        !matches!(
            self,
            Column::RegistrationId | Column::ActorId | Column::Date | Column::Crew
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The full header row in sheet order.
pub fn headers() -> Vec<String> {
    Column::ALL.iter().map(|c| c.header().to_owned()).collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Crew type & photo slot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewType {
    Disponibilidad,
    Regular,
}

impl CrewType {
    pub const ALL: [CrewType; 2] = [CrewType::Disponibilidad, CrewType::Regular];

    /// Value written to the `TIPO DE CUADRILLA` cell.
    pub fn as_str(self) -> &'static str {
        match self {
            CrewType::Disponibilidad => "DISPONIBILIDAD",
            CrewType::Regular => "REGULAR",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

impl fmt::Display for CrewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of the shift a photo or location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSlot {
    Start,
    End,
}

impl PhotoSlot {
    pub fn photo_column(self) -> Column {
        match self {
            PhotoSlot::Start => Column::StartPhoto,
            PhotoSlot::End => Column::EndPhoto,
        }
    }

    pub fn time_column(self) -> Column {
        match self {
            PhotoSlot::Start => Column::StartTime,
            PhotoSlot::End => Column::EndTime,
        }
    }

    pub fn latitude_column(self) -> Column {
        match self {
            PhotoSlot::Start => Column::StartLatitude,
            PhotoSlot::End => Column::EndLatitude,
        }
    }

    pub fn longitude_column(self) -> Column {
        match self {
            PhotoSlot::Start => Column::StartLongitude,
            PhotoSlot::End => Column::EndLongitude,
        }
    }

    /// Object-name prefix for uploaded selfies.
    pub fn object_prefix(self) -> &'static str {
        match self {
            PhotoSlot::Start => "selfie_inicio",
            PhotoSlot::End => "selfie_salida",
        }
    }
}

impl fmt::Display for PhotoSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoSlot::Start => f.write_str("start"),
            PhotoSlot::End => f.write_str("end"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Draft row
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The fields known when a registration row is first created.  Every step
/// cell starts empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub actor_id: ActorId,
    pub date: NaiveDate,
    pub crew: String,
}

impl RecordDraft {
    /// Render the full row in header order, keyed by `registration_id`.
    pub fn to_row(&self, registration_id: Uuid) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|column| match column {
                Column::RegistrationId => registration_id.to_string(),
                Column::ActorId => self.actor_id.to_string(),
                Column::Date => format_date(self.date),
                Column::Crew => self.crew.clone(),
                _ => String::new(),
            })
            .collect()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Cell formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

/// Trim a crew name and collapse inner runs of whitespace.
pub fn normalize_crew_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_order_starts_with_key() {
        let h = headers();
        assert_eq!(h.len(), 13);
        assert_eq!(h[0], "ID REGISTRO");
        assert_eq!(h[Column::EndLongitude.index()], "LONGITUD SALIDA");
    }

    #[test]
    fn draft_row_leaves_step_cells_empty() {
        let id = Uuid::new_v4();
        let draft = RecordDraft {
            actor_id: 42,
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            crew: "CREW-7".into(),
        };
        let row = draft.to_row(id);
        assert_eq!(row[Column::RegistrationId.index()], id.to_string());
        assert_eq!(row[Column::Date.index()], "2026-05-04");
        assert_eq!(row[Column::Crew.index()], "CREW-7");
        for column in Column::ALL.iter().filter(|c| c.is_step_cell()) {
            assert!(row[column.index()].is_empty(), "{column} should be empty");
        }
    }

    #[test]
    fn crew_names_are_normalized() {
        assert_eq!(
            normalize_crew_name("  D 1   WIN SGA\tCHRISTOPHER  "),
            "D 1 WIN SGA CHRISTOPHER"
        );
    }

    #[test]
    fn coordinates_keep_six_decimals() {
        assert_eq!(format_coordinate(-12.0463731), "-12.046373");
        assert_eq!(format_coordinate(-77.0), "-77.000000");
    }

    #[test]
    fn crew_type_parses_cell_values() {
        assert_eq!(CrewType::parse("REGULAR"), Some(CrewType::Regular));
        assert_eq!(CrewType::parse("regular"), None);
    }
}
