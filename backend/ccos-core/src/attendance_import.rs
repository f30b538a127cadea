// src/attendance_import.rs
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, info};

use crate::error::AppError;
use crate::presence::{parse_event_date, AttendanceEvent};

// One row of an access-control export. Portuguese headers are accepted too.
#[derive(Debug, Deserialize)]
struct RawAttendanceRow {
    #[serde(alias = "nome", default)]
    name: String,
    #[serde(alias = "empresa", default)]
    company: String,
    #[serde(alias = "unidade", alias = "warehouse", default)]
    unit: String,
    #[serde(alias = "data", default)]
    date: String,
    #[serde(alias = "hora", default)]
    time: String,
    #[serde(alias = "ponto_acesso", default)]
    access_point: Option<String>,
    #[serde(alias = "evento", default)]
    event_type: Option<String>,
}

impl RawAttendanceRow {
    fn into_event(self) -> Option<AttendanceEvent> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        Some(AttendanceEvent {
            name,
            company: self.company.trim().to_string(),
            unit: self.unit.trim().to_string(),
            date: parse_event_date(&self.date),
            time: self.time.trim().to_string(),
            access_point: non_blank(self.access_point),
            event_type: non_blank(self.event_type),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads attendance events from CSV with a header row.
///
/// Unknown or malformed dates become `None`; rows without a name are skipped.
pub fn parse_attendance_csv<R: Read>(reader: R) -> Result<Vec<AttendanceEvent>, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut events = Vec::new();
    for (row_idx, row) in csv_reader.deserialize::<RawAttendanceRow>().enumerate() {
        match row?.into_event() {
            Some(event) => events.push(event),
            None => debug!("Skipping attendance row {} without a name", row_idx + 1),
        }
    }

    info!("Imported {} attendance events", events.len());
    Ok(events)
}

pub fn load_attendance_csv(path: &Path) -> Result<Vec<AttendanceEvent>, AppError> {
    info!("Loading attendance export from {}", path.display());
    let file = File::open(path)?;
    parse_attendance_csv(file)
}
