// src/documents.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WARNING_DAYS: i64 = 30;

// Licences and permits whose expiry the desk tracks (fire brigade, city hall, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicDocument {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub organ: String,
    pub expiration_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Valid,
    Warning,
    Expired,
}

impl DocumentStatus {
    pub fn for_days_left(days_left: i64, warning_days: i64) -> Self {
        if days_left < 0 {
            DocumentStatus::Expired
        } else if days_left <= warning_days {
            DocumentStatus::Warning
        } else {
            DocumentStatus::Valid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAlert {
    #[serde(flatten)]
    pub document: PublicDocument,
    pub days_left: i64,
    pub status: DocumentStatus,
}

/// Documents that are expired or about to expire, most urgent first.
pub fn expiring_documents(
    documents: &[PublicDocument],
    today: NaiveDate,
    warning_days: i64,
) -> Vec<DocumentAlert> {
    let mut alerts: Vec<DocumentAlert> = documents
        .iter()
        .map(|doc| {
            let days_left = (doc.expiration_date - today).num_days();
            DocumentAlert {
                document: doc.clone(),
                days_left,
                status: DocumentStatus::for_days_left(days_left, warning_days),
            }
        })
        .filter(|alert| alert.status != DocumentStatus::Valid)
        .collect();
    alerts.sort_by_key(|alert| alert.days_left);
    alerts
}
