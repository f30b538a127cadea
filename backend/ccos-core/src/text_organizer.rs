// src/text_organizer.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::national_id::{self, MISSING_ID};

// --- Patterns ---

// First match only: dotted/dashed grouping, or eleven bare digits.
static CPF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{3}\.?[0-9]{3}\.?[0-9]{3}-?[0-9]{2})|([0-9]{11})")
        .expect("CPF pattern is valid")
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9_.\-]+@[A-Za-z0-9_.\-]+\.[A-Za-z0-9_]+").expect("email pattern is valid")
});

// Field labels printed on ID cards and attendance sheets.
static BLOCKLIST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:RG|SSP|DATA|NASCIMENTO|MAE|PAI|FILIACAO|CARGO|EMPRESA|ADMISSAO|CPF|NOME|EMAIL|TEL|CEL|CNPJ|PAGINA|PAGE|TOTAL|ASSINATURA|LISTA|PRESENCA|DOCUMENTO)\b",
    )
    .expect("blocklist pattern is valid")
});

// Latin-1 letters survive, everything else becomes a space.
static NON_LETTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Z\x{00C0}-\x{00FF}\s]").expect("non-letter pattern is valid")
});

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const MIN_NAME_CHARS: usize = 4;

// --- Records ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Zero-based index of the source line.
    pub line: usize,
    pub name: String,
    /// `XXX.XXX.XXX-XX`, or `-` when the line carried no ID.
    pub national_id: String,
    #[serde(default)]
    pub confirmed: bool,
}

impl PersonRecord {
    pub fn has_national_id(&self) -> bool {
        self.national_id != MISSING_ID
    }

    /// Digits-only rendering used when copying IDs into other systems.
    pub fn national_id_digits(&self) -> String {
        if self.has_national_id() {
            national_id::digits(&self.national_id)
        } else {
            MISSING_ID.to_string()
        }
    }

    /// A present ID that fails the checksum and nobody confirmed yet.
    pub fn needs_review(&self) -> bool {
        self.has_national_id() && !self.confirmed && !national_id::is_valid(&self.national_id)
    }

    pub fn toggle_confirmed(&mut self) {
        self.confirmed = !self.confirmed;
    }
}

// --- Organizer ---

/// Turns OCR output or a pasted list into person records, one candidate per line.
///
/// Lines are independent: a name and an ID printed on separate lines are never
/// joined. Lines that do not leave a usable name are dropped without report.
pub fn organize(raw_text: &str) -> Vec<PersonRecord> {
    let mut records = Vec::new();
    let mut discarded = 0usize;

    for (idx, line) in LINE_BREAK.split(raw_text).enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match organize_line(idx, line) {
            Some(record) => records.push(record),
            None => discarded += 1,
        }
    }

    debug!(
        "Organized {} records ({} lines discarded)",
        records.len(),
        discarded
    );
    records
}

fn organize_line(idx: usize, line: &str) -> Option<PersonRecord> {
    let mut text = line.to_string();
    let mut formatted_id = None;

    if let Some(m) = CPF_PATTERN.find(line) {
        formatted_id = national_id::format(m.as_str());
        text.replace_range(m.range(), "");
    }

    let text = EMAIL_PATTERN.replace_all(&text, "");
    let text = BLOCKLIST_PATTERN.replace_all(&text, "");
    let text = NON_LETTER_PATTERN.replace_all(&text, " ");
    let name = title_case(WHITESPACE_RUN.replace_all(&text, " ").trim());

    if name.chars().count() < MIN_NAME_CHARS {
        return None;
    }

    Some(PersonRecord {
        line: idx,
        name,
        national_id: formatted_id.unwrap_or_else(|| MISSING_ID.to_string()),
        confirmed: false,
    })
}

fn title_case(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
