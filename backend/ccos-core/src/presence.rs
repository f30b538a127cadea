// src/presence.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::warehouse_access::Visibility;

// --- Constants ---

/// Third-party companies counted in the partner presence figure.
pub const DEFAULT_PARTNER_COMPANIES: [&str; 8] = [
    "B11",
    "MULT",
    "MPI",
    "FORMA",
    "SUPERA LOG",
    "MJM",
    "PRIMUS",
    "PRAYLOG",
];

pub const UNKNOWN_DATE: &str = "N/A";

const HOURS_PER_DAY: usize = 24;

// --- Events ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub name: String,
    pub company: String,
    /// Warehouse the access was recorded at.
    pub unit: String,
    #[serde(with = "event_date", default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl AttendanceEvent {
    /// Identity used for daily deduplication: unit, upper-cased name, company.
    pub fn person_key(&self) -> String {
        format!("{}-{}-{}", self.unit, self.name.to_uppercase(), self.company)
    }

    /// Leading hour of `time`, when it looks like `HH:MM` and is in range.
    pub fn hour(&self) -> Option<usize> {
        let (head, _) = self.time.split_once(':')?;
        let digits: String = head
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let hour: usize = digits.parse().ok()?;
        (hour < HOURS_PER_DAY).then_some(hour)
    }
}

/// Accepts `YYYY-MM-DD` and `DD/MM/YYYY`; anything else is an unknown date.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(UNKNOWN_DATE) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

// Wire format keeps the "N/A" sentinel for unknown dates.
mod event_date {
    use super::{parse_event_date, UNKNOWN_DATE};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(UNKNOWN_DATE),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_event_date))
    }
}

// --- Summary ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    pub hour_label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSummary {
    pub reporting_date: Option<NaiveDate>,
    pub total_presence: usize,
    pub subgroup_presence: usize,
    pub hourly_histogram: Vec<HourlyCount>,
}

// --- Aggregator ---

#[derive(Debug, Clone)]
pub struct PresenceAggregator {
    partner_companies: HashSet<String>,
}

impl Default for PresenceAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PARTNER_COMPANIES.iter().map(|c| c.to_string()))
    }
}

impl PresenceAggregator {
    pub fn new<I>(partner_companies: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            partner_companies: partner_companies.into_iter().collect(),
        }
    }

    pub fn is_partner(&self, company: &str) -> bool {
        self.partner_companies.contains(company)
    }

    /// Daily presence for the latest visible date, or for `as_of` when pinned.
    ///
    /// Presence counts distinct people; the histogram counts raw events.
    pub fn aggregate(
        &self,
        events: &[AttendanceEvent],
        visibility: &Visibility,
        as_of: Option<NaiveDate>,
    ) -> PresenceSummary {
        let visible = visibility.filter(events, |e| e.unit.as_str());

        let reporting_date = as_of.or_else(|| visible.iter().filter_map(|e| e.date).max());

        let day: Vec<&AttendanceEvent> = match reporting_date {
            Some(date) => visible
                .into_iter()
                .filter(|e| e.date == Some(date))
                .collect(),
            None => Vec::new(),
        };

        let total_presence = day
            .iter()
            .map(|e| e.person_key())
            .collect::<HashSet<_>>()
            .len();
        let subgroup_presence = day
            .iter()
            .filter(|e| self.is_partner(&e.company))
            .map(|e| e.person_key())
            .collect::<HashSet<_>>()
            .len();

        debug!(
            "Presence for {:?}: {} people ({} partner), {} events",
            reporting_date,
            total_presence,
            subgroup_presence,
            day.len()
        );

        PresenceSummary {
            reporting_date,
            total_presence,
            subgroup_presence,
            hourly_histogram: histogram(day.into_iter()),
        }
    }
}

/// Distinct known dates among the visible events, newest first.
pub fn available_dates(events: &[AttendanceEvent], visibility: &Visibility) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = visibility
        .filter(events, |e| e.unit.as_str())
        .into_iter()
        .filter_map(|e| e.date)
        .collect();
    dates.into_iter().rev().collect()
}

/// Raw access count per hour for one date, 24 slots in hour order.
pub fn hourly_histogram(
    events: &[AttendanceEvent],
    visibility: &Visibility,
    date: NaiveDate,
) -> Vec<HourlyCount> {
    histogram(
        visibility
            .filter(events, |e| e.unit.as_str())
            .into_iter()
            .filter(|e| e.date == Some(date)),
    )
}

fn histogram<'a, I>(events: I) -> Vec<HourlyCount>
where
    I: Iterator<Item = &'a AttendanceEvent>,
{
    let mut counts = [0usize; HOURS_PER_DAY];
    for hour in events.filter_map(AttendanceEvent::hour) {
        counts[hour] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourlyCount {
            hour_label: format!("{:02}:00", hour),
            count,
        })
        .collect()
}
