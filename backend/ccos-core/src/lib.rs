// src/lib.rs
//! Core of the CCOS monitoring desk: OCR list organizing, CPF checks, daily
//! presence aggregation, device availability, document expiry and the shift
//! report, plus the HTTP surface over them.

pub mod api;
pub mod attendance_import;
pub mod config;
pub mod devices;
pub mod documents;
pub mod error;
pub mod national_id;
pub mod presence;
pub mod report;
pub mod text_organizer;
pub mod warehouse_access;

mod presence_tests;

pub use error::AppError;
pub use national_id::is_valid as is_valid_national_id;
pub use presence::{AttendanceEvent, PresenceAggregator, PresenceSummary};
pub use text_organizer::{organize, PersonRecord};
pub use warehouse_access::{has_warehouse_permission, Role, UserProfile, Visibility};
