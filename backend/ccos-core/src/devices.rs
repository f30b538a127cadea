// src/devices.rs
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::warehouse_access::Visibility;

// Locations where an offline device is treated as critical.
const CRITICAL_LOCATION_KEYWORDS: [&str; 5] = ["DOCA", "PORTARIA", "SERVIDOR", "ACESSO", "ENTRADA"];

// --- Device Structures ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Online,
    Offline,
}

impl Status {
    pub fn toggled(self) -> Self {
        match self {
            Status::Online => Status::Offline,
            Status::Offline => Status::Online,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    #[default]
    Video,
    Alarm,
}

// A recorder channel: either a video camera or an alarm input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub uuid: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub module: String,
    pub warehouse: String,
    #[serde(default)]
    pub responsible: String,
    pub status: Status,
    #[serde(default)]
    pub channel_type: ChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    pub uuid: String,
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub location: String,
    pub warehouse: String,
    pub status: Status,
    #[serde(default)]
    pub last_log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<String>,
}

// --- Statistics ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub total_video: usize,
    pub online_video: usize,
    pub offline_video: usize,
    /// Online video channels as a percentage, one decimal place.
    pub availability: Decimal,
    pub total_alarm: usize,
    pub online_alarm: usize,
    pub offline_alarm: usize,
    pub total_access: usize,
    pub online_access: usize,
    pub offline_access: usize,
}

impl DeviceStats {
    pub fn collect(
        cameras: &[Camera],
        access_points: &[AccessPoint],
        visibility: &Visibility,
    ) -> Self {
        let visible = visibility.filter(cameras, |c| c.warehouse.as_str());
        let access = visibility.filter(access_points, |a| a.warehouse.as_str());

        let count = |channel: ChannelType, status: Status| {
            visible
                .iter()
                .filter(|c| c.channel_type == channel && c.status == status)
                .count()
        };

        let online_video = count(ChannelType::Video, Status::Online);
        let offline_video = count(ChannelType::Video, Status::Offline);
        let online_alarm = count(ChannelType::Alarm, Status::Online);
        let offline_alarm = count(ChannelType::Alarm, Status::Offline);
        let online_access = access.iter().filter(|a| a.status == Status::Online).count();

        Self {
            total_video: online_video + offline_video,
            online_video,
            offline_video,
            availability: availability(online_video, online_video + offline_video),
            total_alarm: online_alarm + offline_alarm,
            online_alarm,
            offline_alarm,
            total_access: access.len(),
            online_access,
            offline_access: access.len() - online_access,
        }
    }

    pub fn system_state(&self) -> SystemState {
        SystemState::from_availability(self.availability)
    }
}

fn availability(online: usize, total: usize) -> Decimal {
    if total == 0 {
        return dec!(0.0);
    }
    let mut pct = (Decimal::from(online) * dec!(100) / Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(1);
    pct
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemState {
    #[serde(rename = "ÓTIMO")]
    Optimal,
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "REGULAR")]
    Regular,
    #[serde(rename = "CRÍTICO")]
    Critical,
}

impl SystemState {
    pub fn from_availability(availability: Decimal) -> Self {
        if availability >= dec!(95) {
            SystemState::Optimal
        } else if availability >= dec!(70) {
            SystemState::Normal
        } else if availability >= dec!(40) {
            SystemState::Regular
        } else {
            SystemState::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemState::Optimal => "ÓTIMO",
            SystemState::Normal => "NORMAL",
            SystemState::Regular => "REGULAR",
            SystemState::Critical => "CRÍTICO",
        }
    }
}

// --- Offline Devices ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "CRÍTICO")]
    Critical,
    #[serde(rename = "MODERADO")]
    Moderate,
}

impl Priority {
    pub fn for_location(location: &str) -> Self {
        let location = location.to_uppercase();
        if CRITICAL_LOCATION_KEYWORDS
            .iter()
            .any(|keyword| location.contains(keyword))
        {
            Priority::Critical
        } else {
            Priority::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineDevice {
    #[serde(flatten)]
    pub camera: Camera,
    pub priority: Priority,
}

/// Offline channels the caller may see, critical ones first.
pub fn offline_devices(cameras: &[Camera], visibility: &Visibility) -> Vec<OfflineDevice> {
    let mut offline: Vec<OfflineDevice> = visibility
        .filter(cameras, |c| c.warehouse.as_str())
        .into_iter()
        .filter(|c| c.status == Status::Offline)
        .map(|c| OfflineDevice {
            camera: c.clone(),
            priority: Priority::for_location(&c.location),
        })
        .collect();
    offline.sort_by_key(|d| d.priority);
    offline
}

// --- Collection Updates ---
// Each update returns the whole replacement collection; the caller persists it.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub name: String,
    pub new_status: Status,
}

/// Flips one channel. `None` when the uuid is unknown.
pub fn toggle_status(cameras: &[Camera], uuid: &str) -> Option<(Vec<Camera>, StatusChange)> {
    let target = match cameras.iter().find(|c| c.uuid == uuid) {
        Some(target) => target,
        None => {
            warn!("Toggle requested for unknown camera {}", uuid);
            return None;
        }
    };
    let change = StatusChange {
        name: target.name.clone(),
        new_status: target.status.toggled(),
    };

    let updated = cameras
        .iter()
        .map(|c| {
            if c.uuid == uuid {
                Camera {
                    status: change.new_status,
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect();

    info!("Camera '{}' set to {:?}", change.name, change.new_status);
    Some((updated, change))
}

/// Sets every channel of one warehouse (exact name) to `status`.
pub fn set_warehouse_status(cameras: &[Camera], warehouse: &str, status: Status) -> Vec<Camera> {
    let mut changed = 0usize;
    let updated = cameras
        .iter()
        .map(|c| {
            if c.warehouse == warehouse {
                changed += 1;
                Camera { status, ..c.clone() }
            } else {
                c.clone()
            }
        })
        .collect();
    info!(
        "Warehouse '{}' set to {:?} ({} channels)",
        warehouse, status, changed
    );
    updated
}

/// Records a support ticket on a channel; a blank ticket clears it.
pub fn update_ticket(cameras: &[Camera], uuid: &str, ticket: &str) -> Vec<Camera> {
    let ticket = ticket.trim();
    cameras
        .iter()
        .map(|c| {
            if c.uuid == uuid {
                Camera {
                    ticket: (!ticket.is_empty()).then(|| ticket.to_string()),
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect()
}

/// Marks a channel back online and drops its ticket.
pub fn resolve_issue(cameras: &[Camera], uuid: &str) -> Vec<Camera> {
    cameras
        .iter()
        .map(|c| {
            if c.uuid == uuid {
                Camera {
                    status: Status::Online,
                    ticket: None,
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect()
}
