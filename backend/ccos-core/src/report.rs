// src/report.rs
//! Chat-ready shift report. Output depends only on the inputs, including the
//! timestamp the caller passes in.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::devices::{offline_devices, AccessPoint, Camera, ChannelType, DeviceStats, OfflineDevice};
use crate::presence::{AttendanceEvent, PresenceAggregator, PresenceSummary};
use crate::warehouse_access::Visibility;

#[derive(Debug, Clone)]
pub struct ReportData {
    pub generated_at: NaiveDateTime,
    pub stats: DeviceStats,
    pub presence: PresenceSummary,
    pub offline: Vec<OfflineDevice>,
    /// Tickets typed in but not yet saved on the camera, by camera uuid.
    pub pending_tickets: HashMap<String, String>,
}

impl ReportData {
    pub fn build(
        cameras: &[Camera],
        access_points: &[AccessPoint],
        events: &[AttendanceEvent],
        visibility: &Visibility,
        aggregator: &PresenceAggregator,
        pending_tickets: HashMap<String, String>,
        generated_at: NaiveDateTime,
    ) -> Self {
        Self {
            generated_at,
            stats: DeviceStats::collect(cameras, access_points, visibility),
            presence: aggregator.aggregate(events, visibility, None),
            offline: offline_devices(cameras, visibility),
            pending_tickets,
        }
    }

    fn ticket_for<'a>(&'a self, device: &'a OfflineDevice) -> Option<&'a str> {
        let stored = device.camera.ticket.as_deref().filter(|t| !t.is_empty());
        stored.or_else(|| {
            self.pending_tickets
                .get(&device.camera.uuid)
                .map(String::as_str)
                .filter(|t| !t.is_empty())
        })
    }
}

pub fn render_report(data: &ReportData) -> String {
    let stats = &data.stats;
    let mut lines = vec![
        "*RELATÓRIO DE MONITORAMENTO*".to_string(),
        format!(
            "📅 {} - {}",
            data.generated_at.format("%d/%m/%Y"),
            data.generated_at.format("%H:%M:%S")
        ),
        String::new(),
        format!("📊 *Status Geral: {}*", stats.system_state().label()),
    ];

    if stats.total_video > 0 {
        lines.push("📹 *CÂMERAS*".to_string());
        lines.push(format!(
            "   Total: {} | 🟢 On: {} | 🔴 Off: {}",
            stats.total_video, stats.online_video, stats.offline_video
        ));
        lines.push(format!("   📉 Disponibilidade: {}%", stats.availability));
    }
    if stats.total_alarm > 0 {
        lines.push("🚨 *ALARMES*".to_string());
        lines.push(format!(
            "   Total: {} | 🟢 On: {} | 🔴 Off: {}",
            stats.total_alarm, stats.online_alarm, stats.offline_alarm
        ));
    }
    if stats.total_access > 0 {
        lines.push("🚪 *ACESSOS*".to_string());
        lines.push(format!(
            "   Total: {} | 🟢 On: {} | 🔴 Off: {}",
            stats.total_access, stats.online_access, stats.offline_access
        ));
    }
    if data.presence.total_presence > 0 {
        lines.push("👷 *PESSOAS*".to_string());
        lines.push(format!(
            "   Total Presente: {} (Terceiros: {})",
            data.presence.total_presence, data.presence.subgroup_presence
        ));
    }
    lines.push(String::new());

    if !data.offline.is_empty() {
        lines.push(format!(
            "❗ *OCORRÊNCIAS OFFLINE ({}):*",
            stats.offline_video + stats.offline_alarm
        ));
        for device in &data.offline {
            let kind = match device.camera.channel_type {
                ChannelType::Alarm => "[ALARME]",
                ChannelType::Video => "[CÂMERA]",
            };
            let ticket = data
                .ticket_for(device)
                .map(|t| format!(" [Chamado: {}]", t))
                .unwrap_or_default();
            lines.push(format!("❌ {} *{}*{}", kind, device.camera.name, ticket));
            lines.push(format!("   📍 {}", device.camera.location));
        }
    }

    let mut msg = lines.join("\n");
    msg.push('\n');
    msg
}
