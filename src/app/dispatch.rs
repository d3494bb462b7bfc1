use crate::domain::model::{DispatchReport, SeverityLevel};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const REPORT_FILENAME: &str = "surge_report.json";

/// What gets persisted for one dispatch run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope {
    pub generated_at: DateTime<Utc>,
    pub severity: SeverityLevel,
    pub latitude: f64,
    pub longitude: f64,
    pub registry_size: usize,
    pub summary: String,
    pub report: DispatchReport,
}

impl ReportEnvelope {
    pub fn new(
        severity: SeverityLevel,
        latitude: f64,
        longitude: f64,
        registry_size: usize,
        report: DispatchReport,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            severity,
            latitude,
            longitude,
            registry_size,
            summary: report.summary(),
            report,
        }
    }
}

/// Plain-text rendering: one block per alert, separated by a rule.
pub fn render_text(report: &DispatchReport) -> String {
    match report {
        DispatchReport::Alerts { notifications } if !notifications.is_empty() => {
            let rule = "=".repeat(80);
            let mut out = String::new();
            for notification in notifications {
                out.push_str(&notification.message_text);
                out.push('\n');
                out.push_str(&rule);
                out.push('\n');
            }
            out
        }
        other => format!("{}\n", other.summary()),
    }
}

pub async fn persist_report<S: Storage>(storage: &S, envelope: &ReportEnvelope) -> Result<()> {
    let json = serde_json::to_vec_pretty(envelope)?;
    tracing::debug!("Writing {} ({} bytes)", REPORT_FILENAME, json.len());
    storage.write_file(REPORT_FILENAME, &json).await
}
