//! Report export
//!
//! Serializes a report to JSON after a simulated generation delay and
//! stamps it with a SHA-256 checksum of the bytes.

use super::ReportError;
use sha2::{Digest, Sha256};
use shared::models::SalesReport;
use shared::types::Timestamp;
use shared::util::now_millis;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Exported report file
#[derive(Debug, Clone, PartialEq)]
pub struct ReportExport {
    pub file_name: String,
    pub content: String,
    /// Hex SHA-256 of `content`
    pub checksum: String,
    pub exported_at: Timestamp,
}

/// Check exported bytes against their checksum
pub fn verify_checksum(content: &[u8], checksum: &str) -> bool {
    hex::encode(Sha256::digest(content)) == checksum.to_ascii_lowercase()
}

#[derive(Debug, Clone)]
pub struct ReportExporter {
    delay: Duration,
}

impl ReportExporter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Export `report` as pretty JSON
    ///
    /// Returns [`ReportError::Cancelled`] if `cancel` fires during the delay.
    pub async fn export(
        &self,
        report: &SalesReport,
        cancel: &CancellationToken,
    ) -> Result<ReportExport, ReportError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Report export cancelled");
                return Err(ReportError::Cancelled);
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        let content = serde_json::to_string_pretty(report)?;
        let checksum = hex::encode(Sha256::digest(content.as_bytes()));
        let file_name = format!("sales-report-{}-{}.json", report.from, report.to);
        tracing::info!(file = %file_name, bytes = content.len(), "Report exported");

        Ok(ReportExport {
            file_name,
            content,
            checksum,
            exported_at: now_millis(),
        })
    }
}
