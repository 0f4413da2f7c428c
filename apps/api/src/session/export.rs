//! Spreadsheet export of the session log.
//!
//! CSV with a UTF-8 byte-order mark so spreadsheet software opens the Korean
//! text with the right encoding. Built in memory; nothing touches disk.

use anyhow::anyhow;
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::HistoryEntry;

pub const EXPORT_FILE_NAME: &str = "Crisis_Ops_Log.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const EXPORT_COLUMNS: [&str; 9] = [
    "Round",
    "Genre",
    "Score",
    "Risk",
    "Crisis",
    "User_Action",
    "User_Notice",
    "Feedback",
    "Recorded_At",
];

/// One spreadsheet row. Field order matches `EXPORT_COLUMNS`.
#[derive(Serialize)]
struct ExportRow<'a> {
    round: usize,
    genre: &'a str,
    score: u32,
    risk: u32,
    crisis: &'a str,
    user_action: &'a str,
    user_notice: &'a str,
    feedback: &'a str,
    recorded_at: String,
}

impl<'a> From<&'a HistoryEntry> for ExportRow<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            round: entry.round,
            genre: entry.genre.label(),
            score: entry.score,
            risk: entry.risk,
            crisis: &entry.scenario_text,
            user_action: &entry.action_text,
            user_notice: &entry.notice_text,
            feedback: &entry.feedback_text,
            recorded_at: entry.recorded_at.to_rfc3339(),
        }
    }
}

/// Renders the whole history. The header row is always present.
pub fn history_csv(history: &[HistoryEntry]) -> Result<Bytes, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| AppError::Internal(anyhow!("Failed to write export header: {e}")))?;

    for entry in history {
        writer
            .serialize(ExportRow::from(entry))
            .map_err(|e| AppError::Internal(anyhow!("Failed to write round {}: {e}", entry.round)))?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow!("Failed to flush export: {e}")))?;

    Ok(Bytes::from(buffer))
}
