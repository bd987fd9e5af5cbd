use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query used when the client leaves the query field blank.
pub const DEFAULT_QUERY: &str = "Analyze this financial document for investment insights";

/// Trim the client query, falling back to [`DEFAULT_QUERY`] when nothing is left.
pub fn resolve_query(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => DEFAULT_QUERY.to_string(),
    }
}

/// One completed analysis. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub filename: String,
    pub query: String,
    pub analysis: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Stamp a new record with the current time, truncated to what the store keeps.
    pub fn new(id: Uuid, filename: String, query: String, analysis: String) -> Self {
        Self {
            id,
            filename,
            query,
            analysis,
            created_at: truncate_to_micros(Utc::now()),
        }
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            id: self.id,
            filename: self.filename.clone(),
            query: self.query.clone(),
            created_at: self.created_at,
        }
    }
}

/// List view of a record, without the analysis text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub id: Uuid,
    pub filename: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

/// Fixed-width text form used for storage; lexical order equals time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Offset-less ISO 8601 text (as older rows carry) is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(ts.timestamp_micros()).unwrap_or(ts)
}
