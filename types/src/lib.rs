use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Raw report entry ─────────────────────────────────────────────────────

/// One report entry as retrieved from the source, before parsing.
///
/// The retrieval side hands over three loosely formatted strings per list
/// item: an optional attribution line, the free-text body, and the case
/// count exactly as it appeared on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
    /// Who/where reported the case, when distinct from the body.
    /// E.g. "Person i Skåne som varit i norra Italien."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Free-text body, typically date-prefixed.
    /// E.g. "2020-03-09 10:47 - En person i Värmland"
    pub description: String,
    /// Verbatim count token, e.g. "1".
    pub count: String,
}

// ── Structured infection report ──────────────────────────────────────────

/// The structured record produced from one [`RawEntry`].
///
/// `location` and `date` are independently optional: absence means the
/// message did not disclose that field, which is distinct from an empty
/// string or a zero.
///
/// Absent fields serialize as explicit nulls (empty fields in CSV), not
/// skipped columns: every row must keep the same width for the CSV
/// round trip through the aggregate phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfectionReport {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub count: i64,
}

// ── Time-series rows ─────────────────────────────────────────────────────

/// One cell of the filled per-location time series. Every (date, location)
/// pair in the observed span gets a row; days without reports carry 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub location: String,
    pub date: NaiveDate,
    pub count: i64,
}

/// One day of an aggregated series with its day-over-day growth rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub count: i64,
    /// count(today) / count(yesterday); +inf on the first day of a series.
    pub growth_rate: f64,
}

/// Per-location variant of [`GrowthPoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGrowthPoint {
    pub location: String,
    pub date: NaiveDate,
    pub count: i64,
    pub growth_rate: f64,
}

// ── Projection rows ──────────────────────────────────────────────────────

/// One day of a simulated exponential trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Day offset from the simulation start (0-based).
    pub day: i64,
    pub count: i64,
    pub growth_rate: f64,
}
