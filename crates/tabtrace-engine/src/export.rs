use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::{AggregateResult, AggregateSummary, DomainAggregate};

/// Schema version stamped into every exported dataset. Bump when the
/// DomainAggregate or envelope shape changes incompatibly.
pub const EXPORT_SCHEMA_VERSION: &str = "1.0";

/// Envelope handed to the external transport layer. Immutable once built;
/// the engine performs no I/O with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedDataset {
    pub summary: AggregateSummary,
    pub domains: BTreeMap<String, DomainAggregate>,

    /// Export instant, RFC 3339 / ISO-8601 in UTC
    #[serde(rename = "exportedAt")]
    pub exported_at: String,

    pub version: String,
}

/// Package an aggregation result for export.
///
/// `raw_event_count` is the pre-filter length of the event log the
/// aggregate was computed from; it overrides the summary's own count so
/// the envelope reflects what the log actually held at export time.
pub fn build_export(result: AggregateResult, raw_event_count: usize) -> ExportedDataset {
    build_export_at(result, raw_event_count, Utc::now())
}

/// Same as [`build_export`] with an explicit clock, for deterministic tests.
pub fn build_export_at(
    result: AggregateResult,
    raw_event_count: usize,
    now: DateTime<Utc>,
) -> ExportedDataset {
    ExportedDataset {
        summary: AggregateSummary {
            total_domains: result.summary.total_domains,
            total_events: raw_event_count,
        },
        domains: result.domains,
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        version: EXPORT_SCHEMA_VERSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AggregateConfig, aggregate};
    use chrono::TimeZone;

    #[test]
    fn test_envelope_fields() {
        let result = aggregate(&[], &AggregateConfig::default());
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let dataset = build_export_at(result, 42, now);

        assert_eq!(dataset.version, EXPORT_SCHEMA_VERSION);
        assert_eq!(dataset.exported_at, "2025-06-01T12:00:00.000Z");
        assert_eq!(dataset.summary.total_events, 42);
        assert_eq!(dataset.summary.total_domains, 0);
    }

    #[test]
    fn test_wire_field_names() {
        let result = aggregate(&[], &AggregateConfig::default());
        let dataset = build_export_at(result, 0, Utc::now());
        let json = serde_json::to_value(&dataset).unwrap();

        assert!(json.get("exportedAt").is_some());
        assert!(json["summary"].get("totalDomains").is_some());
        assert!(json["summary"].get("totalEvents").is_some());
    }
}
