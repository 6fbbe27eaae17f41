// Engine module - turns the append-only event log into per-domain
// aggregates and export envelopes. This layer sits between stored events
// (types) and whatever transport the embedder hands the dataset to.

pub mod aggregate;
pub mod export;

pub use aggregate::{
    AggregateConfig, AggregateResult, AggregateSummary, DomainAggregate, KeywordCount,
    UNKNOWN_DOMAIN, aggregate,
};
pub use export::{EXPORT_SCHEMA_VERSION, ExportedDataset, build_export, build_export_at};
