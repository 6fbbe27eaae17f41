use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tabtrace_types::{ActivityEvent, EventPayload, InteractionType};

/// Fallback aggregation key for events without a parsable hostname.
pub const UNKNOWN_DOMAIN: &str = "unknown";

const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Aggregation parameters. The only knob is the per-domain keyword cutoff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Maximum number of keyword entries retained per domain
    #[serde(rename = "topKeywords", default = "default_top_keywords")]
    pub top_keywords: usize,
}

fn default_top_keywords() -> usize {
    DEFAULT_TOP_KEYWORDS
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            top_keywords: DEFAULT_TOP_KEYWORDS,
        }
    }
}

/// Bounded per-domain statistics produced by one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAggregate {
    /// Count of navigation, load, and title events
    pub visit_count: u64,

    /// Sum of dwell durations in milliseconds
    pub total_time_ms: u64,

    /// Rounded mean dwell duration; 0 when no dwell events were seen
    pub avg_dwell_ms: u64,

    /// Count of click interactions
    pub click_count: u64,

    /// Running maximum scroll depth across scroll interactions, 0-100
    pub max_scroll_percent: u8,

    /// Highest-frequency keywords, count descending, ties in first-seen
    /// order, truncated to the configured cutoff
    #[serde(rename = "topKeywords")]
    pub top_keywords: Vec<KeywordCount>,

    /// Occurrences per category string
    pub categories: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Number of distinct domain keys produced
    #[serde(rename = "totalDomains")]
    pub total_domains: usize,

    /// Length of the input event sequence, pre-filter
    #[serde(rename = "totalEvents")]
    pub total_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub summary: AggregateSummary,
    pub domains: BTreeMap<String, DomainAggregate>,
}

/// Per-domain accumulator for the single pass. Keyword counts keep the
/// index of first appearance so finalization can break frequency ties
/// deterministically.
#[derive(Default)]
struct DomainBucket {
    visit_count: u64,
    total_time_ms: u64,
    dwell_count: u64,
    click_count: u64,
    max_scroll_percent: u8,
    keyword_counts: HashMap<String, (u64, usize)>,
    next_keyword_index: usize,
    categories: BTreeMap<String, u64>,
}

impl DomainBucket {
    fn observe(&mut self, event: &ActivityEvent) {
        match &event.payload {
            EventPayload::Navigation | EventPayload::Load | EventPayload::Title => {
                self.visit_count += 1;
            }
            EventPayload::Dwell(dwell) => {
                if let Some(duration) = dwell.duration_ms {
                    self.total_time_ms += duration;
                    self.dwell_count += 1;
                }
            }
            EventPayload::Interaction(interaction) => match interaction.interaction_type {
                InteractionType::Click => self.click_count += 1,
                InteractionType::Scroll => {
                    if let Some(pct) = interaction.max_scroll_percent {
                        self.max_scroll_percent = self.max_scroll_percent.max(pct.min(100));
                    }
                }
            },
            EventPayload::Keywords(kw) => {
                for keyword in &kw.keywords {
                    match self.keyword_counts.get_mut(keyword) {
                        Some((count, _)) => *count += 1,
                        None => {
                            self.keyword_counts
                                .insert(keyword.clone(), (1, self.next_keyword_index));
                            self.next_keyword_index += 1;
                        }
                    }
                }
            }
            EventPayload::SessionEnd(_) => {}
        }

        if let Some(category) = &event.category {
            *self.categories.entry(category.clone()).or_insert(0) += 1;
        }
    }

    fn finalize(self, top_keywords: usize) -> DomainAggregate {
        let avg_dwell_ms = if self.dwell_count > 0 {
            (self.total_time_ms as f64 / self.dwell_count as f64).round() as u64
        } else {
            0
        };

        let mut ranked: Vec<(String, u64, usize)> = self
            .keyword_counts
            .into_iter()
            .map(|(keyword, (count, first_seen))| (keyword, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(top_keywords);

        DomainAggregate {
            visit_count: self.visit_count,
            total_time_ms: self.total_time_ms,
            avg_dwell_ms,
            click_count: self.click_count,
            max_scroll_percent: self.max_scroll_percent,
            top_keywords: ranked
                .into_iter()
                .map(|(keyword, count, _)| KeywordCount { keyword, count })
                .collect(),
            categories: self.categories,
        }
    }
}

/// Fold the full event log into per-domain aggregates.
///
/// Single pass over the input; the keyword sort runs only at finalization,
/// so cost is O(E + D * K log K). Pure function: identical input and config
/// always yield identical output, and cross-tab arrival order does not
/// matter because grouping is by domain.
pub fn aggregate(events: &[ActivityEvent], config: &AggregateConfig) -> AggregateResult {
    let mut buckets: BTreeMap<String, DomainBucket> = BTreeMap::new();

    for event in events {
        let domain = event.domain.as_deref().unwrap_or(UNKNOWN_DOMAIN);
        buckets.entry(domain.to_string()).or_default().observe(event);
    }

    let domains: BTreeMap<String, DomainAggregate> = buckets
        .into_iter()
        .map(|(domain, bucket)| (domain, bucket.finalize(config.top_keywords)))
        .collect();

    AggregateResult {
        summary: AggregateSummary {
            total_domains: domains.len(),
            total_events: events.len(),
        },
        domains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabtrace_types::{DwellPayload, KeywordsPayload};

    fn event_for(domain: Option<&str>, payload: EventPayload) -> ActivityEvent {
        let mut event = ActivityEvent::new(1_000, payload);
        event.domain = domain.map(str::to_string);
        event
    }

    #[test]
    fn test_empty_input_is_zero_valued() {
        let result = aggregate(&[], &AggregateConfig::default());
        assert_eq!(result.summary.total_domains, 0);
        assert_eq!(result.summary.total_events, 0);
        assert!(result.domains.is_empty());
    }

    #[test]
    fn test_missing_domain_groups_under_unknown() {
        let result = aggregate(
            &[event_for(None, EventPayload::Navigation)],
            &AggregateConfig::default(),
        );
        assert_eq!(result.domains[UNKNOWN_DOMAIN].visit_count, 1);
    }

    #[test]
    fn test_dwell_without_duration_is_ignored() {
        let events = [
            event_for(
                Some("a.com"),
                EventPayload::Dwell(DwellPayload {
                    duration_ms: Some(1000),
                }),
            ),
            event_for(
                Some("a.com"),
                EventPayload::Dwell(DwellPayload { duration_ms: None }),
            ),
        ];
        let result = aggregate(&events, &AggregateConfig::default());
        let agg = &result.domains["a.com"];
        assert_eq!(agg.total_time_ms, 1000);
        assert_eq!(agg.avg_dwell_ms, 1000);
    }

    #[test]
    fn test_keyword_ties_break_by_first_seen() {
        let events = [
            event_for(
                Some("a.com"),
                EventPayload::Keywords(KeywordsPayload {
                    keywords: vec!["rust".into(), "tokio".into()],
                }),
            ),
            event_for(
                Some("a.com"),
                EventPayload::Keywords(KeywordsPayload {
                    keywords: vec!["serde".into(), "tokio".into()],
                }),
            ),
        ];
        let result = aggregate(&events, &AggregateConfig::default());
        let keywords: Vec<&str> = result.domains["a.com"]
            .top_keywords
            .iter()
            .map(|k| k.keyword.as_str())
            .collect();
        // tokio has count 2; rust and serde tie at 1 in first-seen order
        assert_eq!(keywords, vec!["tokio", "rust", "serde"]);
    }

    #[test]
    fn test_top_keywords_truncated_to_config() {
        let events = [event_for(
            Some("a.com"),
            EventPayload::Keywords(KeywordsPayload {
                keywords: vec!["one".into(), "two".into(), "three".into()],
            }),
        )];
        let result = aggregate(&events, &AggregateConfig { top_keywords: 2 });
        assert_eq!(result.domains["a.com"].top_keywords.len(), 2);
    }
}
