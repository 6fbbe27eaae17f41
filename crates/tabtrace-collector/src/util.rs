use sha2::{Digest, Sha256};
use url::Url;

/// SHA-256 hex digest of a full URL. The digest is the only URL-derived
/// value allowed into storage; the plain URL never leaves the collector.
pub fn hash_string_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hostname of a URL, or None when the URL does not parse or has no host
/// (e.g. about:blank, data: URIs). Aggregation buckets such events under
/// "unknown".
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Current wall clock in milliseconds since the Unix epoch, matching the
/// `ts` field resolution of the event log.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
