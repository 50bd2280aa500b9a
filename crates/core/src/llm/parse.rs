//! # Reply Parsing
//!
//! Best-effort recovery of JSON payloads from model replies. Models asked
//! for "valid JSON only" still wrap their answer in markdown fences or
//! prose often enough that every structured-output stage funnels its reply
//! through here before deserializing.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// Matches a fenced code block, with or without a `json` language tag.
fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fence regex is valid")
    })
}

/// Locate the JSON payload inside a reply.
///
/// Tried in order: a fenced code block, the first `{` through the last `}`,
/// then the reply as-is.
pub fn json_payload(reply: &str) -> &str {
    if let Some(captures) = fence_re().captures(reply) {
        if let Some(block) = captures.get(1) {
            return block.as_str();
        }
    }
    if let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) {
        if start < end {
            return &reply[start..=end];
        }
    }
    reply
}

/// Deserialize a typed value out of a possibly-fenced reply.
pub fn from_reply<T: DeserializeOwned>(reply: &str) -> anyhow::Result<T> {
    serde_json::from_str(json_payload(reply)).map_err(Into::into)
}
