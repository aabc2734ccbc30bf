//! Metric extraction from partitioner output.
//!
//! Partitioners print free-form diagnostics; the lines of interest look like
//! `Edge Cut: 1234`. Each metric is looked up independently and only its
//! first occurrence counts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EDGE_CUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Edge Cut:[ \t]*(\d+)").expect("edge cut pattern"));
static MAX_CUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Max Cut:[ \t]*(\d+)").expect("max cut pattern"));

/// Metrics found in one run's output; `None` means the label was not found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetrics {
    pub edge_cut: Option<u64>,
    pub max_cut: Option<u64>,
}

fn first_capture(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Scan `text` for `Edge Cut: <n>` and `Max Cut: <n>`.
pub fn extract_metrics(text: &str) -> ExtractedMetrics {
    ExtractedMetrics {
        edge_cut: first_capture(&EDGE_CUT, text),
        max_cut: first_capture(&MAX_CUT, text),
    }
}

/// First integer following `<label>:` in `text`.
pub fn extract_labeled(text: &str, label: &str) -> Option<u64> {
    let re = Regex::new(&format!(r"{}:[ \t]*(\d+)", regex::escape(label))).ok()?;
    first_capture(&re, text)
}
