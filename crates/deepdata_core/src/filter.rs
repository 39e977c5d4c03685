// SPDX-License-Identifier: MIT OR Apache-2.0
//! Harmless-error filter.
//!
//! Some libraries report conditions at `ERROR` level that are expected on
//! certain platforms. While active, the filter marks messages matching a
//! configured pattern so the log bridge can downgrade them instead of
//! surfacing them as errors. Non-matching messages are never touched.

use parking_lot::RwLock;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Patterns used when the configuration does not provide any
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"(?i)suboptimal present of frame",
    r"(?i)failed to start window drag.*not supported",
    r"(?i)cursor grab.*not supported",
];

struct FilterShared {
    active: AtomicBool,
    patterns: RwLock<Vec<Regex>>,
}

/// Thread-safe, shareable pattern filter.
///
/// Clones share the same switch and pattern list.
#[derive(Clone)]
pub struct HarmlessErrorFilter {
    shared: Arc<FilterShared>,
}

impl Default for HarmlessErrorFilter {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_PATTERNS.iter().copied())
    }
}

impl HarmlessErrorFilter {
    /// Inactive filter with already compiled patterns
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self {
            shared: Arc::new(FilterShared {
                active: AtomicBool::new(false),
                patterns: RwLock::new(patterns),
            }),
        }
    }

    /// Inactive filter compiled from pattern strings. Invalid patterns are
    /// skipped with a warning.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(compile(patterns))
    }

    /// Replace the pattern list
    pub fn set_patterns<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        *self.shared.patterns.write() = compile(patterns);
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.shared.patterns.read().len()
    }

    /// Switch the filter on or off
    pub fn set_active(&self, active: bool) {
        self.shared.active.store(active, Ordering::Relaxed);
    }

    /// Whether the filter is on
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Relaxed)
    }

    /// `true` if the filter is on and `message` matches a pattern.
    ///
    /// Must not log: the tracing bridge calls this from inside an event.
    pub fn is_harmless(&self, message: &str) -> bool {
        self.is_active() && self.shared.patterns.read().iter().any(|re| re.is_match(message))
    }
}

impl std::fmt::Debug for HarmlessErrorFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmlessErrorFilter")
            .field("active", &self.is_active())
            .field("patterns", &self.pattern_count())
            .finish()
    }
}

fn compile<I, S>(patterns: I) -> Vec<Regex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .filter_map(|pattern| match Regex::new(pattern.as_ref()) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = pattern.as_ref(), "Skipping invalid harmless-error pattern: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_filter_matches_nothing() {
        let filter = HarmlessErrorFilter::default();
        assert!(!filter.is_harmless("Suboptimal present of frame"));
    }

    #[test]
    fn test_only_matching_messages_are_harmless() {
        let filter = HarmlessErrorFilter::default();
        filter.set_active(true);

        assert!(filter.is_harmless("SUBOPTIMAL present of frame 12"));
        assert!(filter.is_harmless("Failed to start window drag: operation not supported"));
        assert!(!filter.is_harmless("Failed to save preferences: permission denied"));
        assert!(!filter.is_harmless(""));
    }

    #[test]
    fn test_invalid_patterns_are_skipped() {
        let filter = HarmlessErrorFilter::from_patterns(["(unclosed", "ok$"]);
        filter.set_active(true);

        assert_eq!(filter.pattern_count(), 1);
        assert!(filter.is_harmless("all ok"));
    }

    #[test]
    fn test_clones_share_state() {
        let filter = HarmlessErrorFilter::from_patterns(["noise"]);
        let bridge_side = filter.clone();

        filter.set_active(true);
        assert!(bridge_side.is_harmless("some noise"));

        filter.set_patterns(["other"]);
        assert!(!bridge_side.is_harmless("some noise"));
        assert!(bridge_side.is_harmless("other thing"));
    }
}
