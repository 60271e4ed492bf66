//! Bounded, de-duplicating buffer of validation warnings.
use std::fmt;

use arrayvec::ArrayVec;

use crate::config::RulesConfig;
use crate::ids::ItemId;

/// One validation or callback failure observed during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub item: Option<ItemId>,
    pub key: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            item: None,
            key: None,
            message: message.into(),
        }
    }

    /// Diagnostic attributed to a rule element on `item`.
    pub fn for_rule(item: &ItemId, key: &str, message: impl Into<String>) -> Self {
        Self {
            item: Some(item.clone()),
            key: Some(key.to_owned()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.key, &self.item) {
            (Some(key), Some(item)) => write!(f, "{key} rule element on item {item}: {}", self.message),
            (None, Some(item)) => write!(f, "item {item}: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Diagnostics drained by [`DiagnosticSink::flush`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Distinct diagnostics discarded because the sink was full.
    pub dropped: usize,
}

impl DiagnosticReport {
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty() && self.dropped == 0
    }
}

/// Collects diagnostics for one pass, collapsing duplicates.
///
/// Callers flush once at the pass boundary.
#[derive(Clone, Debug)]
pub struct DiagnosticSink {
    entries: ArrayVec<Diagnostic, { RulesConfig::MAX_DIAGNOSTICS }>,
    capacity: usize,
    dropped: usize,
}

impl DiagnosticSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: ArrayVec::new(),
            capacity: capacity.clamp(1, RulesConfig::MAX_DIAGNOSTICS),
            dropped: 0,
        }
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(config.diagnostic_capacity())
    }

    /// Records `diagnostic` unless an identical one is pending.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if self.entries.contains(&diagnostic) {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.dropped += 1;
            return;
        }
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.dropped == 0
    }

    /// Drains pending diagnostics.
    pub fn flush(&mut self) -> DiagnosticReport {
        let report = DiagnosticReport {
            diagnostics: self.entries.drain(..).collect(),
            dropped: self.dropped,
        };
        self.dropped = 0;
        report
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new(RulesConfig::DEFAULT_DIAGNOSTIC_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let mut sink = DiagnosticSink::default();
        let item = ItemId::new("i1");
        sink.report(Diagnostic::for_rule(&item, "RollOption", "bad domain"));
        sink.report(Diagnostic::for_rule(&item, "RollOption", "bad domain"));
        sink.report(Diagnostic::for_rule(&item, "RollOption", "bad option"));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn overflow_is_counted_not_stored() {
        let mut sink = DiagnosticSink::new(2);
        for n in 0..5 {
            sink.report(Diagnostic::new(format!("warning {n}")));
        }
        let report = sink.flush();
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.dropped, 3);
    }

    #[test]
    fn flush_empties_the_sink() {
        let mut sink = DiagnosticSink::default();
        sink.report(Diagnostic::new("once"));
        assert!(!sink.flush().is_empty());
        assert!(sink.is_empty());
        assert!(sink.flush().is_empty());
    }
}
