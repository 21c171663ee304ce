//! Page diagnostics: load-time metrics and fault reporting.
//!
//! Both are log-only. A fault anywhere on the page is recorded and logged,
//! never acted on, so features that still work keep working.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Navigation timing entry as exposed by the host, in milliseconds since the
/// navigation started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationTiming {
    pub fetch_start: f64,
    pub dom_content_loaded_start: f64,
    pub dom_content_loaded_end: f64,
    pub load_event_start: f64,
    pub load_event_end: f64,
}

/// Durations derived from a [`NavigationTiming`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub dom_content_loaded: f64,
    pub load_complete: f64,
    pub total_load_time: f64,
}

impl PerformanceMetrics {
    pub fn from_timing(timing: &NavigationTiming) -> Self {
        Self {
            dom_content_loaded: timing.dom_content_loaded_end - timing.dom_content_loaded_start,
            load_complete: timing.load_event_end - timing.load_event_start,
            total_load_time: timing.load_event_end - timing.fetch_start,
        }
    }
}

/// Compute and log load metrics once the window has loaded. Hosts without
/// navigation timing pass `None` and nothing is reported.
pub fn report_performance(timing: Option<&NavigationTiming>) -> Option<PerformanceMetrics> {
    let metrics = PerformanceMetrics::from_timing(timing?);
    info!(
        dom_content_loaded = metrics.dom_content_loaded,
        load_complete = metrics.load_complete,
        total_load_time = metrics.total_load_time,
        "performance metrics"
    );
    Some(metrics)
}

/// Collects uncaught faults and unhandled rejections.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    faults: usize,
    rejections: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fault(&mut self, message: &str) {
        self.faults += 1;
        error!(message, "uncaught page error");
    }

    pub fn rejection(&mut self, reason: &str) {
        self.rejections += 1;
        error!(reason, "unhandled promise rejection");
    }

    pub fn faults(&self) -> usize {
        self.faults
    }

    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> NavigationTiming {
        NavigationTiming {
            fetch_start: 5.0,
            dom_content_loaded_start: 120.0,
            dom_content_loaded_end: 135.5,
            load_event_start: 410.0,
            load_event_end: 412.0,
        }
    }

    #[test]
    fn metrics_are_differences_of_timing_marks() {
        let metrics = PerformanceMetrics::from_timing(&timing());
        assert_eq!(metrics.dom_content_loaded, 15.5);
        assert_eq!(metrics.load_complete, 2.0);
        assert_eq!(metrics.total_load_time, 407.0);
    }

    #[test]
    fn missing_timing_reports_nothing() {
        assert!(report_performance(None).is_none());
        assert!(report_performance(Some(&timing())).is_some());
    }

    #[test]
    fn reporter_counts_by_kind() {
        let mut reporter = ErrorReporter::new();
        reporter.fault("TypeError: x is undefined");
        reporter.rejection("fetch failed");
        reporter.rejection("timeout");
        assert_eq!(reporter.faults(), 1);
        assert_eq!(reporter.rejections(), 2);
    }
}
