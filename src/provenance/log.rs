//! Running totals across the sessions processed by one invocation.

use chrono::{DateTime, Utc};

/// Counters for a batch of sessions.
#[derive(Debug)]
pub struct RunLog {
    /// Sessions shortened successfully
    sessions_completed: u64,
    /// Sessions that failed
    sessions_failed: u64,
    /// Rows read from source tables
    rows_read: u64,
    /// Rows written to shortened tables
    rows_written: u64,
    /// Batch start time
    started_at: DateTime<Utc>,
}

impl RunLog {
    /// Create a new, empty run log.
    pub fn new() -> Self {
        Self {
            sessions_completed: 0,
            sessions_failed: 0,
            rows_read: 0,
            rows_written: 0,
            started_at: Utc::now(),
        }
    }

    /// Record a successfully shortened session.
    pub fn record_session(&mut self, rows_read: usize, rows_written: usize) {
        self.sessions_completed += 1;
        self.rows_read += rows_read as u64;
        self.rows_written += rows_written as u64;
    }

    /// Record a failed session.
    pub fn record_failure(&mut self) {
        self.sessions_failed += 1;
    }

    pub fn has_failures(&self) -> bool {
        self.sessions_failed > 0
    }

    /// Get the current statistics.
    pub fn stats(&self) -> RunStats {
        RunStats {
            sessions_completed: self.sessions_completed,
            sessions_failed: self.sessions_failed,
            rows_read: self.rows_read,
            rows_written: self.rows_written,
            started_at: self.started_at,
            elapsed_ms: (Utc::now() - self.started_at).num_milliseconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Run Statistics:\n\
             - Sessions shortened: {}\n\
             - Sessions failed: {}\n\
             - Rows read: {}\n\
             - Rows written: {}\n\
             - Elapsed: {} ms",
            stats.sessions_completed,
            stats.sessions_failed,
            stats.rows_read,
            stats.rows_written,
            stats.elapsed_ms
        )
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of run statistics.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub sessions_completed: u64,
    pub sessions_failed: u64,
    pub rows_read: u64,
    pub rows_written: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_counting() {
        let mut log = RunLog::new();

        log.record_session(1000, 1800);
        log.record_session(50, 0);
        log.record_failure();

        let stats = log.stats();
        assert_eq!(stats.sessions_completed, 2);
        assert_eq!(stats.sessions_failed, 1);
        assert_eq!(stats.rows_read, 1050);
        assert_eq!(stats.rows_written, 1800);
        assert!(log.has_failures());
    }

    #[test]
    fn test_summary_format() {
        let log = RunLog::new();
        let summary = log.summary();

        assert!(summary.contains("Sessions shortened: 0"));
        assert!(summary.contains("Rows written"));
        assert!(!log.has_failures());
    }
}
