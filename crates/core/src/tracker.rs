//! Change detection for the most recent homework
//!
//! The homework API is assumed to list the most recent submission first.
//! The list is never sorted here: the upstream ordering rules are not
//! documented, so the first element is taken as-is.

use serde_json::Value;

use crate::error::CoreError;
use crate::status::parse_homework;

/// The last state a notification was sent for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub homework_name: String,
    pub message: String,
}

/// Decide whether the newest homework needs a notification
///
/// Returns `Ok(None)` when the list is empty or when the first homework renders
/// to exactly the report in `previous`. Otherwise returns the candidate report
/// that should replace `previous` once the notification went out.
pub fn should_notify(
    homeworks: &[Value],
    previous: Option<&Report>,
) -> Result<Option<Report>, CoreError> {
    let Some(latest) = homeworks.first() else {
        return Ok(None);
    };

    let parsed = parse_homework(latest)?;
    let candidate = Report {
        message: parsed.message(),
        homework_name: parsed.name,
    };

    if previous == Some(&candidate) {
        Ok(None)
    } else {
        Ok(Some(candidate))
    }
}

/// Owns the last notified [`Report`]
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    last: Option<Report>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Report> {
        self.last.as_ref()
    }

    pub fn check(&self, homeworks: &[Value]) -> Result<Option<Report>, CoreError> {
        should_notify(homeworks, self.last.as_ref())
    }

    /// Replace the remembered report. Call only after the notification was attempted.
    pub fn commit(&mut self, report: Report) {
        self.last = Some(report);
    }
}
