use super::{AppError, AppResult};
use crate::domain::Task;
use crate::ports::EventLog;
use chrono::{DateTime, Local, Utc};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const SEPARATOR: &str = "--------------------------------------------------";

/// Open tasks split around a point in time. Done tasks are in neither list.
#[derive(Debug, Default)]
pub struct TaskReport<'a> {
    pub overdue: Vec<&'a Task>,
    pub upcoming: Vec<&'a Task>,
}

pub struct ReportGenerator {
    event_log: Arc<dyn EventLog>,
}

impl ReportGenerator {
    pub fn new(event_log: Arc<dyn EventLog>) -> Self {
        Self { event_log }
    }

    pub fn partition(tasks: &[Task], now: DateTime<Utc>) -> TaskReport<'_> {
        let mut report = TaskReport::default();
        for task in tasks {
            if task.is_overdue_at(now) {
                report.overdue.push(task);
            } else if task.is_upcoming_at(now) {
                report.upcoming.push(task);
            }
        }
        report
    }

    pub fn render(report: &TaskReport<'_>, generated_at: DateTime<Local>) -> String {
        let mut lines = vec![
            "Task Report".to_string(),
            format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            SEPARATOR.to_string(),
        ];
        push_section(&mut lines, "OVERDUE TASKS:", &report.overdue);
        lines.push(SEPARATOR.to_string());
        push_section(&mut lines, "UPCOMING TASKS:", &report.upcoming);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the overdue/upcoming report for `tasks` to `path`.
    ///
    /// A failed write is returned to the caller. Logging the export is
    /// best-effort like every other event.
    pub fn export_report(&self, tasks: &[Task], path: &Path) -> AppResult<()> {
        let now = Utc::now();
        let report = Self::partition(tasks, now);
        tracing::debug!(
            "Report: {} overdue, {} upcoming",
            report.overdue.len(),
            report.upcoming.len()
        );

        let content = Self::render(&report, now.with_timezone(&Local));
        fs::write(path, content).map_err(|source| AppError::Report {
            path: path.to_path_buf(),
            source,
        })?;

        if let Err(e) = self.event_log.log("Report exported.") {
            tracing::warn!("{}", e);
        }
        Ok(())
    }
}

fn push_section(lines: &mut Vec<String>, heading: &str, tasks: &[&Task]) {
    lines.push(heading.to_string());
    if tasks.is_empty() {
        lines.push("None.".to_string());
    }
    lines.extend(tasks.iter().map(|task| task.to_string()));
}
