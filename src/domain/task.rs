use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        TaskId(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "low" => Ok(Priority::Low),
            "1" | "medium" => Ok(Priority::Medium),
            "2" | "high" => Ok(Priority::High),
            other => Err(DomainError::InvalidValue(format!("unknown priority '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::ToDo => "ToDo",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Done => "Done",
        };
        f.write_str(name)
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "todo" | "to-do" => Ok(TaskStatus::ToDo),
            "1" | "inprogress" | "in-progress" => Ok(TaskStatus::InProgress),
            "2" | "done" => Ok(TaskStatus::Done),
            other => Err(DomainError::InvalidValue(format!("unknown status '{other}'"))),
        }
    }
}

/// Concrete task variant. Serialized as a `"kind"` tag next to the
/// common task fields so mixed variants can share one data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TaskKind {
    #[serde(rename = "development")]
    Development {
        #[serde(rename = "codeReviewer", default)]
        code_reviewer: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    status: TaskStatus,
    pub assignee: String,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    /// Build a development task in the `ToDo` state.
    ///
    /// `title` and `assignee` must contain something other than whitespace.
    pub fn development(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
        priority: Priority,
        assignee: impl Into<String>,
        code_reviewer: impl Into<String>,
    ) -> DomainResult<Self> {
        let title = title.into();
        let assignee = assignee.into();

        if title.trim().is_empty() {
            return Err(DomainError::MissingField("title".to_string()));
        }
        if assignee.trim().is_empty() {
            return Err(DomainError::MissingField("assignee".to_string()));
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            due_date,
            priority,
            status: TaskStatus::ToDo,
            assignee,
            kind: TaskKind::Development {
                code_reviewer: code_reviewer.into(),
            },
        })
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Only the task store changes status, so it can persist and audit it.
    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub fn code_reviewer(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Development { code_reviewer } if !code_reviewer.is_empty() => {
                Some(code_reviewer)
            }
            TaskKind::Development { .. } => None,
        }
    }

    /// Natural ordering: due date ascending, nothing else.
    pub fn cmp_by_due_date(&self, other: &Self) -> Ordering {
        self.due_date.cmp(&other.due_date)
    }

    /// Case-insensitive exact match on the assignee name.
    pub fn is_assigned_to(&self, name: &str) -> bool {
        self.assignee.to_lowercase() == name.to_lowercase()
    }

    /// Business rule: open work past its due date
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date < now
    }

    /// Business rule: open work not yet due
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date >= now
    }

    pub fn due_date_display(&self) -> String {
        self.due_date
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} (Due: {}, Pri: {})",
            self.id,
            self.title,
            self.status,
            self.due_date_display(),
            self.priority
        )?;
        if let Some(reviewer) = self.code_reviewer() {
            write!(f, " [Reviewer: {reviewer}]")?;
        }
        Ok(())
    }
}

/// Parse a due date typed by a user.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM` and `YYYY-MM-DD`. Values without an
/// offset are read as local time; a bare date means local midnight.
pub fn parse_due_date(input: &str) -> DomainResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|_| DomainError::InvalidDate(input.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| DomainError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(reviewer: &str) -> Task {
        Task::development(
            TaskId(7),
            "Ship parser",
            "Finish the tokenizer",
            parse_due_date("2026-03-01").unwrap(),
            Priority::High,
            "Alice",
            reviewer,
        )
        .unwrap()
    }

    #[test]
    fn test_new_task_starts_in_todo() {
        assert_eq!(sample("").status(), TaskStatus::ToDo);
    }

    #[test]
    fn test_blank_title_and_assignee_are_rejected() {
        let due = Utc::now();
        let err = Task::development(TaskId(1), "  ", "", due, Priority::Low, "Bob", "")
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingField(field) if field == "title"));

        let err = Task::development(TaskId(1), "Title", "", due, Priority::Low, "", "")
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingField(field) if field == "assignee"));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn test_display_summary_line() {
        assert_eq!(
            sample("").to_string(),
            "[7] Ship parser - ToDo (Due: 2026-03-01, Pri: High)"
        );
        assert_eq!(
            sample("Carol").to_string(),
            "[7] Ship parser - ToDo (Due: 2026-03-01, Pri: High) [Reviewer: Carol]"
        );
    }

    #[test]
    fn test_json_carries_kind_tag() {
        let value = serde_json::to_value(sample("Carol")).unwrap();
        assert_eq!(value["kind"], "development");
        assert_eq!(value["codeReviewer"], "Carol");
        assert_eq!(value["status"], "ToDo");
        assert_eq!(value["priority"], "High");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_missing_reviewer_defaults_to_empty() {
        let json = r#"{
            "id": 3,
            "title": "Review",
            "dueDate": "2026-01-02T10:00:00Z",
            "priority": "Low",
            "status": "InProgress",
            "assignee": "Dana",
            "kind": "development"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.description, "");
        assert_eq!(
            task.kind,
            TaskKind::Development {
                code_reviewer: String::new()
            }
        );
        assert_eq!(task.code_reviewer(), None);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"id":1,"title":"x","dueDate":"2026-01-02T10:00:00Z",
            "priority":"Low","status":"ToDo","assignee":"a","kind":"meeting"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_assignee_match_is_case_insensitive_and_exact() {
        let task = sample("");
        assert!(task.is_assigned_to("alice"));
        assert!(task.is_assigned_to("ALICE"));
        assert!(!task.is_assigned_to("alice2"));
        assert!(!task.is_assigned_to("ali"));
    }

    #[test]
    fn test_overdue_and_upcoming_exclude_done() {
        let now = Utc::now();
        let mut task = sample("");
        task.due_date = now - Duration::days(1);
        assert!(task.is_overdue_at(now));
        assert!(!task.is_upcoming_at(now));

        task.due_date = now;
        assert!(!task.is_overdue_at(now));
        assert!(task.is_upcoming_at(now));

        task.set_status(TaskStatus::Done);
        assert!(!task.is_overdue_at(now));
        assert!(!task.is_upcoming_at(now));
    }

    #[test]
    fn test_parse_due_date_formats() {
        let rfc = parse_due_date("2026-05-04T12:30:00Z").unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2026, 5, 4, 12, 30, 0).unwrap());

        let date_only = parse_due_date("2026-05-04").unwrap();
        assert_eq!(
            date_only.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            "2026-05-04 00:00"
        );

        let with_time = parse_due_date("2026-05-04 17:45").unwrap();
        assert_eq!(
            with_time.with_timezone(&Local).format("%H:%M").to_string(),
            "17:45"
        );

        assert!(matches!(
            parse_due_date("next tuesday"),
            Err(DomainError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("1".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(
            "in-progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("urgent".parse::<Priority>().is_err());
    }
}
