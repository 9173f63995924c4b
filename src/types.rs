//! Core types for the task tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query value that selects descending due-date order.
pub const ORDER_BY_DATE_DESC: &str = "data-desc";

/// Completion status of a task.
///
/// Tasks start as `Pendente` and may only move to `Concluida`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pendente,
    Concluida,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pendente => "pendente",
            TaskStatus::Concluida => "concluida",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(TaskStatus::Pendente),
            "concluida" => Ok(TaskStatus::Concluida),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub titulo: String,
    /// Due date, date-only. Serialized as `YYYY-MM-DD`.
    pub data_prevista: NaiveDate,
    pub status: TaskStatus,
}

/// Requested direction for the due-date sort key.
///
/// Status always sorts first (pending before completed); this only
/// controls the secondary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateAsc,
    DateDesc,
}

impl SortOrder {
    /// Parse the `orderBy` query value. Anything but `data-desc` is ascending.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(ORDER_BY_DATE_DESC) => SortOrder::DateDesc,
            _ => SortOrder::DateAsc,
        }
    }

    /// SQL direction keyword. Only ever one of two fixed strings.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::DateAsc => "ASC",
            SortOrder::DateDesc => "DESC",
        }
    }
}

/// Body of create and update requests.
///
/// Both fields are optional at the wire level: create passes them through to
/// the store untouched, update rejects missing or empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub data_prevista: Option<String>,
}

impl TaskInput {
    pub fn new(titulo: impl Into<String>, data_prevista: impl Into<String>) -> Self {
        Self {
            titulo: Some(titulo.into()),
            data_prevista: Some(data_prevista.into()),
        }
    }

    /// Return both fields if present and non-empty.
    pub fn require_fields(&self) -> Option<(&str, &str)> {
        let titulo = self.titulo.as_deref().filter(|t| !t.is_empty())?;
        let data_prevista = self.data_prevista.as_deref().filter(|d| !d.is_empty())?;
        Some((titulo, data_prevista))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_defaults_to_ascending() {
        assert_eq!(SortOrder::from_query(None), SortOrder::DateAsc);
        assert_eq!(SortOrder::from_query(Some("data-asc")), SortOrder::DateAsc);
        assert_eq!(SortOrder::from_query(Some("DATA-DESC")), SortOrder::DateAsc);
        assert_eq!(SortOrder::from_query(Some("")), SortOrder::DateAsc);
    }

    #[test]
    fn sort_order_descending_only_for_exact_value() {
        assert_eq!(SortOrder::from_query(Some("data-desc")), SortOrder::DateDesc);
        assert_eq!(SortOrder::DateDesc.as_sql(), "DESC");
        assert_eq!(SortOrder::DateAsc.as_sql(), "ASC");
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [TaskStatus::Pendente, TaskStatus::Concluida] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn task_serializes_with_wire_names() {
        let task = Task {
            id: 7,
            titulo: "Buy milk".to_string(),
            data_prevista: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status: TaskStatus::Pendente,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "titulo": "Buy milk",
                "data_prevista": "2024-01-10",
                "status": "pendente"
            })
        );
    }

    #[test]
    fn require_fields_rejects_missing_or_empty() {
        assert!(TaskInput::default().require_fields().is_none());
        assert!(TaskInput::new("", "2024-01-10").require_fields().is_none());
        assert!(TaskInput::new("Buy milk", "").require_fields().is_none());
        assert_eq!(
            TaskInput::new("Buy milk", "2024-01-10").require_fields(),
            Some(("Buy milk", "2024-01-10"))
        );
    }

    #[test]
    fn task_input_accepts_partial_json() {
        let input: TaskInput = serde_json::from_str(r#"{"titulo":"x"}"#).unwrap();
        assert_eq!(input.titulo.as_deref(), Some("x"));
        assert!(input.data_prevista.is_none());
    }
}
