//! Task CRUD operations.

use super::Database;
use crate::types::{SortOrder, Task, TaskInput, TaskStatus};
use anyhow::Result;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};

const TASK_COLUMNS: &str = "id, titulo, data_prevista, status";

/// Build the ORDER BY clause for listing.
///
/// Pending tasks always come first regardless of the requested direction.
fn build_order_clause(order: SortOrder) -> String {
    format!(
        "CASE status WHEN 'pendente' THEN 0 ELSE 1 END, data_prevista {}, id ASC",
        order.as_sql()
    )
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let status: String = row.get("status")?;
    let status = status.parse::<TaskStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
    })?;

    Ok(Task {
        id: row.get("id")?,
        titulo: row.get("titulo")?,
        data_prevista: row.get("data_prevista")?,
        status,
    })
}

impl Database {
    /// Insert a new pending task and return its id.
    ///
    /// Fields go to the store as given; missing values become NULL and are
    /// rejected by the table constraints.
    pub fn create_task(&self, input: &TaskInput) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tarefas (titulo, data_prevista, status) VALUES (?1, ?2, 'pendente')",
                params![input.titulo, input.data_prevista],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// List every task, pending first, then by due date in `order`.
    pub fn list_tasks(&self, order: SortOrder) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM tarefas ORDER BY {}",
                TASK_COLUMNS,
                build_order_clause(order)
            );
            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
    }

    /// Get a single task by id.
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM tarefas WHERE id = ?1", TASK_COLUMNS);
            let task = conn
                .query_row(&sql, params![id], parse_task_row)
                .optional()?;
            Ok(task)
        })
    }

    /// Overwrite title and due date. Status is left alone.
    ///
    /// Returns the number of rows touched (0 when the id does not exist).
    pub fn update_task(&self, id: i64, titulo: &str, data_prevista: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tarefas SET titulo = ?1, data_prevista = ?2 WHERE id = ?3",
                params![titulo, data_prevista, id],
            )?;
            Ok(changed)
        })
    }

    /// Mark a task as completed. Idempotent.
    pub fn complete_task(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tarefas SET status = 'concluida' WHERE id = ?1",
                params![id],
            )?;
            Ok(changed)
        })
    }

    /// Delete a task. Deleting a missing id is not an error.
    pub fn delete_task(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tarefas WHERE id = ?1", params![id])?;
            Ok(changed)
        })
    }
}
