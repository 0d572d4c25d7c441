//! To-Do List Repository
//!
//! CRUD for lists and their items, always scoped to the owning account.
//! A row that exists but belongs to someone else surfaces as NotFound,
//! so ids cannot be probed across accounts.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{ItemStatus, TodoItem, TodoList};

pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists owned by the account, newest first.
    pub async fn lists(&self, owner_id: &str) -> Result<Vec<TodoList>> {
        let rows: Vec<(String, String, String, String)> = sqlx::query_as(
            "SELECT id, title, status, created_at FROM lists
             WHERE owner_id = ?
             ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, status, created_at)| TodoList {
                id,
                title,
                status: ItemStatus::parse(&status),
                owner_id: owner_id.to_string(),
                created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
            })
            .collect())
    }

    pub async fn create_list(&self, owner_id: &str, title: &str) -> Result<TodoList> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("list title must not be empty".to_string()));
        }

        let list = TodoList::new(owner_id, title);

        sqlx::query(
            "INSERT INTO lists (id, title, status, owner_id, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&list.id)
        .bind(&list.title)
        .bind(list.status.as_str())
        .bind(&list.owner_id)
        .bind(list.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("[Store] List created: {} ({})", list.title, list.id);

        Ok(list)
    }

    /// Title-only edit.
    pub async fn update_list(&self, owner_id: &str, list_id: &str, title: &str) -> Result<TodoList> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("list title must not be empty".to_string()));
        }

        let updated = sqlx::query("UPDATE lists SET title = ? WHERE id = ? AND owner_id = ?")
            .bind(title)
            .bind(list_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("list"));
        }

        self.get_list(owner_id, list_id).await
    }

    /// Cascade: child items first, then the list itself. A list with no
    /// items cascades as a no-op success.
    pub async fn delete_list(&self, owner_id: &str, list_id: &str) -> Result<()> {
        self.ensure_list(owner_id, list_id).await?;

        sqlx::query("DELETE FROM items WHERE list_id = ?")
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        info!("[Store] List deleted: {}", list_id);

        Ok(())
    }

    /// Items of one list, newest first.
    pub async fn items(&self, owner_id: &str, list_id: &str) -> Result<Vec<TodoItem>> {
        self.ensure_list(owner_id, list_id).await?;

        let rows: Vec<(String, String, String, String)> = sqlx::query_as(
            "SELECT id, description, status, created_at FROM items
             WHERE list_id = ?
             ORDER BY created_at DESC",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, description, status, created_at)| TodoItem {
                id,
                list_id: list_id.to_string(),
                description,
                status: ItemStatus::parse(&status),
                created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
            })
            .collect())
    }

    pub async fn create_item(
        &self,
        owner_id: &str,
        list_id: &str,
        description: &str,
    ) -> Result<TodoItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation(
                "item description must not be empty".to_string(),
            ));
        }

        self.ensure_list(owner_id, list_id).await?;

        let item = TodoItem::new(list_id, description);

        sqlx::query(
            "INSERT INTO items (id, list_id, description, status, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.list_id)
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("[Store] Item added to list {}: {}", list_id, item.id);

        Ok(item)
    }

    /// Description-only edit, scoped through the owning list.
    pub async fn update_item(
        &self,
        owner_id: &str,
        item_id: &str,
        description: &str,
    ) -> Result<TodoItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Validation(
                "item description must not be empty".to_string(),
            ));
        }

        let updated = sqlx::query(
            "UPDATE items SET description = ?
             WHERE id = ? AND list_id IN (SELECT id FROM lists WHERE owner_id = ?)",
        )
        .bind(description)
        .bind(item_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("item"));
        }

        let (id, list_id, description, status, created_at): (
            String,
            String,
            String,
            String,
            String,
        ) = sqlx::query_as(
            "SELECT id, list_id, description, status, created_at FROM items WHERE id = ?",
        )
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(TodoItem {
            id,
            list_id,
            description,
            status: ItemStatus::parse(&status),
            created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
        })
    }

    /// Repeat delete is an error, not a no-op.
    pub async fn delete_item(&self, owner_id: &str, item_id: &str) -> Result<()> {
        let deleted = sqlx::query(
            "DELETE FROM items
             WHERE id = ? AND list_id IN (SELECT id FROM lists WHERE owner_id = ?)",
        )
        .bind(item_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(Error::NotFound("item"));
        }

        info!("[Store] Item deleted: {}", item_id);

        Ok(())
    }

    async fn get_list(&self, owner_id: &str, list_id: &str) -> Result<TodoList> {
        let row: Option<(String, String, String)> = sqlx::query_as(
            "SELECT title, status, created_at FROM lists WHERE id = ? AND owner_id = ?",
        )
        .bind(list_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        let (title, status, created_at) = row.ok_or(Error::NotFound("list"))?;

        Ok(TodoList {
            id: list_id.to_string(),
            title,
            status: ItemStatus::parse(&status),
            owner_id: owner_id.to_string(),
            created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
        })
    }

    async fn ensure_list(&self, owner_id: &str, list_id: &str) -> Result<()> {
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM lists WHERE id = ? AND owner_id = ?")
                .bind(list_id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?;

        existing.map(|_| ()).ok_or(Error::NotFound("list"))
    }
}
