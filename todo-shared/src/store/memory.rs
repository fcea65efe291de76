/// In-process todo store
///
/// Keeps todos in insertion order behind a `tokio::sync::RwLock`. Used by the
/// API tests and by `TODO_STORE=memory` for running the server without a
/// database. Contents are lost when the process exits.

use super::{StoreError, StoreResult, TodoStore};
use crate::models::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

/// Todo store held in memory
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos
    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

fn check_text(text: &str) -> StoreResult<()> {
    if text.trim().is_empty() {
        return Err(StoreError::InvalidData("text must not be blank".to_string()));
    }
    Ok(())
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, data: CreateTodo) -> StoreResult<Todo> {
        check_text(&data.text)?;

        let todo = Todo {
            id: TodoId::new(),
            text: data.text,
            completed: false,
            created_at: Utc::now(),
        };

        self.todos.write().await.push(todo.clone());
        debug!(todo_id = %todo.id, "Inserted todo");
        Ok(todo)
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;

        // Newest insert first, so equal timestamps keep that order after the stable sort.
        let mut listed: Vec<Todo> = todos.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(listed)
    }

    async fn find_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn update(&self, id: TodoId, data: UpdateTodo) -> StoreResult<Option<Todo>> {
        if let Some(text) = &data.text {
            check_text(text)?;
        }

        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };

        data.apply_to(todo);
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: TodoId) -> StoreResult<bool> {
        let mut todos = self.todos.write().await;
        match todos.iter().position(|todo| todo.id == id) {
            Some(index) => {
                todos.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(text: &str) -> CreateTodo {
        CreateTodo {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_defaults() {
        let store = MemoryTodoStore::new();
        let todo = store.create(create("Buy milk")).await.unwrap();

        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(store.find_by_id(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_text() {
        let store = MemoryTodoStore::new();
        let result = store.create(create("   ")).await;

        assert!(matches!(result, Err(StoreError::InvalidData(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryTodoStore::new();
        for text in ["first", "second", "third"] {
            store.create(create(text)).await.unwrap();
        }

        let texts: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.text)
            .collect();
        assert_eq!(texts, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_list_equal_timestamps_newest_insert_first() {
        let store = MemoryTodoStore::new();
        let created_at = Utc::now();

        {
            let mut todos = store.todos.write().await;
            for text in ["A", "B", "C"] {
                todos.push(Todo {
                    id: TodoId::new(),
                    text: text.to_string(),
                    completed: false,
                    created_at,
                });
            }
        }

        let texts: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.text)
            .collect();
        assert_eq!(texts, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_update_missing_todo_returns_none() {
        let store = MemoryTodoStore::new();
        let update = UpdateTodo {
            completed: Some(true),
            ..Default::default()
        };

        assert_eq!(store.update(TodoId::new(), update).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let store = MemoryTodoStore::new();
        let todo = store.create(create("Walk the dog")).await.unwrap();

        let updated = store
            .update(
                todo.id,
                UpdateTodo {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.text, "Walk the dog");
        assert_eq!(updated.created_at, todo.created_at);
        assert_eq!(store.find_by_id(todo.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_text() {
        let store = MemoryTodoStore::new();
        let todo = store.create(create("Keep me")).await.unwrap();

        let result = store
            .update(
                todo.id,
                UpdateTodo {
                    text: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::InvalidData(_))));
        assert_eq!(store.find_by_id(todo.id).await.unwrap().unwrap().text, "Keep me");
    }

    #[tokio::test]
    async fn test_delete_removes_once() {
        let store = MemoryTodoStore::new();
        let todo = store.create(create("Throw away")).await.unwrap();

        assert!(store.delete(todo.id).await.unwrap());
        assert!(!store.delete(todo.id).await.unwrap());
        assert_eq!(store.find_by_id(todo.id).await.unwrap(), None);
        assert_eq!(store.len().await, 0);
    }
}
