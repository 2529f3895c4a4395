use crate::models::{NewTodo, Todo};
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::instrument;

use super::lock;

const TODO_COLUMNS: &str = "id, user_id, title, details, done";

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Todo>, AppError>;
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<Todo>, AppError>;
    async fn find_by_id_and_user(&self, id: i64, user_id: i64) -> Result<Option<Todo>, AppError>;
    async fn save(&self, todo: NewTodo) -> Result<Todo, AppError>;
    async fn update(&self, todo: &Todo) -> Result<Todo, AppError>;
    async fn delete(&self, todo: &Todo) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    #[instrument(skip(self))]
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(todos)
    }

    #[instrument(skip(self))]
    async fn find_by_id_and_user(&self, id: i64, user_id: i64) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    #[instrument(skip(self, todo), fields(user_id = todo.user_id))]
    async fn save(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let saved = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (user_id, title, details, done) VALUES ($1, $2, $3, $4) RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo.user_id)
        .bind(&todo.title)
        .bind(&todo.details)
        .bind(todo.done)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    #[instrument(skip(self, todo), fields(todo_id = todo.id))]
    async fn update(&self, todo: &Todo) -> Result<Todo, AppError> {
        let updated = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET title = $2, details = $3, done = $4 WHERE id = $1 RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.details)
        .bind(todo.done)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    #[instrument(skip(self, todo), fields(todo_id = todo.id))]
    async fn delete(&self, todo: &Todo) -> Result<(), AppError> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(todo.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTodoRepository {
    todos: Mutex<Vec<Todo>>,
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todo(self, todo: Todo) -> Self {
        if let Ok(mut todos) = self.todos.lock() {
            todos.push(todo);
        }
        self
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        Ok(lock(&self.todos, "todos")?.clone())
    }

    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<Todo>, AppError> {
        Ok(lock(&self.todos, "todos")?
            .iter()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id_and_user(&self, id: i64, user_id: i64) -> Result<Option<Todo>, AppError> {
        Ok(lock(&self.todos, "todos")?
            .iter()
            .find(|todo| todo.id == id && todo.user_id == user_id)
            .cloned())
    }

    async fn save(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let mut todos = lock(&self.todos, "todos")?;
        let saved = Todo {
            id: todos.iter().map(|t| t.id).max().unwrap_or(0) + 1,
            user_id: todo.user_id,
            title: todo.title,
            details: todo.details,
            done: todo.done,
        };
        todos.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, AppError> {
        let mut todos = lock(&self.todos, "todos")?;
        let existing = todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or_else(|| AppError::not_found("Todo", todo.id))?;
        *existing = todo.clone();
        Ok(todo.clone())
    }

    async fn delete(&self, todo: &Todo) -> Result<(), AppError> {
        lock(&self.todos, "todos")?.retain(|t| t.id != todo.id);
        Ok(())
    }
}
