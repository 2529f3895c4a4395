use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{CreateTodoQuery, IdQuery, MessageResponse, UpdateTodoRequest},
    middleware::CurrentUser,
    models::{NewTodo, Todo},
    AppState,
};

async fn find_owned_todo(state: &AppState, id: i64, user_id: i64) -> Result<Todo, AppError> {
    state
        .todos
        .find_by_id_and_user(id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Todo", id))
}

pub async fn list_all_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.find_all().await?))
}

pub async fn list_todos(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.find_all_by_user(current_user.user.id).await?))
}

pub async fn get_todo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        find_owned_todo(&state, query.id, current_user.user.id).await?,
    ))
}

pub async fn create_todo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<CreateTodoQuery>,
) -> Result<Json<Todo>, AppError> {
    let saved = state
        .todos
        .save(NewTodo {
            user_id: current_user.user.id,
            title: query.title,
            details: query.details,
            done: query.done,
        })
        .await?;

    tracing::info!(todo_id = saved.id, user_id = saved.user_id, "Todo created");
    Ok(Json(saved))
}

pub async fn update_todo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let mut todo = find_owned_todo(&state, query.id, current_user.user.id).await?;
    todo.title = request.title;
    todo.details = request.details;
    todo.done = request.done;

    Ok(Json(state.todos.update(&todo).await?))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let todo = find_owned_todo(&state, query.id, current_user.user.id).await?;
    state.todos.delete(&todo).await?;

    Ok(Json(MessageResponse::new(format!(
        "Todo with id {} deleted",
        todo.id
    ))))
}
