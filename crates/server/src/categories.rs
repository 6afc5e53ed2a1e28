//! Expense categories API endpoints.

use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::ExpenseCategory;
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(category: ExpenseCategory) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(engine::CategoryNew {
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    Ok(Json(view(state.engine.category(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories().await?;
    Ok(Json(categories.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let cmd = engine::CategoryUpdate {
        name: payload.name,
        description: payload.description,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(state.engine.update_category(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
