//! Nomenclature API endpoints.

use api_types::nomenclature::{
    NomenclatureListQuery, NomenclatureNew, NomenclatureUpdate, NomenclatureView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::NomenclatureItem;
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(item: NomenclatureItem) -> NomenclatureView {
    NomenclatureView {
        id: item.id,
        name: item.name,
        unit: item.unit,
        category_id: item.category_id,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<NomenclatureNew>,
) -> Result<(StatusCode, Json<NomenclatureView>), ServerError> {
    let item = state
        .engine
        .create_nomenclature(engine::NomenclatureNew {
            name: payload.name,
            unit: payload.unit,
            category_id: payload.category_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(item))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NomenclatureView>, ServerError> {
    Ok(Json(view(state.engine.nomenclature_item(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<NomenclatureListQuery>,
) -> Result<Json<Vec<NomenclatureView>>, ServerError> {
    let items = state.engine.list_nomenclature(query.category_id).await?;
    Ok(Json(items.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NomenclatureUpdate>,
) -> Result<Json<NomenclatureView>, ServerError> {
    let cmd = engine::NomenclatureUpdate {
        name: payload.name,
        unit: payload.unit,
        category_id: payload.category_id,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(state.engine.update_nomenclature(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_nomenclature(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
