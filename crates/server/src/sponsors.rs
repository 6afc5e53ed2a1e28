//! Sponsors API endpoints.

use api_types::sponsor::{SponsorNew, SponsorUpdate, SponsorView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Sponsor;
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(sponsor: Sponsor) -> SponsorView {
    SponsorView {
        id: sponsor.id,
        name: sponsor.name,
        contact: sponsor.contact,
        note: sponsor.note,
        created_at: sponsor.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SponsorNew>,
) -> Result<(StatusCode, Json<SponsorView>), ServerError> {
    let sponsor = state
        .engine
        .create_sponsor(engine::SponsorNew {
            name: payload.name,
            contact: payload.contact,
            note: payload.note,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(sponsor))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SponsorView>, ServerError> {
    Ok(Json(view(state.engine.sponsor(id).await?)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<SponsorView>>, ServerError> {
    let sponsors = state.engine.list_sponsors().await?;
    Ok(Json(sponsors.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SponsorUpdate>,
) -> Result<Json<SponsorView>, ServerError> {
    let cmd = engine::SponsorUpdate {
        name: payload.name,
        contact: payload.contact,
        note: payload.note,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(state.engine.update_sponsor(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_sponsor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
