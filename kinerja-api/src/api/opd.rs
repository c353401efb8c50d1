//! OPD API Handlers

use axum::extract::State;
use kinerja_core::dto::opd::{OpdCreateRequest, OpdResponse, OpdUpdateRequest};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::response::{self, ApiMessage, ApiResponse};
use crate::service::opd_service;

/// POST /opd/create
pub async fn create_opd(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<OpdCreateRequest>,
) -> ApiResponse<OpdResponse> {
    tracing::info!("Creating opd: {}", req.kode_opd);

    let opd = opd_service::create(&pool, req).await?;
    response::created("Success Create Opd", opd)
}

/// PUT /opd/update/{kode_opd}
pub async fn update_opd(
    State(pool): State<PgPool>,
    ApiPath(kode_opd): ApiPath<String>,
    ApiJson(req): ApiJson<OpdUpdateRequest>,
) -> ApiResponse<OpdResponse> {
    tracing::info!("Updating opd: {}", kode_opd);

    let opd = opd_service::update(&pool, &kode_opd, req).await?;
    response::ok("Success Update Opd", opd)
}

/// DELETE /opd/delete/{kode_opd}
pub async fn delete_opd(
    State(pool): State<PgPool>,
    ApiPath(kode_opd): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting opd: {}", kode_opd);

    opd_service::delete(&pool, &kode_opd).await?;
    response::message("Success Delete Opd")
}

/// GET /opd/detail/{kode_opd}
pub async fn get_opd(
    State(pool): State<PgPool>,
    ApiPath(kode_opd): ApiPath<String>,
) -> ApiResponse<OpdResponse> {
    tracing::debug!("Getting opd: {}", kode_opd);

    let opd = opd_service::find_by_kode(&pool, &kode_opd).await?;
    response::ok("Success Get Opd", opd)
}

/// GET /opd/findall
pub async fn list_opd(State(pool): State<PgPool>) -> ApiResponse<Vec<OpdResponse>> {
    tracing::debug!("Listing opd");

    let items = opd_service::find_all(&pool).await?;
    response::ok("Success Get All Opd", items)
}
