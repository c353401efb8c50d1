//! Rencana Kinerja API Handlers

use axum::extract::State;
use kinerja_core::dto::rencana_kinerja::{
    FindByIdRekinsRequest, RekinAtasanResponse, RencanaKinerjaCloneRequest, RencanaKinerjaFilter,
    RencanaKinerjaRequest, RencanaKinerjaResponse,
};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::response::{self, ApiMessage, ApiResponse};
use crate::service::rencana_kinerja_service;

/// POST /rencana_kinerja/create
pub async fn create_rekin(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<RencanaKinerjaRequest>,
) -> ApiResponse<RencanaKinerjaResponse> {
    tracing::info!(
        "Creating rencana kinerja for pokin {} ({})",
        req.id_pohon,
        req.pegawai_id
    );

    let rekin = rencana_kinerja_service::create(&pool, req).await?;
    response::created("Success Create Rencana Kinerja", rekin)
}

/// PUT /rencana_kinerja/update/{id}
pub async fn update_rekin(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<RencanaKinerjaRequest>,
) -> ApiResponse<RencanaKinerjaResponse> {
    tracing::info!("Updating rencana kinerja: {}", id);

    let rekin = rencana_kinerja_service::update(&pool, &id, req).await?;
    response::ok("Success Update Rencana Kinerja", rekin)
}

/// DELETE /rencana_kinerja/delete/{id}
pub async fn delete_rekin(State(pool): State<PgPool>, ApiPath(id): ApiPath<String>) -> ApiMessage {
    tracing::info!("Deleting rencana kinerja: {}", id);

    rencana_kinerja_service::delete(&pool, &id).await?;
    response::message("Success Delete Rencana Kinerja")
}

/// GET /rencana_kinerja/detail/{id}
pub async fn get_rekin(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<RencanaKinerjaResponse> {
    let rekin = rencana_kinerja_service::find_by_id(&pool, &id).await?;
    response::ok("Success Get Rencana Kinerja", rekin)
}

/// GET /rencana_kinerja/findall?pegawai_id=&kode_opd=&tahun=
pub async fn list_rekin(
    State(pool): State<PgPool>,
    ApiQuery(filter): ApiQuery<RencanaKinerjaFilter>,
) -> ApiResponse<Vec<RencanaKinerjaResponse>> {
    tracing::debug!("Listing rencana kinerja: {:?}", filter);

    let items = rencana_kinerja_service::find_all(&pool, &filter).await?;
    response::ok("Success Get All Rencana Kinerja", items)
}

/// POST /rencana_kinerja/find_by_ids
pub async fn find_rekin_by_ids(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<FindByIdRekinsRequest>,
) -> ApiResponse<Vec<RencanaKinerjaResponse>> {
    tracing::debug!("Getting {} rencana kinerja by id", req.id_rekins.len());

    let items = rencana_kinerja_service::find_by_ids(&pool, &req).await?;
    response::ok("Success Get Rencana Kinerja", items)
}

/// POST /rencana_kinerja/clone/{id}
pub async fn clone_rekin(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<RencanaKinerjaCloneRequest>,
) -> ApiResponse<RencanaKinerjaResponse> {
    tracing::info!("Cloning rencana kinerja {} into {}", id, req.tahun);

    let rekin = rencana_kinerja_service::clone(&pool, &id, req).await?;
    response::created("Success Clone Rencana Kinerja", rekin)
}

/// GET /rekin/atasan/{rekin_id} (public)
pub async fn get_rekin_atasan(
    State(pool): State<PgPool>,
    ApiPath(rekin_id): ApiPath<String>,
) -> ApiResponse<RekinAtasanResponse> {
    let atasan = rencana_kinerja_service::find_rekin_atasan(&pool, &rekin_id).await?;
    response::ok("Success Get Rekin Atasan", atasan)
}
