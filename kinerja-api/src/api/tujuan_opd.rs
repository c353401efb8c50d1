//! Tujuan OPD and Periode API Handlers

use axum::extract::State;
use kinerja_core::dto::tujuan_opd::{
    PeriodeRequest, PeriodeResponse, TujuanOpdFilter, TujuanOpdRequest, TujuanOpdResponse,
};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::response::{self, ApiMessage, ApiResponse, parse_id};
use crate::service::tujuan_opd_service;

/// POST /periode/create
pub async fn create_periode(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PeriodeRequest>,
) -> ApiResponse<PeriodeResponse> {
    let periode = tujuan_opd_service::create_periode(&pool, req).await?;
    response::created("Success Create Periode", periode)
}

/// GET /periode/findall
pub async fn list_periode(State(pool): State<PgPool>) -> ApiResponse<Vec<PeriodeResponse>> {
    let items = tujuan_opd_service::find_all_periode(&pool).await?;
    response::ok("Success Get All Periode", items)
}

/// POST /tujuan_opd/create
pub async fn create_tujuan(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<TujuanOpdRequest>,
) -> ApiResponse<TujuanOpdResponse> {
    tracing::info!("Creating tujuan opd for {}", req.kode_opd);

    let tujuan = tujuan_opd_service::create(&pool, req).await?;
    response::created("Success Create Tujuan Opd", tujuan)
}

/// PUT /tujuan_opd/update/{id}
pub async fn update_tujuan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<TujuanOpdRequest>,
) -> ApiResponse<TujuanOpdResponse> {
    let id = parse_id(&id)?;
    tracing::info!("Updating tujuan opd: {}", id);

    let tujuan = tujuan_opd_service::update(&pool, id, req).await?;
    response::ok("Success Update Tujuan Opd", tujuan)
}

/// DELETE /tujuan_opd/delete/{id}
pub async fn delete_tujuan(State(pool): State<PgPool>, ApiPath(id): ApiPath<String>) -> ApiMessage {
    let id = parse_id(&id)?;
    tracing::info!("Deleting tujuan opd: {}", id);

    tujuan_opd_service::delete(&pool, id).await?;
    response::message("Success Delete Tujuan Opd")
}

/// GET /tujuan_opd/detail/{id}
pub async fn get_tujuan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<TujuanOpdResponse> {
    let id = parse_id(&id)?;
    let tujuan = tujuan_opd_service::find_by_id(&pool, id).await?;
    response::ok("Success Get Tujuan Opd", tujuan)
}

/// GET /tujuan_opd/findall/{kode_opd}?tahun_awal=&tahun_akhir=&jenis_periode=
pub async fn list_tujuan(
    State(pool): State<PgPool>,
    ApiPath(kode_opd): ApiPath<String>,
    ApiQuery(filter): ApiQuery<TujuanOpdFilter>,
) -> ApiResponse<Vec<TujuanOpdResponse>> {
    tracing::debug!("Listing tujuan opd for {}: {:?}", kode_opd, filter);

    let items = tujuan_opd_service::find_all(&pool, &kode_opd, &filter).await?;
    response::ok("Success Get All Tujuan Opd", items)
}
