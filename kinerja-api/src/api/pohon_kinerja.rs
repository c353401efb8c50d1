//! Pohon Kinerja API Handlers
//!
//! OPD trees under `/pohon_kinerja_opd`, pemda-side (tematik) trees under
//! `/pohon_kinerja_admin`. Node ids arrive as path strings and are parsed
//! here so a bad id still answers with the envelope.

use axum::extract::State;
use kinerja_core::dto::pohon_kinerja::{
    CountPokinPemdaResponse, PohonKinerjaAdminResponse, PohonKinerjaCloneRequest,
    PohonKinerjaNodeResponse, PohonKinerjaOpdAllResponse, PohonKinerjaOpdResponse,
    PohonKinerjaRequest, PokinAtasanResponse, PokinPemdaCloneRequest, PokinTolakRequest,
    SubTematikResponse, TematikStatusRequest,
};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::response::{self, ApiMessage, ApiResponse, parse_id};
use crate::service::pohon_kinerja_service;

// =============================================================================
// OPD trees
// =============================================================================

/// POST /pohon_kinerja_opd/create
pub async fn create_pokin(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PohonKinerjaRequest>,
) -> ApiResponse<PohonKinerjaOpdResponse> {
    tracing::info!(
        "Creating pohon kinerja '{}' (level {}) for {}",
        req.nama_pohon,
        req.level_pohon,
        req.kode_opd
    );

    let node = pohon_kinerja_service::create(&pool, req).await?;
    response::created("Success Create Pohon Kinerja", node)
}

/// PUT /pohon_kinerja_opd/update/{id}
pub async fn update_pokin(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<PohonKinerjaRequest>,
) -> ApiResponse<PohonKinerjaOpdResponse> {
    let id = parse_id(&id)?;
    tracing::info!("Updating pohon kinerja: {}", id);

    let node = pohon_kinerja_service::update(&pool, id, req).await?;
    response::ok("Success Update Pohon Kinerja", node)
}

/// DELETE /pohon_kinerja_opd/delete/{id}
///
/// Removes the whole subtree.
pub async fn delete_pokin(State(pool): State<PgPool>, ApiPath(id): ApiPath<String>) -> ApiMessage {
    let id = parse_id(&id)?;
    tracing::info!("Deleting pohon kinerja: {}", id);

    pohon_kinerja_service::delete(&pool, id).await?;
    response::message("Success Delete Pohon Kinerja")
}

/// GET /pohon_kinerja_opd/detail/{id}
pub async fn get_pokin(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<PohonKinerjaOpdResponse> {
    let id = parse_id(&id)?;
    let node = pohon_kinerja_service::find_by_id(&pool, id).await?;
    response::ok("Berhasil Mendapatkan Pohon Kinerja", node)
}

/// GET /pohon_kinerja_opd/findall/{kode_opd}/{tahun}
/// GET /api/pokin_opd/findall/{kode_opd}/{tahun} (public)
pub async fn list_pokin_opd(
    State(pool): State<PgPool>,
    ApiPath((kode_opd, tahun)): ApiPath<(String, String)>,
) -> ApiResponse<PohonKinerjaOpdAllResponse> {
    tracing::debug!("Getting pohon kinerja tree for {} {}", kode_opd, tahun);

    let tree = pohon_kinerja_service::find_all_opd(&pool, &kode_opd, &tahun).await?;
    response::ok("Success Get All Pohon Kinerja", tree)
}

/// DELETE /pohon_kinerja_opd/pelaksana/delete/{id}
pub async fn delete_pelaksana(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting pelaksana: {}", id);

    pohon_kinerja_service::delete_pelaksana(&pool, &id).await?;
    response::message("Success Delete Pelaksana")
}

/// GET /pohon_kinerja/pokin_atasan/{id} (public)
pub async fn get_pokin_atasan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<PokinAtasanResponse> {
    let id = parse_id(&id)?;
    let atasan = pohon_kinerja_service::find_pokin_atasan(&pool, id).await?;
    response::ok("Success Get Pokin Atasan", atasan)
}

/// GET /pohon_kinerja_opd/count_pemda/{kode_opd}/{tahun}
pub async fn count_pokin_pemda(
    State(pool): State<PgPool>,
    ApiPath((kode_opd, tahun)): ApiPath<(String, String)>,
) -> ApiResponse<CountPokinPemdaResponse> {
    let count = pohon_kinerja_service::count_pokin_pemda(&pool, &kode_opd, &tahun).await?;
    response::ok("Success Count Pokin Pemda", count)
}

/// POST /pohon_kinerja_opd/clone
///
/// Copies a whole OPD year into another year; `data` is the number of
/// nodes created.
pub async fn clone_pokin(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PohonKinerjaCloneRequest>,
) -> ApiResponse<usize> {
    tracing::info!(
        "Cloning pohon kinerja of {} from {} to {}",
        req.kode_opd,
        req.tahun_sumber,
        req.tahun_tujuan
    );

    let cloned = pohon_kinerja_service::clone(&pool, req).await?;
    response::created("Success Clone Pohon Kinerja", cloned)
}

// =============================================================================
// Tematik (admin) trees
// =============================================================================

/// POST /pohon_kinerja_admin/create
pub async fn create_tematik(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PohonKinerjaRequest>,
) -> ApiResponse<PohonKinerjaOpdResponse> {
    tracing::info!(
        "Creating tematik node '{}' (level {})",
        req.nama_pohon,
        req.level_pohon
    );

    let node = pohon_kinerja_service::create_tematik(&pool, req).await?;
    response::created("Success Create Pohon Kinerja", node)
}

/// GET /pohon_kinerja_admin/findall/{tahun}
pub async fn list_tematik(
    State(pool): State<PgPool>,
    ApiPath(tahun): ApiPath<String>,
) -> ApiResponse<PohonKinerjaAdminResponse> {
    tracing::debug!("Getting tematik trees for {}", tahun);

    let trees = pohon_kinerja_service::find_all_tematik(&pool, &tahun).await?;
    response::ok("Success Get All Pohon Kinerja", trees)
}

/// PUT /pohon_kinerja_admin/tematik/status
pub async fn set_tematik_status(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<TematikStatusRequest>,
) -> ApiMessage {
    tracing::info!("Setting tematik {} active: {}", req.id, req.is_active);

    pohon_kinerja_service::set_tematik_active(&pool, req).await?;
    response::message("Success Update Status Tematik")
}

// =============================================================================
// Pemda hand-off
// =============================================================================

/// POST /pohon_kinerja_admin/clone_from_pemda
pub async fn clone_from_pemda(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PokinPemdaCloneRequest>,
) -> ApiResponse<PohonKinerjaOpdResponse> {
    tracing::info!("Taking pohon kinerja {} over from pemda under {}", req.id, req.parent);

    let node = pohon_kinerja_service::clone_from_pemda(&pool, req).await?;
    response::ok("Success Clone Pohon Kinerja From Pemda", node)
}

/// PUT /pohon_kinerja_admin/tolak
pub async fn reject_pemda(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PokinTolakRequest>,
) -> ApiMessage {
    tracing::info!("Rejecting pemda pohon kinerja {}", req.id);

    pohon_kinerja_service::reject_pemda(&pool, req).await?;
    response::message("Success")
}

/// GET /pohon_kinerja_admin/pokin_from_pemda/{kode_opd}/{tahun}
pub async fn list_from_pemda(
    State(pool): State<PgPool>,
    ApiPath((kode_opd, tahun)): ApiPath<(String, String)>,
) -> ApiResponse<Vec<PohonKinerjaNodeResponse>> {
    let nodes = pohon_kinerja_service::find_from_pemda(&pool, &kode_opd, &tahun).await?;
    response::ok("Success Get Pokin From Pemda", nodes)
}

/// GET /api/pokin_pemda/subtematik/{tahun}
pub async fn list_sub_tematik(
    State(pool): State<PgPool>,
    ApiPath(tahun): ApiPath<String>,
) -> ApiResponse<SubTematikResponse> {
    let tree = pohon_kinerja_service::find_sub_tematik(&pool, &tahun).await?;
    response::ok("OK", tree)
}
