//! Pegawai and Jabatan API Handlers

use axum::extract::State;
use kinerja_core::dto::pegawai::{
    JabatanCreateRequest, JabatanResponse, JabatanUpdateRequest, KodeOpdFilter,
    PegawaiCreateRequest, PegawaiResponse, PegawaiUpdateRequest, TambahJabatanRequest,
};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::response::{self, ApiMessage, ApiResponse};
use crate::service::{jabatan_service, pegawai_service};

// =============================================================================
// Pegawai
// =============================================================================

/// POST /pegawai/create
pub async fn create_pegawai(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<PegawaiCreateRequest>,
) -> ApiResponse<PegawaiResponse> {
    tracing::info!("Creating pegawai: {}", req.nip);

    let pegawai = pegawai_service::create(&pool, req).await?;
    response::created("Success Create Pegawai", pegawai)
}

/// PUT /pegawai/update/{id}
pub async fn update_pegawai(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<PegawaiUpdateRequest>,
) -> ApiResponse<PegawaiResponse> {
    tracing::info!("Updating pegawai: {}", id);

    let pegawai = pegawai_service::update(&pool, &id, req).await?;
    response::ok("Success Update Pegawai", pegawai)
}

/// DELETE /pegawai/delete/{id}
pub async fn delete_pegawai(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting pegawai: {}", id);

    pegawai_service::delete(&pool, &id).await?;
    response::message("Success Delete Pegawai")
}

/// GET /pegawai/detail/{id}
pub async fn get_pegawai(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<PegawaiResponse> {
    let pegawai = pegawai_service::find_by_id(&pool, &id).await?;
    response::ok("Success Get Pegawai", pegawai)
}

/// GET /pegawai/nip/{nip}
pub async fn get_pegawai_by_nip(
    State(pool): State<PgPool>,
    ApiPath(nip): ApiPath<String>,
) -> ApiResponse<PegawaiResponse> {
    let pegawai = pegawai_service::find_by_nip(&pool, &nip).await?;
    response::ok("Success Get Pegawai", pegawai)
}

/// GET /pegawai/findall?kode_opd=
pub async fn list_pegawai(
    State(pool): State<PgPool>,
    ApiQuery(filter): ApiQuery<KodeOpdFilter>,
) -> ApiResponse<Vec<PegawaiResponse>> {
    tracing::debug!("Listing pegawai (opd: {:?})", filter.kode_opd);

    let items = pegawai_service::find_all(&pool, filter.kode_opd.as_deref()).await?;
    response::ok("Success Get All Pegawai", items)
}

/// POST /pegawai/tambah_jabatan
pub async fn tambah_jabatan(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<TambahJabatanRequest>,
) -> ApiResponse<PegawaiResponse> {
    tracing::info!("Assigning jabatan {} to {}", req.id_jabatan, req.nip);

    let pegawai = pegawai_service::tambah_jabatan(&pool, req).await?;
    response::created("Success Tambah Jabatan", pegawai)
}

// =============================================================================
// Jabatan
// =============================================================================

/// POST /jabatan/create
pub async fn create_jabatan(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<JabatanCreateRequest>,
) -> ApiResponse<JabatanResponse> {
    tracing::info!("Creating jabatan: {}", req.nama_jabatan);

    let jabatan = jabatan_service::create(&pool, req).await?;
    response::created("Success Create Jabatan", jabatan)
}

/// PUT /jabatan/update/{id}
pub async fn update_jabatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<JabatanUpdateRequest>,
) -> ApiResponse<JabatanResponse> {
    tracing::info!("Updating jabatan: {}", id);

    let jabatan = jabatan_service::update(&pool, &id, req).await?;
    response::ok("Success Update Jabatan", jabatan)
}

/// DELETE /jabatan/delete/{id}
pub async fn delete_jabatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting jabatan: {}", id);

    jabatan_service::delete(&pool, &id).await?;
    response::message("Success Delete Jabatan")
}

/// GET /jabatan/detail/{id}
pub async fn get_jabatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<JabatanResponse> {
    let jabatan = jabatan_service::find_by_id(&pool, &id).await?;
    response::ok("Success Get Jabatan", jabatan)
}

/// GET /jabatan/findall?kode_opd=
pub async fn list_jabatan(
    State(pool): State<PgPool>,
    ApiQuery(filter): ApiQuery<KodeOpdFilter>,
) -> ApiResponse<Vec<JabatanResponse>> {
    let items = jabatan_service::find_all(&pool, filter.kode_opd.as_deref()).await?;
    response::ok("Success Get All Jabatan", items)
}
