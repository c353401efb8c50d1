//! Program, Kegiatan and Sub Kegiatan API Handlers

use axum::extract::State;
use kinerja_core::dto::program::{
    IndikatorResponse, KegiatanRequest, KegiatanResponse, ProgramRequest, ProgramResponse,
    SubKegiatanOpdRequest, SubKegiatanOpdResponse, SubKegiatanRekinRequest,
    SubKegiatanRekinResponse, SubKegiatanRequest, SubKegiatanResponse, UpdateIndikatorRequest,
};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::response::{self, ApiMessage, ApiResponse, parse_id};
use crate::service::{program_service, sub_kegiatan_service};

// =============================================================================
// Program
// =============================================================================

/// POST /program/create
pub async fn create_program(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<ProgramRequest>,
) -> ApiResponse<ProgramResponse> {
    tracing::info!("Creating program: {} {}", req.kode_program, req.nama_program);

    let program = program_service::create_program(&pool, req).await?;
    response::created("Success Create Program", program)
}

/// PUT /program/update/{id}
pub async fn update_program(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<ProgramRequest>,
) -> ApiResponse<ProgramResponse> {
    tracing::info!("Updating program: {}", id);

    let program = program_service::update_program(&pool, &id, req).await?;
    response::ok("Success Update Program", program)
}

/// DELETE /program/delete/{id}
pub async fn delete_program(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting program: {}", id);

    program_service::delete_program(&pool, &id).await?;
    response::message("Success Delete Program")
}

/// GET /program/detail/{id}
pub async fn get_program(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<ProgramResponse> {
    let program = program_service::find_program_by_id(&pool, &id).await?;
    response::ok("Success Get Program", program)
}

/// GET /program/findall
pub async fn list_programs(State(pool): State<PgPool>) -> ApiResponse<Vec<ProgramResponse>> {
    let items = program_service::find_all_programs(&pool).await?;
    response::ok("Success Get All Program", items)
}

/// PUT /program/indikator/update
pub async fn update_indikator(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<UpdateIndikatorRequest>,
) -> ApiResponse<IndikatorResponse> {
    tracing::info!("Updating indikator {} of {}", req.id, req.kode);

    let indikator = program_service::update_indikator(&pool, req).await?;
    response::ok("Success Update Indikator", indikator)
}

// =============================================================================
// Kegiatan
// =============================================================================

/// POST /kegiatan/create
pub async fn create_kegiatan(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<KegiatanRequest>,
) -> ApiResponse<KegiatanResponse> {
    tracing::info!(
        "Creating kegiatan: {} {}",
        req.kode_kegiatan,
        req.nama_kegiatan
    );

    let kegiatan = program_service::create_kegiatan(&pool, req).await?;
    response::created("Success Create Kegiatan", kegiatan)
}

/// PUT /kegiatan/update/{id}
pub async fn update_kegiatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<KegiatanRequest>,
) -> ApiResponse<KegiatanResponse> {
    tracing::info!("Updating kegiatan: {}", id);

    let kegiatan = program_service::update_kegiatan(&pool, &id, req).await?;
    response::ok("Success Update Kegiatan", kegiatan)
}

/// DELETE /kegiatan/delete/{id}
pub async fn delete_kegiatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting kegiatan: {}", id);

    program_service::delete_kegiatan(&pool, &id).await?;
    response::message("Success Delete Kegiatan")
}

/// GET /kegiatan/detail/{id}
pub async fn get_kegiatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<KegiatanResponse> {
    let kegiatan = program_service::find_kegiatan_by_id(&pool, &id).await?;
    response::ok("Success Get Kegiatan", kegiatan)
}

/// GET /kegiatan/findall
pub async fn list_kegiatan(State(pool): State<PgPool>) -> ApiResponse<Vec<KegiatanResponse>> {
    let items = program_service::find_all_kegiatan(&pool).await?;
    response::ok("Success Get All Kegiatan", items)
}

// =============================================================================
// Sub Kegiatan
// =============================================================================

/// POST /sub_kegiatan/create
pub async fn create_sub_kegiatan(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<SubKegiatanRequest>,
) -> ApiResponse<SubKegiatanResponse> {
    tracing::info!(
        "Creating sub kegiatan: {} {}",
        req.kode_subkegiatan,
        req.nama_subkegiatan
    );

    let sub = sub_kegiatan_service::create(&pool, req).await?;
    response::created("Success Create Sub Kegiatan", sub)
}

/// PUT /sub_kegiatan/update/{id}
pub async fn update_sub_kegiatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<SubKegiatanRequest>,
) -> ApiResponse<SubKegiatanResponse> {
    tracing::info!("Updating sub kegiatan: {}", id);

    let sub = sub_kegiatan_service::update(&pool, &id, req).await?;
    response::ok("Success Update Sub Kegiatan", sub)
}

/// DELETE /sub_kegiatan/delete/{id}
pub async fn delete_sub_kegiatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    tracing::info!("Deleting sub kegiatan: {}", id);

    sub_kegiatan_service::delete(&pool, &id).await?;
    response::message("Success Delete Sub Kegiatan")
}

/// GET /sub_kegiatan/detail/{id}
pub async fn get_sub_kegiatan(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiResponse<SubKegiatanResponse> {
    let sub = sub_kegiatan_service::find_by_id(&pool, &id).await?;
    response::ok("Success Get Sub Kegiatan", sub)
}

/// GET /sub_kegiatan/findall
pub async fn list_sub_kegiatan(
    State(pool): State<PgPool>,
) -> ApiResponse<Vec<SubKegiatanResponse>> {
    let items = sub_kegiatan_service::find_all(&pool).await?;
    response::ok("Success Get All Sub Kegiatan", items)
}

/// POST /sub_kegiatan/rekin/create
pub async fn link_rekin(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<SubKegiatanRekinRequest>,
) -> ApiResponse<SubKegiatanRekinResponse> {
    tracing::info!(
        "Linking sub kegiatan {} to rekin {}",
        req.kode_subkegiatan,
        req.rekin_id
    );

    let link = sub_kegiatan_service::link_rekin(&pool, req).await?;
    response::created("Success Create Sub Kegiatan Rekin", link)
}

/// DELETE /sub_kegiatan/rekin/delete/{id}
pub async fn unlink_rekin(State(pool): State<PgPool>, ApiPath(id): ApiPath<String>) -> ApiMessage {
    tracing::info!("Unlinking sub kegiatan rekin: {}", id);

    sub_kegiatan_service::unlink_rekin(&pool, &id).await?;
    response::message("Success Delete Sub Kegiatan Rekin")
}

// =============================================================================
// Sub Kegiatan terpilih (per OPD)
// =============================================================================

/// POST /sub_kegiatan_opd/create
pub async fn create_opd_selection(
    State(pool): State<PgPool>,
    ApiJson(req): ApiJson<SubKegiatanOpdRequest>,
) -> ApiResponse<SubKegiatanOpdResponse> {
    tracing::info!(
        "Selecting sub kegiatan {} for {} {}",
        req.kode_subkegiatan,
        req.kode_opd,
        req.tahun
    );

    let selection = sub_kegiatan_service::create_opd_selection(&pool, req).await?;
    response::created("Success Create Sub Kegiatan Opd", selection)
}

/// PUT /sub_kegiatan_opd/update/{id}
pub async fn update_opd_selection(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<SubKegiatanOpdRequest>,
) -> ApiResponse<SubKegiatanOpdResponse> {
    let id = parse_id(&id)?;
    tracing::info!("Updating sub kegiatan opd: {}", id);

    let selection = sub_kegiatan_service::update_opd_selection(&pool, id, req).await?;
    response::ok("Success Update Sub Kegiatan Opd", selection)
}

/// DELETE /sub_kegiatan_opd/delete/{id}
pub async fn delete_opd_selection(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<String>,
) -> ApiMessage {
    let id = parse_id(&id)?;
    tracing::info!("Deleting sub kegiatan opd: {}", id);

    sub_kegiatan_service::delete_opd_selection(&pool, id).await?;
    response::message("Success Delete Sub Kegiatan Opd")
}

/// GET /sub_kegiatan_opd/findall/{kode_opd}/{tahun}
pub async fn list_opd_selections(
    State(pool): State<PgPool>,
    ApiPath((kode_opd, tahun)): ApiPath<(String, String)>,
) -> ApiResponse<Vec<SubKegiatanOpdResponse>> {
    let items = sub_kegiatan_service::find_opd_selections(&pool, &kode_opd, &tahun).await?;
    response::ok("Success Get All Sub Kegiatan Opd", items)
}
