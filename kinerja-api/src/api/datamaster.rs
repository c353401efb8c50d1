//! Datamaster (Master RB) API Handlers
//!
//! Writes are stamped with the user id of the authenticated token.

use axum::{Extension, extract::State};
use kinerja_core::dto::datamaster::{RbRequest, RbResponse};
use sqlx::PgPool;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::response::{self, ApiMessage, ApiResponse, parse_id};
use crate::auth::AuthContext;
use crate::service::datamaster_service;

/// POST /datamaster/rb
pub async fn create_rb(
    State(pool): State<PgPool>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<RbRequest>,
) -> ApiResponse<RbResponse> {
    let user_id = auth.claims.user_id();
    tracing::info!("Creating master rb '{}' by user {}", req.jenis_rb, user_id);

    let rb = datamaster_service::create(&pool, req, user_id).await?;
    response::created("CREATED", rb)
}

/// PUT /datamaster/rb/{rb_id}
pub async fn update_rb(
    State(pool): State<PgPool>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(rb_id): ApiPath<String>,
    ApiJson(req): ApiJson<RbRequest>,
) -> ApiResponse<RbResponse> {
    let rb_id = parse_id(&rb_id)?;
    let rb = datamaster_service::update(&pool, rb_id, req, auth.claims.user_id()).await?;
    response::ok("UPDATED", rb)
}

/// DELETE /datamaster/rb/{rb_id}
pub async fn delete_rb(State(pool): State<PgPool>, ApiPath(rb_id): ApiPath<String>) -> ApiMessage {
    let rb_id = parse_id(&rb_id)?;
    datamaster_service::delete(&pool, rb_id).await?;
    response::message("DELETED")
}

/// GET /datamaster/rb/detail/{rb_id}
pub async fn get_rb(
    State(pool): State<PgPool>,
    ApiPath(rb_id): ApiPath<String>,
) -> ApiResponse<RbResponse> {
    let rb_id = parse_id(&rb_id)?;
    let rb = datamaster_service::find_by_id(&pool, rb_id).await?;
    response::ok("SUCCESS", rb)
}

/// GET /datamaster/rb/findall/{tahun}
pub async fn list_rb(
    State(pool): State<PgPool>,
    ApiPath(tahun): ApiPath<String>,
) -> ApiResponse<Vec<RbResponse>> {
    let tahun = parse_id(&tahun)?;
    let items = datamaster_service::find_all_by_tahun(&pool, tahun).await?;
    response::ok("SUCCESS", items)
}
