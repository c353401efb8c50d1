//! API Module
//!
//! HTTP API layer of the kinerja service.
//! Each submodule handles endpoints for a specific domain. A handful of
//! read endpoints are public; everything else sits behind bearer-token auth.

pub mod datamaster;
pub mod error;
pub mod extract;
pub mod health;
pub mod opd;
pub mod pegawai;
pub mod pohon_kinerja;
pub mod program;
pub mod rencana_kinerja;
pub mod response;
pub mod tujuan_opd;

use anyhow::Context;
use axum::{
    Router,
    extract::FromRef,
    http::{
        HeaderName, HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{delete, get, post, put},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{Authenticator, middleware::SESSION_HEADER, require_auth};
use crate::config::Config;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: Authenticator,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Authenticator {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let cors = cors_layer(&config.cors_allowed_origin)?;

    let router = Router::new()
        .merge(protected_routes(&state))
        .merge(public_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/pokin_opd/findall/{kode_opd}/{tahun}",
            get(pohon_kinerja::list_pokin_opd),
        )
        .route(
            "/api/pokin_pemda/subtematik/{tahun}",
            get(pohon_kinerja::list_sub_tematik),
        )
        .route(
            "/pohon_kinerja/pokin_atasan/{id}",
            get(pohon_kinerja::get_pokin_atasan),
        )
        .route(
            "/rekin/atasan/{rekin_id}",
            get(rencana_kinerja::get_rekin_atasan),
        )
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // OPD
        .route("/opd/create", post(opd::create_opd))
        .route("/opd/update/{kode_opd}", put(opd::update_opd))
        .route("/opd/delete/{kode_opd}", delete(opd::delete_opd))
        .route("/opd/detail/{kode_opd}", get(opd::get_opd))
        .route("/opd/findall", get(opd::list_opd))
        // Pegawai
        .route("/pegawai/create", post(pegawai::create_pegawai))
        .route("/pegawai/update/{id}", put(pegawai::update_pegawai))
        .route("/pegawai/delete/{id}", delete(pegawai::delete_pegawai))
        .route("/pegawai/detail/{id}", get(pegawai::get_pegawai))
        .route("/pegawai/nip/{nip}", get(pegawai::get_pegawai_by_nip))
        .route("/pegawai/findall", get(pegawai::list_pegawai))
        .route("/pegawai/tambah_jabatan", post(pegawai::tambah_jabatan))
        // Jabatan
        .route("/jabatan/create", post(pegawai::create_jabatan))
        .route("/jabatan/update/{id}", put(pegawai::update_jabatan))
        .route("/jabatan/delete/{id}", delete(pegawai::delete_jabatan))
        .route("/jabatan/detail/{id}", get(pegawai::get_jabatan))
        .route("/jabatan/findall", get(pegawai::list_jabatan))
        // Pohon kinerja OPD
        .route("/pohon_kinerja_opd/create", post(pohon_kinerja::create_pokin))
        .route(
            "/pohon_kinerja_opd/update/{id}",
            put(pohon_kinerja::update_pokin),
        )
        .route(
            "/pohon_kinerja_opd/delete/{id}",
            delete(pohon_kinerja::delete_pokin),
        )
        .route(
            "/pohon_kinerja_opd/detail/{id}",
            get(pohon_kinerja::get_pokin),
        )
        .route(
            "/pohon_kinerja_opd/findall/{kode_opd}/{tahun}",
            get(pohon_kinerja::list_pokin_opd),
        )
        .route(
            "/pohon_kinerja_opd/pelaksana/delete/{id}",
            delete(pohon_kinerja::delete_pelaksana),
        )
        .route(
            "/pohon_kinerja_opd/count_pemda/{kode_opd}/{tahun}",
            get(pohon_kinerja::count_pokin_pemda),
        )
        .route("/pohon_kinerja_opd/clone", post(pohon_kinerja::clone_pokin))
        // Pohon kinerja admin (tematik)
        .route(
            "/pohon_kinerja_admin/create",
            post(pohon_kinerja::create_tematik),
        )
        .route(
            "/pohon_kinerja_admin/findall/{tahun}",
            get(pohon_kinerja::list_tematik),
        )
        .route(
            "/pohon_kinerja_admin/tematik/status",
            put(pohon_kinerja::set_tematik_status),
        )
        .route(
            "/pohon_kinerja_admin/clone_from_pemda",
            post(pohon_kinerja::clone_from_pemda),
        )
        .route("/pohon_kinerja_admin/tolak", put(pohon_kinerja::reject_pemda))
        .route(
            "/pohon_kinerja_admin/pokin_from_pemda/{kode_opd}/{tahun}",
            get(pohon_kinerja::list_from_pemda),
        )
        // Rencana kinerja
        .route(
            "/rencana_kinerja/create",
            post(rencana_kinerja::create_rekin),
        )
        .route(
            "/rencana_kinerja/update/{id}",
            put(rencana_kinerja::update_rekin),
        )
        .route(
            "/rencana_kinerja/delete/{id}",
            delete(rencana_kinerja::delete_rekin),
        )
        .route(
            "/rencana_kinerja/detail/{id}",
            get(rencana_kinerja::get_rekin),
        )
        .route("/rencana_kinerja/findall", get(rencana_kinerja::list_rekin))
        .route(
            "/rencana_kinerja/find_by_ids",
            post(rencana_kinerja::find_rekin_by_ids),
        )
        .route(
            "/rencana_kinerja/clone/{id}",
            post(rencana_kinerja::clone_rekin),
        )
        // Program & kegiatan
        .route("/program/create", post(program::create_program))
        .route("/program/update/{id}", put(program::update_program))
        .route("/program/delete/{id}", delete(program::delete_program))
        .route("/program/detail/{id}", get(program::get_program))
        .route("/program/findall", get(program::list_programs))
        .route(
            "/program/indikator/update",
            put(program::update_indikator),
        )
        .route("/kegiatan/create", post(program::create_kegiatan))
        .route("/kegiatan/update/{id}", put(program::update_kegiatan))
        .route("/kegiatan/delete/{id}", delete(program::delete_kegiatan))
        .route("/kegiatan/detail/{id}", get(program::get_kegiatan))
        .route("/kegiatan/findall", get(program::list_kegiatan))
        // Sub kegiatan
        .route("/sub_kegiatan/create", post(program::create_sub_kegiatan))
        .route(
            "/sub_kegiatan/update/{id}",
            put(program::update_sub_kegiatan),
        )
        .route(
            "/sub_kegiatan/delete/{id}",
            delete(program::delete_sub_kegiatan),
        )
        .route(
            "/sub_kegiatan/detail/{id}",
            get(program::get_sub_kegiatan),
        )
        .route("/sub_kegiatan/findall", get(program::list_sub_kegiatan))
        .route("/sub_kegiatan/rekin/create", post(program::link_rekin))
        .route(
            "/sub_kegiatan/rekin/delete/{id}",
            delete(program::unlink_rekin),
        )
        .route(
            "/sub_kegiatan_opd/create",
            post(program::create_opd_selection),
        )
        .route(
            "/sub_kegiatan_opd/update/{id}",
            put(program::update_opd_selection),
        )
        .route(
            "/sub_kegiatan_opd/delete/{id}",
            delete(program::delete_opd_selection),
        )
        .route(
            "/sub_kegiatan_opd/findall/{kode_opd}/{tahun}",
            get(program::list_opd_selections),
        )
        // Periode & tujuan OPD
        .route("/periode/create", post(tujuan_opd::create_periode))
        .route("/periode/findall", get(tujuan_opd::list_periode))
        .route("/tujuan_opd/create", post(tujuan_opd::create_tujuan))
        .route("/tujuan_opd/update/{id}", put(tujuan_opd::update_tujuan))
        .route(
            "/tujuan_opd/delete/{id}",
            delete(tujuan_opd::delete_tujuan),
        )
        .route("/tujuan_opd/detail/{id}", get(tujuan_opd::get_tujuan))
        .route(
            "/tujuan_opd/findall/{kode_opd}",
            get(tujuan_opd::list_tujuan),
        )
        // Datamaster
        .route("/datamaster/rb", post(datamaster::create_rb))
        .route(
            "/datamaster/rb/{rb_id}",
            put(datamaster::update_rb).delete(datamaster::delete_rb),
        )
        .route("/datamaster/rb/detail/{rb_id}", get(datamaster::get_rb))
        .route("/datamaster/rb/findall/{tahun}", get(datamaster::list_rb))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_auth,
        ))
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("invalid CORS_ALLOWED_ORIGIN: {}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(SESSION_HEADER),
        ])
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_accepts_configured_origin() {
        assert!(cors_layer("http://localhost:3000").is_ok());
    }

    #[test]
    fn test_cors_rejects_unusable_origin() {
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
