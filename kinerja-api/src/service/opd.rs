//! OPD Service

use kinerja_core::domain::opd::Opd;
use kinerja_core::dto::opd::{OpdCreateRequest, OpdResponse, OpdUpdateRequest};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::opd_repository;

pub fn validate(req: &OpdCreateRequest) -> Result<()> {
    FieldErrors::new()
        .required("kode_opd", &req.kode_opd)
        .required("nama_opd", &req.nama_opd)
        .finish()
}

pub async fn create(pool: &PgPool, req: OpdCreateRequest) -> Result<OpdResponse> {
    validate(&req)?;

    let mut conn = pool.acquire().await?;
    if opd_repository::exists(&mut conn, &req.kode_opd).await? {
        return Err(ServiceError::Conflict(format!(
            "kode_opd {} already exists",
            req.kode_opd
        )));
    }

    let opd = Opd {
        id: Uuid::new_v4(),
        kode_opd: req.kode_opd,
        nama_opd: req.nama_opd,
        singkatan: req.singkatan,
        alamat: req.alamat,
        created_at: chrono::Utc::now(),
    };
    opd_repository::create(&mut conn, &opd).await?;

    tracing::info!("OPD created: {}", opd.kode_opd);

    Ok(opd.into())
}

pub async fn update(pool: &PgPool, kode_opd: &str, req: OpdUpdateRequest) -> Result<OpdResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;
    let existing = opd_repository::find_by_kode(&mut tx, kode_opd)
        .await?
        .ok_or_else(|| ServiceError::not_found("opd", kode_opd))?;

    let opd = Opd {
        kode_opd: req.kode_opd,
        nama_opd: req.nama_opd,
        singkatan: req.singkatan,
        alamat: req.alamat,
        ..existing
    };
    opd_repository::update(&mut tx, kode_opd, &opd).await?;
    tx.commit().await?;

    tracing::info!("OPD updated: {} -> {}", kode_opd, opd.kode_opd);

    Ok(opd.into())
}

pub async fn delete(pool: &PgPool, kode_opd: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !opd_repository::delete(&mut conn, kode_opd).await? {
        return Err(ServiceError::not_found("opd", kode_opd));
    }

    tracing::info!("OPD deleted: {}", kode_opd);
    Ok(())
}

pub async fn find_by_kode(pool: &PgPool, kode_opd: &str) -> Result<OpdResponse> {
    let mut conn = pool.acquire().await?;
    let opd = opd_repository::find_by_kode(&mut conn, kode_opd)
        .await?
        .ok_or_else(|| ServiceError::not_found("opd", kode_opd))?;

    Ok(opd.into())
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<OpdResponse>> {
    let mut conn = pool.acquire().await?;
    let opds = opd_repository::find_all(&mut conn).await?;
    Ok(opds.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kode_and_nama_required() {
        let err = validate(&OpdCreateRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "kode_opd is required; nama_opd is required");

        let req = OpdCreateRequest {
            kode_opd: "5.01.5.05.0.00.01.0000".to_string(),
            nama_opd: "Badan Perencanaan Pembangunan Daerah".to_string(),
            ..Default::default()
        };
        assert!(validate(&req).is_ok());
    }
}
