//! Jabatan Service

use kinerja_core::domain::pegawai::Jabatan;
use kinerja_core::dto::pegawai::{JabatanCreateRequest, JabatanResponse, JabatanUpdateRequest};
use kinerja_core::id;
use sqlx::PgPool;

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::{jabatan_repository, opd_repository};

pub fn validate(req: &JabatanCreateRequest) -> Result<()> {
    FieldErrors::new()
        .required("nama_jabatan", &req.nama_jabatan)
        .required("kode_opd", &req.kode_opd)
        .finish()
}

pub async fn create(pool: &PgPool, req: JabatanCreateRequest) -> Result<JabatanResponse> {
    validate(&req)?;

    let mut conn = pool.acquire().await?;
    if !opd_repository::exists(&mut conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }

    let jabatan = Jabatan {
        id: id::generate_id("JBTN"),
        kode_jabatan: req.kode_jabatan,
        nama_jabatan: req.nama_jabatan,
        kode_opd: req.kode_opd,
        kelas_jabatan: req.kelas_jabatan,
        jenis_jabatan: req.jenis_jabatan,
        nilai_jabatan: req.nilai_jabatan,
    };
    jabatan_repository::create(&mut conn, &jabatan).await?;

    tracing::info!("Jabatan created: {} ({})", jabatan.id, jabatan.nama_jabatan);

    Ok(jabatan.into())
}

pub async fn update(pool: &PgPool, id: &str, req: JabatanUpdateRequest) -> Result<JabatanResponse> {
    validate(&req)?;

    let mut conn = pool.acquire().await?;
    if !opd_repository::exists(&mut conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }

    let jabatan = Jabatan {
        id: id.to_string(),
        kode_jabatan: req.kode_jabatan,
        nama_jabatan: req.nama_jabatan,
        kode_opd: req.kode_opd,
        kelas_jabatan: req.kelas_jabatan,
        jenis_jabatan: req.jenis_jabatan,
        nilai_jabatan: req.nilai_jabatan,
    };
    if !jabatan_repository::update(&mut conn, &jabatan).await? {
        return Err(ServiceError::not_found("jabatan", id));
    }

    tracing::info!("Jabatan updated: {}", id);

    Ok(jabatan.into())
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !jabatan_repository::delete(&mut conn, id).await? {
        return Err(ServiceError::not_found("jabatan", id));
    }

    tracing::info!("Jabatan deleted: {}", id);
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<JabatanResponse> {
    let mut conn = pool.acquire().await?;
    let jabatan = jabatan_repository::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("jabatan", id))?;

    Ok(jabatan.into())
}

pub async fn find_all(pool: &PgPool, kode_opd: Option<&str>) -> Result<Vec<JabatanResponse>> {
    let mut conn = pool.acquire().await?;
    let jabatan = jabatan_repository::find_all(&mut conn, kode_opd).await?;
    Ok(jabatan.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let msg = validate(&JabatanCreateRequest::default())
            .unwrap_err()
            .to_string();
        assert!(msg.contains("nama_jabatan is required"));
        assert!(msg.contains("kode_opd is required"));

        let req = JabatanCreateRequest {
            nama_jabatan: "Kepala Bidang".to_string(),
            kode_opd: "1.01.0.00.0.00.01.0000".to_string(),
            ..Default::default()
        };
        assert!(validate(&req).is_ok());
    }
}
