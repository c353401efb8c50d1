//! Pegawai Service
//!
//! Employees and their monthly position assignments.

use kinerja_core::domain::pegawai::{JabatanPegawai, Pegawai};
use kinerja_core::dto::pegawai::{
    PegawaiCreateRequest, PegawaiResponse, PegawaiUpdateRequest, TambahJabatanRequest,
};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::{jabatan_repository, opd_repository, pegawai_repository};

pub fn validate(req: &PegawaiCreateRequest) -> Result<()> {
    FieldErrors::new()
        .required("nama_pegawai", &req.nama_pegawai)
        .required("nip", &req.nip)
        .required("kode_opd", &req.kode_opd)
        .finish()
}

pub fn validate_tambah_jabatan(req: &TambahJabatanRequest) -> Result<()> {
    FieldErrors::new()
        .required("nip", &req.nip)
        .required("id_jabatan", &req.id_jabatan)
        .required("kode_opd", &req.kode_opd)
        .required_num("tahun", req.tahun)
        .check(
            (1..=12).contains(&req.bulan),
            "bulan must be between 1 and 12",
        )
        .finish()
}

pub async fn create(pool: &PgPool, req: PegawaiCreateRequest) -> Result<PegawaiResponse> {
    validate(&req)?;

    let mut conn = pool.acquire().await?;
    if !opd_repository::exists(&mut conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }

    let pegawai = Pegawai {
        id: id::generate_id("PEG"),
        nama_pegawai: req.nama_pegawai,
        nip: req.nip,
        kode_opd: req.kode_opd,
        ..Default::default()
    };
    pegawai_repository::create(&mut conn, &pegawai).await?;

    tracing::info!("Pegawai created: {} ({})", pegawai.id, pegawai.nip);

    load(&mut conn, &pegawai.id).await
}

pub async fn update(pool: &PgPool, id: &str, req: PegawaiUpdateRequest) -> Result<PegawaiResponse> {
    validate(&req)?;

    let mut conn = pool.acquire().await?;
    if !opd_repository::exists(&mut conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }

    let pegawai = Pegawai {
        id: id.to_string(),
        nama_pegawai: req.nama_pegawai,
        nip: req.nip,
        kode_opd: req.kode_opd,
        ..Default::default()
    };
    if !pegawai_repository::update(&mut conn, &pegawai).await? {
        return Err(ServiceError::not_found("pegawai", id));
    }

    tracing::info!("Pegawai updated: {}", id);

    load(&mut conn, id).await
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !pegawai_repository::delete(&mut conn, id).await? {
        return Err(ServiceError::not_found("pegawai", id));
    }

    tracing::info!("Pegawai deleted: {}", id);
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<PegawaiResponse> {
    let mut conn = pool.acquire().await?;
    load(&mut conn, id).await
}

pub async fn find_by_nip(pool: &PgPool, nip: &str) -> Result<PegawaiResponse> {
    let mut conn = pool.acquire().await?;
    let mut pegawai = pegawai_repository::find_by_nip(&mut conn, nip)
        .await?
        .ok_or_else(|| ServiceError::not_found("pegawai with nip", nip))?;
    pegawai.jabatan = pegawai_repository::find_jabatan(&mut conn, &pegawai.nip).await?;

    Ok(pegawai.into())
}

pub async fn find_all(pool: &PgPool, kode_opd: Option<&str>) -> Result<Vec<PegawaiResponse>> {
    let mut conn = pool.acquire().await?;
    let pegawai = pegawai_repository::find_all(&mut conn, kode_opd).await?;
    Ok(pegawai.into_iter().map(Into::into).collect())
}

/// Record the position an employee holds in a month
pub async fn tambah_jabatan(pool: &PgPool, req: TambahJabatanRequest) -> Result<PegawaiResponse> {
    validate_tambah_jabatan(&req)?;

    let mut tx = pool.begin().await?;

    let pegawai = pegawai_repository::find_by_nip(&mut tx, &req.nip)
        .await?
        .ok_or_else(|| ServiceError::not_found("pegawai with nip", &req.nip))?;
    let jabatan = jabatan_repository::find_by_id(&mut tx, &req.id_jabatan)
        .await?
        .ok_or_else(|| ServiceError::not_found("jabatan", &req.id_jabatan))?;
    if !opd_repository::exists(&mut tx, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }

    let assignment = JabatanPegawai {
        nip: req.nip,
        id_jabatan: jabatan.id,
        nama_jabatan: jabatan.nama_jabatan,
        bulan: req.bulan,
        tahun: req.tahun,
        kode_opd: req.kode_opd,
        ..Default::default()
    };
    pegawai_repository::add_jabatan(&mut tx, &assignment).await?;

    let response = load(&mut tx, &pegawai.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Jabatan {} assigned to {} for {}/{}",
        assignment.id_jabatan,
        assignment.nip,
        assignment.bulan,
        assignment.tahun
    );

    Ok(response)
}

async fn load(conn: &mut PgConnection, id: &str) -> Result<PegawaiResponse> {
    let mut pegawai = pegawai_repository::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pegawai", id))?;
    pegawai.jabatan = pegawai_repository::find_jabatan(conn, &pegawai.nip).await?;

    Ok(pegawai.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tambah() -> TambahJabatanRequest {
        TambahJabatanRequest {
            nip: "198001012005011001".to_string(),
            id_jabatan: "JBTN-2025-ab12c".to_string(),
            bulan: 3,
            tahun: 2025,
            kode_opd: "1.01.0.00.0.00.01.0000".to_string(),
        }
    }

    #[test]
    fn test_pegawai_required_fields() {
        let msg = validate(&PegawaiCreateRequest::default())
            .unwrap_err()
            .to_string();
        assert_eq!(
            msg,
            "nama_pegawai is required; nip is required; kode_opd is required"
        );
    }

    #[test]
    fn test_tambah_jabatan_accepts_valid_request() {
        assert!(validate_tambah_jabatan(&tambah()).is_ok());
    }

    #[test]
    fn test_tambah_jabatan_month_range() {
        let mut req = tambah();
        req.bulan = 13;
        assert!(validate_tambah_jabatan(&req).is_err());
        req.bulan = 0;
        assert!(validate_tambah_jabatan(&req).is_err());
        req.bulan = 12;
        assert!(validate_tambah_jabatan(&req).is_ok());
    }

    #[test]
    fn test_tambah_jabatan_requires_every_field() {
        let msg = validate_tambah_jabatan(&TambahJabatanRequest::default())
            .unwrap_err()
            .to_string();
        for field in ["nip", "id_jabatan", "kode_opd", "tahun"] {
            assert!(msg.contains(&format!("{} is required", field)), "{}", msg);
        }
        assert!(msg.contains("bulan"));
    }
}
