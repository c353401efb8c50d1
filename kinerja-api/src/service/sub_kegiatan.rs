//! Sub Kegiatan Service
//!
//! Sub kegiatan with their indikator and pagu, the links from rencana
//! kinerja to the sub kegiatan funding them, and per-OPD selections.

use kinerja_core::domain::indikator::{Indikator, Target};
use kinerja_core::domain::program::{PaguSubKegiatan, RekinSubKegiatan, SubKegiatan, SubKegiatanOpd};
use kinerja_core::dto::program::{
    IndikatorSubKegiatanRequest, PaguRequest, SubKegiatanOpdRequest, SubKegiatanOpdResponse,
    SubKegiatanRekinRequest, SubKegiatanRekinResponse, SubKegiatanRequest, SubKegiatanResponse,
};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::indikator::IndikatorOwner;
use crate::repository::{
    indikator_repository, opd_repository, rencana_kinerja_repository, sub_kegiatan_repository,
};

pub fn validate(req: &SubKegiatanRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required("kode_subkegiatan", &req.kode_subkegiatan)
        .required("nama_subkegiatan", &req.nama_subkegiatan);
    for (i, ind) in req.indikator.iter().enumerate() {
        errors.required(&format!("indikator[{}].indikator", i), &ind.indikator);
    }
    for (i, pagu) in req.pagu.iter().enumerate() {
        errors
            .required(&format!("pagu[{}].tahun", i), &pagu.tahun)
            .check(
                pagu.pagu_anggaran >= 0,
                format!("pagu[{}].pagu_anggaran must not be negative", i),
            );
    }
    errors.finish()
}

pub fn validate_link(req: &SubKegiatanRekinRequest) -> Result<()> {
    FieldErrors::new()
        .required("kode_subkegiatan", &req.kode_subkegiatan)
        .required("rekin_id", &req.rekin_id)
        .finish()
}

pub fn validate_opd_selection(req: &SubKegiatanOpdRequest) -> Result<()> {
    FieldErrors::new()
        .required("kode_subkegiatan", &req.kode_subkegiatan)
        .required("kode_opd", &req.kode_opd)
        .required("tahun", &req.tahun)
        .finish()
}

fn indikator_from_request(items: Vec<IndikatorSubKegiatanRequest>) -> Vec<Indikator> {
    items
        .into_iter()
        .map(|ind| {
            let indikator_id = if ind.id_indikator.trim().is_empty() {
                id::short_id("IND-SUB")
            } else {
                ind.id_indikator
            };
            Indikator {
                target: ind
                    .targets
                    .into_iter()
                    .map(|t| Target {
                        id: if t.id_target.trim().is_empty() {
                            id::short_id("TRG-SUB")
                        } else {
                            t.id_target
                        },
                        indikator_id: indikator_id.clone(),
                        target: t.target,
                        satuan: t.satuan,
                        ..Default::default()
                    })
                    .collect(),
                id: indikator_id,
                indikator: ind.indikator,
                ..Default::default()
            }
        })
        .collect()
}

fn pagu_from_request(sub_kegiatan_id: &str, items: Vec<PaguRequest>) -> Vec<PaguSubKegiatan> {
    items
        .into_iter()
        .map(|p| PaguSubKegiatan {
            id: id::short_id("PAGU"),
            sub_kegiatan_id: sub_kegiatan_id.to_string(),
            jenis_pagu: p.jenis_pagu,
            pagu_anggaran: p.pagu_anggaran,
            tahun: p.tahun,
        })
        .collect()
}

// =============================================================================
// Sub kegiatan
// =============================================================================

pub async fn create(pool: &PgPool, req: SubKegiatanRequest) -> Result<SubKegiatanResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;
    if sub_kegiatan_repository::find_by_kode(&mut tx, &req.kode_subkegiatan)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "kode_subkegiatan {} already exists",
            req.kode_subkegiatan
        )));
    }

    let sub = SubKegiatan {
        id: id::generate_id("SUB"),
        kode_subkegiatan: req.kode_subkegiatan,
        nama_subkegiatan: req.nama_subkegiatan,
        status: req.status,
        ..Default::default()
    };
    sub_kegiatan_repository::create(&mut tx, &sub).await?;
    write_children(&mut tx, &sub.id, req.indikator, req.pagu).await?;

    let response = load(&mut tx, &sub.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Sub kegiatan created: {} ({})",
        response.id,
        response.kode_subkegiatan
    );

    Ok(response)
}

/// Replace a sub kegiatan with its indikator and pagu rows
pub async fn update(pool: &PgPool, id: &str, req: SubKegiatanRequest) -> Result<SubKegiatanResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;

    let sub = SubKegiatan {
        id: id.to_string(),
        kode_subkegiatan: req.kode_subkegiatan,
        nama_subkegiatan: req.nama_subkegiatan,
        status: req.status,
        ..Default::default()
    };
    if !sub_kegiatan_repository::update(&mut tx, &sub).await? {
        return Err(ServiceError::not_found("sub kegiatan", id));
    }

    indikator_repository::delete_by_owner(&mut tx, &IndikatorOwner::SubKegiatan(id.to_string()))
        .await?;
    sub_kegiatan_repository::delete_pagu(&mut tx, id).await?;
    write_children(&mut tx, id, req.indikator, req.pagu).await?;

    let response = load(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Sub kegiatan updated: {}", id);

    Ok(response)
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !sub_kegiatan_repository::delete(&mut conn, id).await? {
        return Err(ServiceError::not_found("sub kegiatan", id));
    }

    tracing::info!("Sub kegiatan deleted: {}", id);
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<SubKegiatanResponse> {
    let mut conn = pool.acquire().await?;
    load(&mut conn, id).await
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<SubKegiatanResponse>> {
    let mut conn = pool.acquire().await?;
    let subs = sub_kegiatan_repository::find_all(&mut conn).await?;

    let mut responses = Vec::with_capacity(subs.len());
    for mut sub in subs {
        attach_children(&mut conn, &mut sub).await?;
        responses.push(sub.into());
    }
    Ok(responses)
}

async fn write_children(
    conn: &mut PgConnection,
    sub_kegiatan_id: &str,
    indikator: Vec<IndikatorSubKegiatanRequest>,
    pagu: Vec<PaguRequest>,
) -> Result<()> {
    let owner = IndikatorOwner::SubKegiatan(sub_kegiatan_id.to_string());
    for item in indikator_from_request(indikator) {
        indikator_repository::insert(&mut *conn, &owner, &item).await?;
    }
    for row in pagu_from_request(sub_kegiatan_id, pagu) {
        sub_kegiatan_repository::insert_pagu(&mut *conn, &row).await?;
    }
    Ok(())
}

async fn attach_children(conn: &mut PgConnection, sub: &mut SubKegiatan) -> Result<()> {
    sub.indikator = indikator_repository::find_by_owner(
        &mut *conn,
        &IndikatorOwner::SubKegiatan(sub.id.clone()),
    )
    .await?;
    sub.pagu = sub_kegiatan_repository::find_pagu(conn, &sub.id).await?;
    Ok(())
}

async fn load(conn: &mut PgConnection, id: &str) -> Result<SubKegiatanResponse> {
    let mut sub = sub_kegiatan_repository::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("sub kegiatan", id))?;
    attach_children(conn, &mut sub).await?;

    Ok(sub.into())
}

// =============================================================================
// Rencana kinerja links
// =============================================================================

/// Fund a rencana kinerja from a sub kegiatan
pub async fn link_rekin(
    pool: &PgPool,
    req: SubKegiatanRekinRequest,
) -> Result<SubKegiatanRekinResponse> {
    validate_link(&req)?;

    let mut conn = pool.acquire().await?;
    let sub = sub_kegiatan_repository::find_by_kode(&mut conn, &req.kode_subkegiatan)
        .await?
        .ok_or_else(|| ServiceError::not_found("sub kegiatan", &req.kode_subkegiatan))?;
    if rencana_kinerja_repository::find_by_id(&mut conn, &req.rekin_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::not_found("rencana kinerja", &req.rekin_id));
    }

    let link = RekinSubKegiatan {
        id: id::short_id("RSK"),
        rekin_id: req.rekin_id,
        kode_subkegiatan: sub.kode_subkegiatan,
        nama_subkegiatan: sub.nama_subkegiatan,
    };
    sub_kegiatan_repository::link_rekin(&mut conn, &link).await?;

    tracing::info!(
        "Sub kegiatan {} linked to rencana kinerja {}",
        link.kode_subkegiatan,
        link.rekin_id
    );

    Ok(link.into())
}

pub async fn unlink_rekin(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !sub_kegiatan_repository::unlink_rekin(&mut conn, id).await? {
        return Err(ServiceError::not_found("sub kegiatan link", id));
    }

    tracing::info!("Sub kegiatan link removed: {}", id);
    Ok(())
}

// =============================================================================
// Sub kegiatan terpilih OPD
// =============================================================================

pub async fn create_opd_selection(
    pool: &PgPool,
    req: SubKegiatanOpdRequest,
) -> Result<SubKegiatanOpdResponse> {
    validate_opd_selection(&req)?;

    let mut conn = pool.acquire().await?;
    check_selection_references(&mut conn, &req).await?;

    let mut selection = SubKegiatanOpd {
        kode_subkegiatan: req.kode_subkegiatan,
        kode_opd: req.kode_opd,
        tahun: req.tahun,
        ..Default::default()
    };
    selection.id = sub_kegiatan_repository::create_opd_selection(&mut conn, &selection).await?;

    tracing::info!(
        "Sub kegiatan {} selected by {} for {}",
        selection.kode_subkegiatan,
        selection.kode_opd,
        selection.tahun
    );

    load_selection(&mut conn, selection.id).await
}

pub async fn update_opd_selection(
    pool: &PgPool,
    id: i32,
    req: SubKegiatanOpdRequest,
) -> Result<SubKegiatanOpdResponse> {
    validate_opd_selection(&req)?;

    let mut conn = pool.acquire().await?;
    check_selection_references(&mut conn, &req).await?;

    let selection = SubKegiatanOpd {
        id,
        kode_subkegiatan: req.kode_subkegiatan,
        kode_opd: req.kode_opd,
        tahun: req.tahun,
        ..Default::default()
    };
    if !sub_kegiatan_repository::update_opd_selection(&mut conn, &selection).await? {
        return Err(ServiceError::not_found("sub kegiatan opd", id));
    }

    tracing::info!("Sub kegiatan opd updated: {}", id);

    load_selection(&mut conn, id).await
}

pub async fn delete_opd_selection(pool: &PgPool, id: i32) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !sub_kegiatan_repository::delete_opd_selection(&mut conn, id).await? {
        return Err(ServiceError::not_found("sub kegiatan opd", id));
    }

    tracing::info!("Sub kegiatan opd deleted: {}", id);
    Ok(())
}

pub async fn find_opd_selections(
    pool: &PgPool,
    kode_opd: &str,
    tahun: &str,
) -> Result<Vec<SubKegiatanOpdResponse>> {
    let mut conn = pool.acquire().await?;
    let selections = sub_kegiatan_repository::find_opd_selections(&mut conn, kode_opd, tahun).await?;
    Ok(selections.into_iter().map(Into::into).collect())
}

async fn check_selection_references(
    conn: &mut PgConnection,
    req: &SubKegiatanOpdRequest,
) -> Result<()> {
    if !opd_repository::exists(&mut *conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }
    if sub_kegiatan_repository::find_by_kode(conn, &req.kode_subkegiatan)
        .await?
        .is_none()
    {
        return Err(ServiceError::not_found("sub kegiatan", &req.kode_subkegiatan));
    }
    Ok(())
}

async fn load_selection(conn: &mut PgConnection, id: i32) -> Result<SubKegiatanOpdResponse> {
    let selection = sub_kegiatan_repository::find_opd_selection(conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("sub kegiatan opd", id))?;
    Ok(selection.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinerja_core::dto::program::TargetSubKegiatanRequest;

    #[test]
    fn test_validation_covers_indikator_and_pagu() {
        let req = SubKegiatanRequest {
            kode_subkegiatan: "1.01.01.2.01.0001".to_string(),
            nama_subkegiatan: "Penyusunan Dokumen Perencanaan".to_string(),
            indikator: vec![IndikatorSubKegiatanRequest::default()],
            pagu: vec![PaguRequest {
                jenis_pagu: "pagu_indikatif".to_string(),
                pagu_anggaran: -5,
                tahun: String::new(),
            }],
            ..Default::default()
        };
        let msg = validate(&req).unwrap_err().to_string();
        assert!(msg.contains("indikator[0].indikator is required"));
        assert!(msg.contains("pagu[0].tahun is required"));
        assert!(msg.contains("pagu[0].pagu_anggaran must not be negative"));
    }

    #[test]
    fn test_indikator_ids_generated_for_new_rows() {
        let result = indikator_from_request(vec![IndikatorSubKegiatanRequest {
            id_indikator: String::new(),
            indikator: "Jumlah dokumen".to_string(),
            targets: vec![TargetSubKegiatanRequest {
                target: "3".to_string(),
                satuan: "dokumen".to_string(),
                ..Default::default()
            }],
        }]);
        assert!(result[0].id.starts_with("IND-SUB-"));
        assert!(result[0].target[0].id.starts_with("TRG-SUB-"));
        assert_eq!(result[0].target[0].indikator_id, result[0].id);
    }

    #[test]
    fn test_pagu_rows_belong_to_sub_kegiatan() {
        let rows = pagu_from_request(
            "SUB-2025-abcde",
            vec![PaguRequest {
                jenis_pagu: "pagu_ranwal".to_string(),
                pagu_anggaran: 250_000_000,
                tahun: "2025".to_string(),
            }],
        );
        assert_eq!(rows[0].sub_kegiatan_id, "SUB-2025-abcde");
        assert_eq!(rows[0].pagu_anggaran, 250_000_000);
        assert!(rows[0].id.starts_with("PAGU-"));
    }

    #[test]
    fn test_link_and_selection_validation() {
        assert!(validate_link(&SubKegiatanRekinRequest::default()).is_err());
        assert!(validate_opd_selection(&SubKegiatanOpdRequest {
            kode_subkegiatan: "1.01.01.2.01.0001".to_string(),
            kode_opd: "1.01".to_string(),
            tahun: "2025".to_string(),
        })
        .is_ok());
    }
}
