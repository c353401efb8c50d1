//! Program and Kegiatan Service

use kinerja_core::domain::indikator::{Indikator, Target};
use kinerja_core::domain::program::{Kegiatan, Program};
use kinerja_core::dto::program::{
    IndikatorRequest, IndikatorResponse, KegiatanRequest, KegiatanResponse, ProgramRequest,
    ProgramResponse, UpdateIndikatorRequest,
};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::indikator::IndikatorOwner;
use crate::repository::{indikator_repository, program_repository};

pub fn validate_program(req: &ProgramRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required("kode_program", &req.kode_program)
        .required("nama_program", &req.nama_program);
    check_indikator(&mut errors, &req.indikator);
    errors.finish()
}

pub fn validate_kegiatan(req: &KegiatanRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required("kode_kegiatan", &req.kode_kegiatan)
        .required("nama_kegiatan", &req.nama_kegiatan);
    check_indikator(&mut errors, &req.indikator);
    errors.finish()
}

/// Every field except the budget is mandatory
pub fn validate_update_indikator(req: &UpdateIndikatorRequest) -> Result<()> {
    FieldErrors::new()
        .required("id", &req.id)
        .required("kode", &req.kode)
        .required("kode_opd", &req.kode_opd)
        .required("indikator", &req.indikator)
        .required("tahun", &req.tahun)
        .required("target", &req.target)
        .required("satuan", &req.satuan)
        .finish()
}

fn check_indikator(errors: &mut FieldErrors, items: &[IndikatorRequest]) {
    for (i, ind) in items.iter().enumerate() {
        errors.required(&format!("indikator[{}].indikator", i), &ind.indikator);
    }
}

/// Indikator keep the ids the caller sent; a target without a year takes
/// the indikator's year
fn indikator_from_request(items: Vec<IndikatorRequest>, default_tahun: &str) -> Vec<Indikator> {
    items
        .into_iter()
        .map(|ind| {
            let indikator_id = if ind.id.trim().is_empty() {
                id::short_id("IND")
            } else {
                ind.id
            };
            let tahun = if ind.tahun.trim().is_empty() {
                default_tahun.to_string()
            } else {
                ind.tahun
            };
            Indikator {
                target: ind
                    .target
                    .into_iter()
                    .map(|t| Target {
                        id: if t.id.trim().is_empty() {
                            id::short_id("TRG")
                        } else {
                            t.id
                        },
                        indikator_id: indikator_id.clone(),
                        target: t.target,
                        satuan: t.satuan,
                        tahun: if t.tahun.trim().is_empty() {
                            tahun.clone()
                        } else {
                            t.tahun
                        },
                    })
                    .collect(),
                id: indikator_id,
                indikator: ind.indikator,
                pagu_anggaran: ind.pagu_anggaran,
                tahun,
                ..Default::default()
            }
        })
        .collect()
}

// =============================================================================
// Program
// =============================================================================

pub async fn create_program(pool: &PgPool, req: ProgramRequest) -> Result<ProgramResponse> {
    validate_program(&req)?;

    let mut tx = pool.begin().await?;

    let program = Program {
        id: id::generate_id("PRGM"),
        kode_program: req.kode_program,
        nama_program: req.nama_program,
        kode_opd: req.kode_opd,
        tahun: req.tahun,
        is_active: req.is_active,
        indikator: Vec::new(),
    };
    program_repository::create_program(&mut tx, &program).await?;

    let owner = IndikatorOwner::Program(program.id.clone());
    for indikator in indikator_from_request(req.indikator, &program.tahun) {
        indikator_repository::insert(&mut tx, &owner, &indikator).await?;
    }

    let response = load_program(&mut tx, &program.id).await?;
    tx.commit().await?;

    tracing::info!("Program created: {} ({})", response.id, response.kode_program);

    Ok(response)
}

pub async fn update_program(
    pool: &PgPool,
    id: &str,
    req: ProgramRequest,
) -> Result<ProgramResponse> {
    validate_program(&req)?;

    let mut tx = pool.begin().await?;

    let program = Program {
        id: id.to_string(),
        kode_program: req.kode_program,
        nama_program: req.nama_program,
        kode_opd: req.kode_opd,
        tahun: req.tahun,
        is_active: req.is_active,
        indikator: Vec::new(),
    };
    if !program_repository::update_program(&mut tx, &program).await? {
        return Err(ServiceError::not_found("program", id));
    }

    let indikator = indikator_from_request(req.indikator, &program.tahun);
    indikator_repository::replace_for_owner(
        &mut tx,
        &IndikatorOwner::Program(program.id.clone()),
        &indikator,
    )
    .await?;

    let response = load_program(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Program updated: {}", id);

    Ok(response)
}

pub async fn delete_program(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !program_repository::delete_program(&mut conn, id).await? {
        return Err(ServiceError::not_found("program", id));
    }

    tracing::info!("Program deleted: {}", id);
    Ok(())
}

pub async fn find_program_by_id(pool: &PgPool, id: &str) -> Result<ProgramResponse> {
    let mut conn = pool.acquire().await?;
    load_program(&mut conn, id).await
}

pub async fn find_all_programs(pool: &PgPool) -> Result<Vec<ProgramResponse>> {
    let mut conn = pool.acquire().await?;
    let mut programs = program_repository::find_all_programs(&mut conn).await?;

    let ids: Vec<String> = programs.iter().map(|p| p.id.clone()).collect();
    let mut indikator = indikator_repository::find_by_program_ids(&mut conn, &ids).await?;
    for program in programs.iter_mut() {
        program.indikator = indikator.remove(&program.id).unwrap_or_default();
    }

    Ok(programs.into_iter().map(ProgramResponse::from).collect())
}

/// Edit one indikator and its first target in place
pub async fn update_indikator(
    pool: &PgPool,
    req: UpdateIndikatorRequest,
) -> Result<IndikatorResponse> {
    validate_update_indikator(&req)?;

    let mut tx = pool.begin().await?;
    let existing = indikator_repository::find_by_id(&mut tx, &req.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("indikator", &req.id))?;

    let target_id = existing
        .target
        .first()
        .map(|t| t.id.clone())
        .unwrap_or_else(|| id::short_id("TRG"));
    let indikator = Indikator {
        id: req.id,
        kode: req.kode,
        kode_opd: req.kode_opd,
        indikator: req.indikator,
        pagu_anggaran: req.pagu_anggaran,
        target: vec![Target {
            id: target_id,
            indikator_id: existing.id.clone(),
            target: req.target,
            satuan: req.satuan,
            tahun: req.tahun.clone(),
        }],
        tahun: req.tahun,
        ..existing
    };

    indikator_repository::update(&mut tx, &indikator).await?;
    indikator_repository::delete_targets(&mut tx, &indikator.id).await?;
    for target in &indikator.target {
        indikator_repository::insert_target(&mut tx, target).await?;
    }
    tx.commit().await?;

    tracing::info!("Indikator updated: {}", indikator.id);

    Ok(indikator.into())
}

async fn load_program(conn: &mut PgConnection, id: &str) -> Result<ProgramResponse> {
    let mut program = program_repository::find_program_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("program", id))?;
    program.indikator =
        indikator_repository::find_by_owner(conn, &IndikatorOwner::Program(program.id.clone()))
            .await?;

    Ok(program.into())
}

// =============================================================================
// Kegiatan
// =============================================================================

pub async fn create_kegiatan(pool: &PgPool, req: KegiatanRequest) -> Result<KegiatanResponse> {
    validate_kegiatan(&req)?;

    let mut tx = pool.begin().await?;

    let kegiatan = Kegiatan {
        id: id::generate_id("KGT"),
        kode_kegiatan: req.kode_kegiatan,
        nama_kegiatan: req.nama_kegiatan,
        kode_opd: req.kode_opd,
        indikator: Vec::new(),
    };
    program_repository::create_kegiatan(&mut tx, &kegiatan).await?;

    let owner = IndikatorOwner::Kegiatan(kegiatan.id.clone());
    for indikator in indikator_from_request(req.indikator, "") {
        indikator_repository::insert(&mut tx, &owner, &indikator).await?;
    }

    let response = load_kegiatan(&mut tx, &kegiatan.id).await?;
    tx.commit().await?;

    tracing::info!("Kegiatan created: {} ({})", response.id, response.kode_kegiatan);

    Ok(response)
}

pub async fn update_kegiatan(
    pool: &PgPool,
    id: &str,
    req: KegiatanRequest,
) -> Result<KegiatanResponse> {
    validate_kegiatan(&req)?;

    let mut tx = pool.begin().await?;

    let kegiatan = Kegiatan {
        id: id.to_string(),
        kode_kegiatan: req.kode_kegiatan,
        nama_kegiatan: req.nama_kegiatan,
        kode_opd: req.kode_opd,
        indikator: Vec::new(),
    };
    if !program_repository::update_kegiatan(&mut tx, &kegiatan).await? {
        return Err(ServiceError::not_found("kegiatan", id));
    }

    let indikator = indikator_from_request(req.indikator, "");
    indikator_repository::replace_for_owner(
        &mut tx,
        &IndikatorOwner::Kegiatan(kegiatan.id.clone()),
        &indikator,
    )
    .await?;

    let response = load_kegiatan(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Kegiatan updated: {}", id);

    Ok(response)
}

pub async fn delete_kegiatan(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !program_repository::delete_kegiatan(&mut conn, id).await? {
        return Err(ServiceError::not_found("kegiatan", id));
    }

    tracing::info!("Kegiatan deleted: {}", id);
    Ok(())
}

pub async fn find_kegiatan_by_id(pool: &PgPool, id: &str) -> Result<KegiatanResponse> {
    let mut conn = pool.acquire().await?;
    load_kegiatan(&mut conn, id).await
}

pub async fn find_all_kegiatan(pool: &PgPool) -> Result<Vec<KegiatanResponse>> {
    let mut conn = pool.acquire().await?;
    let kegiatan = program_repository::find_all_kegiatan(&mut conn).await?;

    let mut responses = Vec::with_capacity(kegiatan.len());
    for mut k in kegiatan {
        k.indikator =
            indikator_repository::find_by_owner(&mut conn, &IndikatorOwner::Kegiatan(k.id.clone()))
                .await?;
        responses.push(k.into());
    }
    Ok(responses)
}

async fn load_kegiatan(conn: &mut PgConnection, id: &str) -> Result<KegiatanResponse> {
    let mut kegiatan = program_repository::find_kegiatan_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("kegiatan", id))?;
    kegiatan.indikator =
        indikator_repository::find_by_owner(conn, &IndikatorOwner::Kegiatan(kegiatan.id.clone()))
            .await?;

    Ok(kegiatan.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinerja_core::dto::program::TargetRequest;

    #[test]
    fn test_program_validation() {
        let msg = validate_program(&ProgramRequest {
            indikator: vec![IndikatorRequest::default()],
            ..Default::default()
        })
        .unwrap_err()
        .to_string();
        assert_eq!(
            msg,
            "kode_program is required; nama_program is required; indikator[0].indikator is required"
        );
    }

    #[test]
    fn test_update_indikator_requires_all_but_pagu() {
        let req = UpdateIndikatorRequest {
            id: "IND-1".to_string(),
            kode: "1.01.01".to_string(),
            kode_opd: "1.01".to_string(),
            indikator: "Persentase".to_string(),
            tahun: "2025".to_string(),
            pagu_anggaran: 0,
            target: "80".to_string(),
            satuan: "%".to_string(),
        };
        assert!(validate_update_indikator(&req).is_ok());

        let msg = validate_update_indikator(&UpdateIndikatorRequest {
            satuan: String::new(),
            ..req
        })
        .unwrap_err()
        .to_string();
        assert_eq!(msg, "satuan is required");
    }

    #[test]
    fn test_indikator_years_cascade() {
        let result = indikator_from_request(
            vec![IndikatorRequest {
                indikator: "Persentase".to_string(),
                pagu_anggaran: 2_000_000,
                target: vec![
                    TargetRequest::default(),
                    TargetRequest {
                        tahun: "2027".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            "2026",
        );
        assert_eq!(result[0].tahun, "2026");
        assert_eq!(result[0].pagu_anggaran, 2_000_000);
        assert_eq!(result[0].target[0].tahun, "2026");
        assert_eq!(result[0].target[1].tahun, "2027");
        assert!(result[0].target[0].id.starts_with("TRG-"));
    }
}
