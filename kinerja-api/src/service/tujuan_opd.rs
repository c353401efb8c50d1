//! Tujuan OPD Service
//!
//! Planning periods and the goals each OPD sets within them.

use kinerja_core::domain::indikator::{Indikator, Target};
use kinerja_core::domain::tujuan_opd::{Periode, TujuanOpd};
use kinerja_core::dto::tujuan_opd::{
    IndikatorTujuanRequest, PeriodeRequest, PeriodeResponse, TujuanOpdFilter, TujuanOpdRequest,
    TujuanOpdResponse,
};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::indikator::IndikatorOwner;
use crate::repository::{indikator_repository, opd_repository, tujuan_opd_repository};

// =============================================================================
// Periode
// =============================================================================

pub fn validate_periode(req: &PeriodeRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required("tahun_awal", &req.tahun_awal)
        .required("tahun_akhir", &req.tahun_akhir)
        .required("jenis_periode", &req.jenis_periode);
    if let (Ok(awal), Ok(akhir)) = (
        req.tahun_awal.trim().parse::<i32>(),
        req.tahun_akhir.trim().parse::<i32>(),
    ) {
        errors.check(awal <= akhir, "tahun_awal must not be after tahun_akhir");
    }
    errors.finish()
}

pub async fn create_periode(pool: &PgPool, req: PeriodeRequest) -> Result<PeriodeResponse> {
    validate_periode(&req)?;

    let mut conn = pool.acquire().await?;
    let mut periode = Periode {
        id: 0,
        tahun_awal: req.tahun_awal,
        tahun_akhir: req.tahun_akhir,
        jenis_periode: req.jenis_periode,
    };
    periode.id = tujuan_opd_repository::create_periode(&mut conn, &periode).await?;

    tracing::info!(
        "Periode created: {} {}-{}",
        periode.jenis_periode,
        periode.tahun_awal,
        periode.tahun_akhir
    );

    Ok(periode.into())
}

pub async fn find_all_periode(pool: &PgPool) -> Result<Vec<PeriodeResponse>> {
    let mut conn = pool.acquire().await?;
    let periode = tujuan_opd_repository::find_all_periode(&mut conn).await?;
    Ok(periode.into_iter().map(Into::into).collect())
}

// =============================================================================
// Tujuan OPD
// =============================================================================

pub fn validate(req: &TujuanOpdRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required("kode_opd", &req.kode_opd)
        .required("tujuan", &req.tujuan);
    for (i, ind) in req.indikator.iter().enumerate() {
        errors.required(&format!("indikator[{}].indikator", i), &ind.indikator);
        for (j, t) in ind.target.iter().enumerate() {
            errors.required(&format!("indikator[{}].target[{}].tahun", i, j), &t.tahun);
        }
    }
    errors.finish()
}

fn indikator_from_request(items: Vec<IndikatorTujuanRequest>) -> Vec<Indikator> {
    items
        .into_iter()
        .map(|ind| {
            let indikator_id = if ind.id.trim().is_empty() {
                id::short_id("IND-TUJ")
            } else {
                ind.id
            };
            Indikator {
                target: ind
                    .target
                    .into_iter()
                    .map(|t| Target {
                        id: if t.id.trim().is_empty() {
                            id::short_id("TRG-TUJ")
                        } else {
                            t.id
                        },
                        indikator_id: indikator_id.clone(),
                        target: t.target,
                        satuan: t.satuan,
                        tahun: t.tahun,
                    })
                    .collect(),
                id: indikator_id,
                indikator: ind.indikator,
                rumus_perhitungan: ind.rumus_perhitungan,
                sumber_data: ind.sumber_data,
                ..Default::default()
            }
        })
        .collect()
}

pub async fn create(pool: &PgPool, req: TujuanOpdRequest) -> Result<TujuanOpdResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;
    let periode = check_references(&mut tx, &req).await?;

    let mut tujuan = TujuanOpd {
        kode_opd: req.kode_opd,
        kode_bidang_urusan: req.kode_bidang_urusan,
        tujuan: req.tujuan,
        periode,
        ..Default::default()
    };
    tujuan.id = tujuan_opd_repository::create(&mut tx, &tujuan).await?;

    let owner = IndikatorOwner::TujuanOpd(tujuan.id);
    for indikator in indikator_from_request(req.indikator) {
        indikator_repository::insert(&mut tx, &owner, &indikator).await?;
    }

    let response = load(&mut tx, tujuan.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Tujuan OPD created: {} for {}",
        response.id_tujuan_opd,
        response.kode_opd
    );

    Ok(response)
}

pub async fn update(pool: &PgPool, id: i32, req: TujuanOpdRequest) -> Result<TujuanOpdResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;
    let periode = check_references(&mut tx, &req).await?;

    let tujuan = TujuanOpd {
        id,
        kode_opd: req.kode_opd,
        kode_bidang_urusan: req.kode_bidang_urusan,
        tujuan: req.tujuan,
        periode,
        ..Default::default()
    };
    if !tujuan_opd_repository::update(&mut tx, &tujuan).await? {
        return Err(ServiceError::not_found("tujuan opd", id));
    }

    let indikator = indikator_from_request(req.indikator);
    indikator_repository::replace_for_owner(&mut tx, &IndikatorOwner::TujuanOpd(id), &indikator)
        .await?;

    let response = load(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Tujuan OPD updated: {}", id);

    Ok(response)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !tujuan_opd_repository::delete(&mut conn, id).await? {
        return Err(ServiceError::not_found("tujuan opd", id));
    }

    tracing::info!("Tujuan OPD deleted: {}", id);
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<TujuanOpdResponse> {
    let mut conn = pool.acquire().await?;
    load(&mut conn, id).await
}

pub async fn find_all(
    pool: &PgPool,
    kode_opd: &str,
    filter: &TujuanOpdFilter,
) -> Result<Vec<TujuanOpdResponse>> {
    let mut conn = pool.acquire().await?;
    let mut tujuan = tujuan_opd_repository::find_by_opd(
        &mut conn,
        kode_opd,
        filter.tahun_awal.as_deref(),
        filter.tahun_akhir.as_deref(),
        filter.jenis_periode.as_deref(),
    )
    .await?;

    let ids: Vec<i32> = tujuan.iter().map(|t| t.id).collect();
    let mut indikator = indikator_repository::find_by_tujuan_ids(&mut conn, &ids).await?;
    for t in tujuan.iter_mut() {
        t.indikator = indikator.remove(&t.id).unwrap_or_default();
    }

    Ok(tujuan.into_iter().map(Into::into).collect())
}

/// OPD must exist; a non-zero periode id must point at a periode
async fn check_references(
    conn: &mut PgConnection,
    req: &TujuanOpdRequest,
) -> Result<Option<Periode>> {
    if !opd_repository::exists(&mut *conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }
    if req.periode_id == 0 {
        return Ok(None);
    }

    let periode = tujuan_opd_repository::find_periode(conn, req.periode_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("periode", req.periode_id))?;
    Ok(Some(periode))
}

async fn load(conn: &mut PgConnection, id: i32) -> Result<TujuanOpdResponse> {
    let mut tujuan = tujuan_opd_repository::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("tujuan opd", id))?;
    tujuan.indikator =
        indikator_repository::find_by_owner(conn, &IndikatorOwner::TujuanOpd(id)).await?;

    Ok(tujuan.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinerja_core::dto::tujuan_opd::TargetTujuanRequest;

    #[test]
    fn test_periode_years_in_order() {
        let mut req = PeriodeRequest {
            tahun_awal: "2025".to_string(),
            tahun_akhir: "2029".to_string(),
            jenis_periode: "RPJMD".to_string(),
        };
        assert!(validate_periode(&req).is_ok());

        req.tahun_akhir = "2024".to_string();
        let msg = validate_periode(&req).unwrap_err().to_string();
        assert_eq!(msg, "tahun_awal must not be after tahun_akhir");
    }

    #[test]
    fn test_targets_need_a_year() {
        let req = TujuanOpdRequest {
            kode_opd: "1.01".to_string(),
            tujuan: "Meningkatkan kualitas layanan".to_string(),
            indikator: vec![IndikatorTujuanRequest {
                indikator: "Indeks kepuasan".to_string(),
                target: vec![TargetTujuanRequest::default()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let msg = validate(&req).unwrap_err().to_string();
        assert_eq!(msg, "indikator[0].target[0].tahun is required");
    }

    #[test]
    fn test_indikator_keeps_target_years() {
        let result = indikator_from_request(vec![IndikatorTujuanRequest {
            indikator: "Indeks kepuasan".to_string(),
            target: vec![
                TargetTujuanRequest {
                    tahun: "2025".to_string(),
                    target: "80".to_string(),
                    ..Default::default()
                },
                TargetTujuanRequest {
                    tahun: "2026".to_string(),
                    target: "82".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }]);
        assert!(result[0].id.starts_with("IND-TUJ-"));
        let years: Vec<&str> = result[0].target.iter().map(|t| t.tahun.as_str()).collect();
        assert_eq!(years, vec!["2025", "2026"]);
    }
}
