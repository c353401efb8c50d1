//! Datamaster Service
//!
//! Master RB (reformasi birokrasi) entries. Every save replaces the whole
//! indikator set and stamps the editing user; updates bump the version.

use kinerja_core::domain::master_rb::MasterRb;
use kinerja_core::dto::datamaster::{RbRequest, RbResponse, convert_rb_request_to_master};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::master_rb_repository;

/// Each indikator needs a name and at least one target
pub fn validate(req: &RbRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required("jenis_rb", &req.jenis_rb)
        .required("kegiatan_utama", &req.kegiatan_utama)
        .required_num("tahun_baseline", req.tahun_baseline)
        .required_num("tahun_next", req.tahun_next)
        .non_empty("indikator", &req.indikator);
    for (i, ind) in req.indikator.iter().enumerate() {
        errors
            .required(&format!("indikator[{}].indikator", i), &ind.indikator)
            .non_empty(&format!("indikator[{}].target", i), &ind.target);
    }
    errors.finish()
}

/// Give every indikator and target of `rb` a fresh id under `rb.id`
fn assign_ids(rb: &mut MasterRb) {
    for ind in rb.indikator.iter_mut() {
        ind.id_rb = rb.id;
        ind.id_indikator = id::generate_id("IND-RB");
        for target in ind.target_rb.iter_mut() {
            target.id_target = id::generate_id("TRGT-RB");
            target.id_indikator = ind.id_indikator.clone();
        }
    }
}

pub async fn create(pool: &PgPool, req: RbRequest, user_id: i32) -> Result<RbResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;

    let mut rb = convert_rb_request_to_master(req, user_id);
    rb.id = master_rb_repository::insert(&mut tx, &rb).await?;
    write_indikator(&mut tx, &mut rb).await?;
    tx.commit().await?;

    tracing::info!(
        "Master RB created: {} ({}) by user {}",
        rb.id,
        rb.jenis_rb,
        user_id
    );

    Ok(rb.into())
}

pub async fn update(pool: &PgPool, id: i32, req: RbRequest, user_id: i32) -> Result<RbResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;

    let mut rb = convert_rb_request_to_master(req, user_id);
    rb.id = id;
    rb.current_version = master_rb_repository::update(&mut tx, &rb)
        .await?
        .ok_or_else(|| ServiceError::not_found("master rb", id))?;

    master_rb_repository::delete_indikator(&mut tx, id).await?;
    write_indikator(&mut tx, &mut rb).await?;
    tx.commit().await?;

    tracing::info!(
        "Master RB updated: {} (version {}) by user {}",
        id,
        rb.current_version,
        user_id
    );

    Ok(rb.into())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !master_rb_repository::delete(&mut conn, id).await? {
        return Err(ServiceError::not_found("master rb", id));
    }

    tracing::info!("Master RB deleted: {}", id);
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<RbResponse> {
    let mut conn = pool.acquire().await?;
    let rb = master_rb_repository::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("master rb", id))?;

    Ok(rb.into())
}

/// Entries whose baseline..next range covers `tahun`
pub async fn find_all_by_tahun(pool: &PgPool, tahun: i32) -> Result<Vec<RbResponse>> {
    let mut conn = pool.acquire().await?;
    let items = master_rb_repository::find_all_by_tahun(&mut conn, tahun).await?;
    Ok(items.into_iter().map(Into::into).collect())
}

async fn write_indikator(conn: &mut PgConnection, rb: &mut MasterRb) -> Result<()> {
    assign_ids(rb);
    for ind in &rb.indikator {
        master_rb_repository::insert_indikator(&mut *conn, ind).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinerja_core::dto::datamaster::{IndikatorRbRequest, TargetRbRequest};

    fn request() -> RbRequest {
        RbRequest {
            jenis_rb: "RB Tematik".to_string(),
            kegiatan_utama: "Penanggulangan kemiskinan".to_string(),
            tahun_baseline: 2024,
            tahun_next: 2025,
            indikator: vec![IndikatorRbRequest {
                indikator: "Persentase penduduk miskin".to_string(),
                target: vec![TargetRbRequest {
                    target_baseline: Some(10),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn test_indikator_list_must_not_be_empty() {
        let req = RbRequest {
            indikator: Vec::new(),
            ..request()
        };
        let msg = validate(&req).unwrap_err().to_string();
        assert_eq!(msg, "indikator must contain at least one item");
    }

    #[test]
    fn test_each_indikator_needs_name_and_target() {
        let mut req = request();
        req.indikator.push(IndikatorRbRequest::default());
        let msg = validate(&req).unwrap_err().to_string();
        assert_eq!(
            msg,
            "indikator[1].indikator is required; indikator[1].target must contain at least one item"
        );
    }

    #[test]
    fn test_scalar_fields_required() {
        let msg = validate(&RbRequest::default()).unwrap_err().to_string();
        for field in ["jenis_rb", "kegiatan_utama", "tahun_baseline", "tahun_next"] {
            assert!(msg.contains(&format!("{} is required", field)), "{}", msg);
        }
    }

    #[test]
    fn test_assigned_ids_link_children_to_parents() {
        let mut rb = convert_rb_request_to_master(request(), 5);
        rb.id = 12;
        assign_ids(&mut rb);

        let ind = &rb.indikator[0];
        assert_eq!(ind.id_rb, 12);
        assert!(ind.id_indikator.starts_with("IND-RB-"));
        assert!(ind.target_rb[0].id_target.starts_with("TRGT-RB-"));
        assert_eq!(ind.target_rb[0].id_indikator, ind.id_indikator);
    }
}
