//! Master RB Repository
//!
//! An RB row owns its indikator, which own their targets. Updates replace the
//! whole indikator set.

use std::collections::HashMap;

use kinerja_core::domain::master_rb::{IndikatorRb, MasterRb, TargetRb};
use sqlx::PgConnection;

/// Insert the RB row only; returns its id
pub async fn insert(conn: &mut PgConnection, rb: &MasterRb) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO master_rb (jenis_rb, kegiatan_utama, keterangan, tahun_baseline, tahun_next,
                               last_updated_by, current_version)
        VALUES ($1, $2, $3, $4, $5, $6, 1)
        RETURNING id
        "#,
    )
    .bind(&rb.jenis_rb)
    .bind(&rb.kegiatan_utama)
    .bind(&rb.keterangan)
    .bind(rb.tahun_baseline)
    .bind(rb.tahun_next)
    .bind(rb.last_updated_by)
    .fetch_one(conn)
    .await
}

/// Update the RB row and bump its version; returns the new version
pub async fn update(conn: &mut PgConnection, rb: &MasterRb) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE master_rb
        SET jenis_rb = $1, kegiatan_utama = $2, keterangan = $3, tahun_baseline = $4,
            tahun_next = $5, last_updated_by = $6, current_version = current_version + 1,
            updated_at = now()
        WHERE id = $7
        RETURNING current_version
        "#,
    )
    .bind(&rb.jenis_rb)
    .bind(&rb.kegiatan_utama)
    .bind(&rb.keterangan)
    .bind(rb.tahun_baseline)
    .bind(rb.tahun_next)
    .bind(rb.last_updated_by)
    .bind(rb.id)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM master_rb WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn insert_indikator(
    conn: &mut PgConnection,
    indikator: &IndikatorRb,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO indikator_rb (id, id_rb, indikator) VALUES ($1, $2, $3)")
        .bind(&indikator.id_indikator)
        .bind(indikator.id_rb)
        .bind(&indikator.indikator)
        .execute(&mut *conn)
        .await?;

    for target in &indikator.target_rb {
        sqlx::query(
            r#"
            INSERT INTO target_rb (id, id_indikator, tahun_baseline, target_baseline,
                                   realisasi_baseline, satuan_baseline, tahun_next, target_next,
                                   satuan_next)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&target.id_target)
        .bind(&target.id_indikator)
        .bind(target.tahun_baseline)
        .bind(target.target_baseline)
        .bind(target.realisasi_baseline)
        .bind(&target.satuan_baseline)
        .bind(target.tahun_next)
        .bind(target.target_next)
        .bind(&target.satuan_next)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub async fn delete_indikator(conn: &mut PgConnection, id_rb: i32) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM indikator_rb WHERE id_rb = $1")
        .bind(id_rb)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<MasterRb>, sqlx::Error> {
    let row = sqlx::query_as::<_, MasterRbRow>(
        r#"
        SELECT id, jenis_rb, kegiatan_utama, keterangan, tahun_baseline, tahun_next,
               last_updated_by, current_version
        FROM master_rb
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut items = vec![MasterRb::from(row)];
    attach_indikator(conn, &mut items).await?;

    Ok(items.pop())
}

/// RB rows whose baseline..next range covers `tahun`
pub async fn find_all_by_tahun(conn: &mut PgConnection, tahun: i32) -> Result<Vec<MasterRb>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MasterRbRow>(
        r#"
        SELECT id, jenis_rb, kegiatan_utama, keterangan, tahun_baseline, tahun_next,
               last_updated_by, current_version
        FROM master_rb
        WHERE tahun_baseline <= $1 AND tahun_next >= $1
        ORDER BY id ASC
        "#,
    )
    .bind(tahun)
    .fetch_all(&mut *conn)
    .await?;

    let mut items: Vec<MasterRb> = rows.into_iter().map(Into::into).collect();
    attach_indikator(conn, &mut items).await?;

    Ok(items)
}

async fn attach_indikator(conn: &mut PgConnection, items: &mut [MasterRb]) -> Result<(), sqlx::Error> {
    let ids: Vec<i32> = items.iter().map(|rb| rb.id).collect();

    let indikator_rows = sqlx::query_as::<_, IndikatorRbRow>(
        "SELECT id, id_rb, indikator FROM indikator_rb WHERE id_rb = ANY($1) ORDER BY seq",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let indikator_ids: Vec<String> = indikator_rows.iter().map(|r| r.id.clone()).collect();
    let target_rows = sqlx::query_as::<_, TargetRbRow>(
        r#"
        SELECT id, id_indikator, tahun_baseline, target_baseline, realisasi_baseline,
               satuan_baseline, tahun_next, target_next, satuan_next
        FROM target_rb
        WHERE id_indikator = ANY($1)
        ORDER BY seq
        "#,
    )
    .bind(&indikator_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut targets: HashMap<String, Vec<TargetRb>> = HashMap::new();
    for row in target_rows {
        targets
            .entry(row.id_indikator.clone())
            .or_default()
            .push(row.into());
    }

    let mut indikator: HashMap<i32, Vec<IndikatorRb>> = HashMap::new();
    for row in indikator_rows {
        let mut item = IndikatorRb::from(row);
        item.target_rb = targets.remove(&item.id_indikator).unwrap_or_default();
        indikator.entry(item.id_rb).or_default().push(item);
    }

    for rb in items.iter_mut() {
        rb.indikator = indikator.remove(&rb.id).unwrap_or_default();
    }

    Ok(())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct MasterRbRow {
    id: i32,
    jenis_rb: String,
    kegiatan_utama: String,
    keterangan: String,
    tahun_baseline: i32,
    tahun_next: i32,
    last_updated_by: i32,
    current_version: i32,
}

impl From<MasterRbRow> for MasterRb {
    fn from(row: MasterRbRow) -> Self {
        MasterRb {
            id: row.id,
            jenis_rb: row.jenis_rb,
            kegiatan_utama: row.kegiatan_utama,
            keterangan: row.keterangan,
            tahun_baseline: row.tahun_baseline,
            tahun_next: row.tahun_next,
            last_updated_by: row.last_updated_by,
            current_version: row.current_version,
            indikator: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct IndikatorRbRow {
    id: String,
    id_rb: i32,
    indikator: String,
}

impl From<IndikatorRbRow> for IndikatorRb {
    fn from(row: IndikatorRbRow) -> Self {
        IndikatorRb {
            id_indikator: row.id,
            id_rb: row.id_rb,
            indikator: row.indikator,
            target_rb: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TargetRbRow {
    id: String,
    id_indikator: String,
    tahun_baseline: i32,
    target_baseline: i32,
    realisasi_baseline: f32,
    satuan_baseline: String,
    tahun_next: i32,
    target_next: i32,
    satuan_next: String,
}

impl From<TargetRbRow> for TargetRb {
    fn from(row: TargetRbRow) -> Self {
        TargetRb {
            id_target: row.id,
            id_indikator: row.id_indikator,
            tahun_baseline: row.tahun_baseline,
            target_baseline: row.target_baseline,
            realisasi_baseline: row.realisasi_baseline,
            satuan_baseline: row.satuan_baseline,
            tahun_next: row.tahun_next,
            target_next: row.target_next,
            satuan_next: row.satuan_next,
        }
    }
}
