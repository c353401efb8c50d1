//! Sub Kegiatan Repository
//!
//! Sub kegiatan with their pagu rows, the links from rencana kinerja to the
//! sub kegiatan funding them, and the sub kegiatan each OPD picked per year.

use std::collections::HashMap;

use kinerja_core::domain::program::{
    PaguRekin, PaguSubKegiatan, RekinSubKegiatan, SubKegiatan, SubKegiatanOpd,
};
use sqlx::PgConnection;

pub async fn create(conn: &mut PgConnection, sub: &SubKegiatan) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sub_kegiatan (id, kode_subkegiatan, nama_subkegiatan, status)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&sub.id)
    .bind(&sub.kode_subkegiatan)
    .bind(&sub.nama_subkegiatan)
    .bind(&sub.status)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut PgConnection, sub: &SubKegiatan) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE sub_kegiatan
        SET kode_subkegiatan = $1, nama_subkegiatan = $2, status = $3
        WHERE id = $4
        "#,
    )
    .bind(&sub.kode_subkegiatan)
    .bind(&sub.nama_subkegiatan)
    .bind(&sub.status)
    .bind(&sub.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sub_kegiatan WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(conn: &mut PgConnection, id: &str) -> Result<Option<SubKegiatan>, sqlx::Error> {
    let row = sqlx::query_as::<_, SubKegiatanRow>(
        "SELECT id, kode_subkegiatan, nama_subkegiatan, status FROM sub_kegiatan WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_by_kode(
    conn: &mut PgConnection,
    kode_subkegiatan: &str,
) -> Result<Option<SubKegiatan>, sqlx::Error> {
    let row = sqlx::query_as::<_, SubKegiatanRow>(
        r#"
        SELECT id, kode_subkegiatan, nama_subkegiatan, status
        FROM sub_kegiatan
        WHERE kode_subkegiatan = $1
        "#,
    )
    .bind(kode_subkegiatan)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<SubKegiatan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SubKegiatanRow>(
        r#"
        SELECT id, kode_subkegiatan, nama_subkegiatan, status
        FROM sub_kegiatan
        ORDER BY kode_subkegiatan ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Pagu
// =============================================================================

pub async fn insert_pagu(conn: &mut PgConnection, pagu: &PaguSubKegiatan) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pagu_sub_kegiatan (id, sub_kegiatan_id, jenis_pagu, pagu_anggaran, tahun)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&pagu.id)
    .bind(&pagu.sub_kegiatan_id)
    .bind(&pagu.jenis_pagu)
    .bind(pagu.pagu_anggaran)
    .bind(&pagu.tahun)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn delete_pagu(conn: &mut PgConnection, sub_kegiatan_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM pagu_sub_kegiatan WHERE sub_kegiatan_id = $1")
        .bind(sub_kegiatan_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn find_pagu(
    conn: &mut PgConnection,
    sub_kegiatan_id: &str,
) -> Result<Vec<PaguSubKegiatan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PaguRow>(
        r#"
        SELECT id, sub_kegiatan_id, jenis_pagu, pagu_anggaran, tahun
        FROM pagu_sub_kegiatan
        WHERE sub_kegiatan_id = $1
        ORDER BY tahun, jenis_pagu
        "#,
    )
    .bind(sub_kegiatan_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Rencana kinerja links
// =============================================================================

pub async fn link_rekin(conn: &mut PgConnection, link: &RekinSubKegiatan) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO rekin_sub_kegiatan (id, rekin_id, kode_subkegiatan)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&link.id)
    .bind(&link.rekin_id)
    .bind(&link.kode_subkegiatan)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn unlink_rekin(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM rekin_sub_kegiatan WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// First linked sub kegiatan of each plan, keyed by rencana kinerja id
pub async fn find_links_by_rekin_ids(
    conn: &mut PgConnection,
    rekin_ids: &[String],
) -> Result<HashMap<String, RekinSubKegiatan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RekinLinkRow>(
        r#"
        SELECT DISTINCT ON (rs.rekin_id)
               rs.id, rs.rekin_id, rs.kode_subkegiatan, sk.nama_subkegiatan
        FROM rekin_sub_kegiatan rs
        JOIN sub_kegiatan sk ON sk.kode_subkegiatan = rs.kode_subkegiatan
        WHERE rs.rekin_id = ANY($1)
        ORDER BY rs.rekin_id, rs.id
        "#,
    )
    .bind(rekin_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| (r.rekin_id.clone(), RekinSubKegiatan::from(r)))
        .collect())
}

/// Pagu of the sub kegiatan linked to the given plans, one row per sub
/// kegiatan however many plans share it. Only pagu rows of the linking plan's
/// year count; `rekin_id` is the lowest plan id linking the sub kegiatan.
pub async fn find_pagu_by_rekin_ids(
    conn: &mut PgConnection,
    rekin_ids: &[String],
) -> Result<Vec<PaguRekin>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PaguRekinRow>(
        r#"
        WITH linked AS (
            SELECT DISTINCT ON (rs.kode_subkegiatan) rs.kode_subkegiatan, rs.rekin_id, rk.tahun
            FROM rekin_sub_kegiatan rs
            JOIN rencana_kinerja rk ON rk.id = rs.rekin_id
            WHERE rs.rekin_id = ANY($1)
            ORDER BY rs.kode_subkegiatan, rs.rekin_id
        )
        SELECT l.rekin_id, sk.kode_subkegiatan, sk.nama_subkegiatan,
               COALESCE(SUM(pg.pagu_anggaran), 0)::BIGINT AS pagu
        FROM linked l
        JOIN sub_kegiatan sk ON sk.kode_subkegiatan = l.kode_subkegiatan
        LEFT JOIN pagu_sub_kegiatan pg ON pg.sub_kegiatan_id = sk.id AND pg.tahun = l.tahun
        GROUP BY l.rekin_id, sk.kode_subkegiatan, sk.nama_subkegiatan
        ORDER BY sk.kode_subkegiatan
        "#,
    )
    .bind(rekin_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Sub kegiatan terpilih OPD
// =============================================================================

const SELECT_SUB_OPD: &str = r#"
    SELECT so.id, so.kode_subkegiatan, COALESCE(sk.nama_subkegiatan, '') AS nama_subkegiatan,
           so.kode_opd, COALESCE(o.nama_opd, '') AS nama_opd, so.tahun
    FROM sub_kegiatan_opd so
    LEFT JOIN sub_kegiatan sk ON sk.kode_subkegiatan = so.kode_subkegiatan
    LEFT JOIN opd o ON o.kode_opd = so.kode_opd
"#;

pub async fn create_opd_selection(
    conn: &mut PgConnection,
    selection: &SubKegiatanOpd,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO sub_kegiatan_opd (kode_subkegiatan, kode_opd, tahun)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&selection.kode_subkegiatan)
    .bind(&selection.kode_opd)
    .bind(&selection.tahun)
    .fetch_one(conn)
    .await
}

pub async fn update_opd_selection(
    conn: &mut PgConnection,
    selection: &SubKegiatanOpd,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE sub_kegiatan_opd
        SET kode_subkegiatan = $1, kode_opd = $2, tahun = $3
        WHERE id = $4
        "#,
    )
    .bind(&selection.kode_subkegiatan)
    .bind(&selection.kode_opd)
    .bind(&selection.tahun)
    .bind(selection.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_opd_selection(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sub_kegiatan_opd WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_opd_selection(
    conn: &mut PgConnection,
    id: i32,
) -> Result<Option<SubKegiatanOpd>, sqlx::Error> {
    let sql = format!("{} WHERE so.id = $1", SELECT_SUB_OPD);
    let row = sqlx::query_as::<_, SubKegiatanOpdRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_opd_selections(
    conn: &mut PgConnection,
    kode_opd: &str,
    tahun: &str,
) -> Result<Vec<SubKegiatanOpd>, sqlx::Error> {
    let sql = format!(
        "{} WHERE so.kode_opd = $1 AND so.tahun = $2 ORDER BY so.kode_subkegiatan",
        SELECT_SUB_OPD
    );
    let rows = sqlx::query_as::<_, SubKegiatanOpdRow>(&sql)
        .bind(kode_opd)
        .bind(tahun)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct SubKegiatanRow {
    id: String,
    kode_subkegiatan: String,
    nama_subkegiatan: String,
    status: String,
}

impl From<SubKegiatanRow> for SubKegiatan {
    fn from(row: SubKegiatanRow) -> Self {
        SubKegiatan {
            id: row.id,
            kode_subkegiatan: row.kode_subkegiatan,
            nama_subkegiatan: row.nama_subkegiatan,
            status: row.status,
            indikator: Vec::new(),
            pagu: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct PaguRow {
    id: String,
    sub_kegiatan_id: String,
    jenis_pagu: String,
    pagu_anggaran: i64,
    tahun: String,
}

impl From<PaguRow> for PaguSubKegiatan {
    fn from(row: PaguRow) -> Self {
        PaguSubKegiatan {
            id: row.id,
            sub_kegiatan_id: row.sub_kegiatan_id,
            jenis_pagu: row.jenis_pagu,
            pagu_anggaran: row.pagu_anggaran,
            tahun: row.tahun,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RekinLinkRow {
    id: String,
    rekin_id: String,
    kode_subkegiatan: String,
    nama_subkegiatan: String,
}

impl From<RekinLinkRow> for RekinSubKegiatan {
    fn from(row: RekinLinkRow) -> Self {
        RekinSubKegiatan {
            id: row.id,
            rekin_id: row.rekin_id,
            kode_subkegiatan: row.kode_subkegiatan,
            nama_subkegiatan: row.nama_subkegiatan,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PaguRekinRow {
    rekin_id: String,
    kode_subkegiatan: String,
    nama_subkegiatan: String,
    pagu: i64,
}

impl From<PaguRekinRow> for PaguRekin {
    fn from(row: PaguRekinRow) -> Self {
        PaguRekin {
            rekin_id: row.rekin_id,
            kode_subkegiatan: row.kode_subkegiatan,
            nama_subkegiatan: row.nama_subkegiatan,
            pagu: row.pagu,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubKegiatanOpdRow {
    id: i32,
    kode_subkegiatan: String,
    nama_subkegiatan: String,
    kode_opd: String,
    nama_opd: String,
    tahun: String,
}

impl From<SubKegiatanOpdRow> for SubKegiatanOpd {
    fn from(row: SubKegiatanOpdRow) -> Self {
        SubKegiatanOpd {
            id: row.id,
            kode_subkegiatan: row.kode_subkegiatan,
            nama_subkegiatan: row.nama_subkegiatan,
            kode_opd: row.kode_opd,
            nama_opd: row.nama_opd,
            tahun: row.tahun,
        }
    }
}
