//! Pegawai Repository
//!
//! Employees and the positions they hold per month.

use std::collections::HashMap;

use kinerja_core::domain::pegawai::{JabatanPegawai, Pegawai};
use sqlx::PgConnection;

const SELECT_PEGAWAI: &str = r#"
    SELECT p.id, p.nama_pegawai, p.nip, p.kode_opd, COALESCE(o.nama_opd, '') AS nama_opd
    FROM pegawai p
    LEFT JOIN opd o ON o.kode_opd = p.kode_opd
"#;

pub async fn create(conn: &mut PgConnection, pegawai: &Pegawai) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pegawai (id, nama_pegawai, nip, kode_opd)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&pegawai.id)
    .bind(&pegawai.nama_pegawai)
    .bind(&pegawai.nip)
    .bind(&pegawai.kode_opd)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut PgConnection, pegawai: &Pegawai) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE pegawai
        SET nama_pegawai = $1, nip = $2, kode_opd = $3
        WHERE id = $4
        "#,
    )
    .bind(&pegawai.nama_pegawai)
    .bind(&pegawai.nip)
    .bind(&pegawai.kode_opd)
    .bind(&pegawai.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pegawai WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(conn: &mut PgConnection, id: &str) -> Result<Option<Pegawai>, sqlx::Error> {
    let sql = format!("{} WHERE p.id = $1", SELECT_PEGAWAI);
    let row = sqlx::query_as::<_, PegawaiRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_by_nip(conn: &mut PgConnection, nip: &str) -> Result<Option<Pegawai>, sqlx::Error> {
    let sql = format!("{} WHERE p.nip = $1", SELECT_PEGAWAI);
    let row = sqlx::query_as::<_, PegawaiRow>(&sql)
        .bind(nip)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all(
    conn: &mut PgConnection,
    kode_opd: Option<&str>,
) -> Result<Vec<Pegawai>, sqlx::Error> {
    let sql = format!(
        "{} WHERE ($1::text IS NULL OR p.kode_opd = $1) ORDER BY p.nama_pegawai ASC",
        SELECT_PEGAWAI
    );
    let rows = sqlx::query_as::<_, PegawaiRow>(&sql)
        .bind(kode_opd)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Employees by id, keyed by id; unknown ids are simply absent
pub async fn find_by_ids(
    conn: &mut PgConnection,
    ids: &[String],
) -> Result<HashMap<String, Pegawai>, sqlx::Error> {
    let sql = format!("{} WHERE p.id = ANY($1)", SELECT_PEGAWAI);
    let rows = sqlx::query_as::<_, PegawaiRow>(&sql)
        .bind(ids)
        .fetch_all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| (r.id.clone(), Pegawai::from(r)))
        .collect())
}

// =============================================================================
// Jabatan assignments
// =============================================================================

pub async fn add_jabatan(
    conn: &mut PgConnection,
    assignment: &JabatanPegawai,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO jabatan_pegawai (nip, id_jabatan, bulan, tahun, kode_opd)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&assignment.nip)
    .bind(&assignment.id_jabatan)
    .bind(assignment.bulan)
    .bind(assignment.tahun)
    .bind(&assignment.kode_opd)
    .fetch_one(conn)
    .await
}

/// Position history of one employee, most recent first
pub async fn find_jabatan(
    conn: &mut PgConnection,
    nip: &str,
) -> Result<Vec<JabatanPegawai>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JabatanPegawaiRow>(
        r#"
        SELECT jp.id, jp.nip, jp.id_jabatan, j.nama_jabatan, jp.bulan, jp.tahun, jp.kode_opd
        FROM jabatan_pegawai jp
        JOIN jabatan j ON j.id = jp.id_jabatan
        WHERE jp.nip = $1
        ORDER BY jp.tahun DESC, jp.bulan DESC
        "#,
    )
    .bind(nip)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PegawaiRow {
    id: String,
    nama_pegawai: String,
    nip: String,
    kode_opd: String,
    nama_opd: String,
}

impl From<PegawaiRow> for Pegawai {
    fn from(row: PegawaiRow) -> Self {
        Pegawai {
            id: row.id,
            nama_pegawai: row.nama_pegawai,
            nip: row.nip,
            kode_opd: row.kode_opd,
            nama_opd: row.nama_opd,
            jabatan: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct JabatanPegawaiRow {
    id: i32,
    nip: String,
    id_jabatan: String,
    nama_jabatan: String,
    bulan: i32,
    tahun: i32,
    kode_opd: String,
}

impl From<JabatanPegawaiRow> for JabatanPegawai {
    fn from(row: JabatanPegawaiRow) -> Self {
        JabatanPegawai {
            id: row.id,
            nip: row.nip,
            id_jabatan: row.id_jabatan,
            nama_jabatan: row.nama_jabatan,
            bulan: row.bulan,
            tahun: row.tahun,
            kode_opd: row.kode_opd,
        }
    }
}
