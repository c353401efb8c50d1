//! Program and Kegiatan Repository

use std::collections::HashMap;

use kinerja_core::domain::program::{Kegiatan, Program};
use sqlx::PgConnection;

// =============================================================================
// Program
// =============================================================================

pub async fn create_program(conn: &mut PgConnection, program: &Program) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO program (id, kode_program, nama_program, kode_opd, tahun, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&program.id)
    .bind(&program.kode_program)
    .bind(&program.nama_program)
    .bind(&program.kode_opd)
    .bind(&program.tahun)
    .bind(program.is_active)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update_program(conn: &mut PgConnection, program: &Program) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE program
        SET kode_program = $1, nama_program = $2, kode_opd = $3, tahun = $4, is_active = $5
        WHERE id = $6
        "#,
    )
    .bind(&program.kode_program)
    .bind(&program.nama_program)
    .bind(&program.kode_opd)
    .bind(&program.tahun)
    .bind(program.is_active)
    .bind(&program.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_program(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM program WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_program_by_id(
    conn: &mut PgConnection,
    id: &str,
) -> Result<Option<Program>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProgramRow>(
        r#"
        SELECT id, kode_program, nama_program, kode_opd, tahun, is_active
        FROM program
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all_programs(conn: &mut PgConnection) -> Result<Vec<Program>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProgramRow>(
        r#"
        SELECT id, kode_program, nama_program, kode_opd, tahun, is_active
        FROM program
        ORDER BY kode_program ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Program names keyed by program code
pub async fn find_program_names(
    conn: &mut PgConnection,
    kode_program: &[String],
) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT kode_program, nama_program FROM program WHERE kode_program = ANY($1)",
    )
    .bind(kode_program)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().collect())
}

// =============================================================================
// Kegiatan
// =============================================================================

pub async fn create_kegiatan(conn: &mut PgConnection, kegiatan: &Kegiatan) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO kegiatan (id, kode_kegiatan, nama_kegiatan, kode_opd)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&kegiatan.id)
    .bind(&kegiatan.kode_kegiatan)
    .bind(&kegiatan.nama_kegiatan)
    .bind(&kegiatan.kode_opd)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update_kegiatan(conn: &mut PgConnection, kegiatan: &Kegiatan) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE kegiatan
        SET kode_kegiatan = $1, nama_kegiatan = $2, kode_opd = $3
        WHERE id = $4
        "#,
    )
    .bind(&kegiatan.kode_kegiatan)
    .bind(&kegiatan.nama_kegiatan)
    .bind(&kegiatan.kode_opd)
    .bind(&kegiatan.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_kegiatan(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM kegiatan WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_kegiatan_by_id(
    conn: &mut PgConnection,
    id: &str,
) -> Result<Option<Kegiatan>, sqlx::Error> {
    let row = sqlx::query_as::<_, KegiatanRow>(
        "SELECT id, kode_kegiatan, nama_kegiatan, kode_opd FROM kegiatan WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all_kegiatan(conn: &mut PgConnection) -> Result<Vec<Kegiatan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, KegiatanRow>(
        "SELECT id, kode_kegiatan, nama_kegiatan, kode_opd FROM kegiatan ORDER BY kode_kegiatan",
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Kegiatan names keyed by kegiatan code
pub async fn find_kegiatan_names(
    conn: &mut PgConnection,
    kode_kegiatan: &[String],
) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT kode_kegiatan, nama_kegiatan FROM kegiatan WHERE kode_kegiatan = ANY($1)",
    )
    .bind(kode_kegiatan)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProgramRow {
    id: String,
    kode_program: String,
    nama_program: String,
    kode_opd: String,
    tahun: String,
    is_active: bool,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Program {
            id: row.id,
            kode_program: row.kode_program,
            nama_program: row.nama_program,
            kode_opd: row.kode_opd,
            tahun: row.tahun,
            is_active: row.is_active,
            indikator: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct KegiatanRow {
    id: String,
    kode_kegiatan: String,
    nama_kegiatan: String,
    kode_opd: String,
}

impl From<KegiatanRow> for Kegiatan {
    fn from(row: KegiatanRow) -> Self {
        Kegiatan {
            id: row.id,
            kode_kegiatan: row.kode_kegiatan,
            nama_kegiatan: row.nama_kegiatan,
            kode_opd: row.kode_opd,
            indikator: Vec::new(),
        }
    }
}
