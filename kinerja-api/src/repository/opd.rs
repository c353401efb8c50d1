//! OPD Repository

use kinerja_core::domain::opd::Opd;
use sqlx::PgConnection;
use uuid::Uuid;

pub async fn create(conn: &mut PgConnection, opd: &Opd) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO opd (id, kode_opd, nama_opd, singkatan, alamat, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(opd.id)
    .bind(&opd.kode_opd)
    .bind(&opd.nama_opd)
    .bind(&opd.singkatan)
    .bind(&opd.alamat)
    .bind(opd.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Update an OPD selected by its current `kode_opd`
pub async fn update(conn: &mut PgConnection, kode_opd: &str, opd: &Opd) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE opd
        SET kode_opd = $1, nama_opd = $2, singkatan = $3, alamat = $4
        WHERE kode_opd = $5
        "#,
    )
    .bind(&opd.kode_opd)
    .bind(&opd.nama_opd)
    .bind(&opd.singkatan)
    .bind(&opd.alamat)
    .bind(kode_opd)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut PgConnection, kode_opd: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM opd WHERE kode_opd = $1")
        .bind(kode_opd)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_kode(conn: &mut PgConnection, kode_opd: &str) -> Result<Option<Opd>, sqlx::Error> {
    let row = sqlx::query_as::<_, OpdRow>(
        r#"
        SELECT id, kode_opd, nama_opd, singkatan, alamat, created_at
        FROM opd
        WHERE kode_opd = $1
        "#,
    )
    .bind(kode_opd)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Opd>, sqlx::Error> {
    let rows = sqlx::query_as::<_, OpdRow>(
        r#"
        SELECT id, kode_opd, nama_opd, singkatan, alamat, created_at
        FROM opd
        ORDER BY kode_opd ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

pub async fn exists(conn: &mut PgConnection, kode_opd: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM opd WHERE kode_opd = $1)")
        .bind(kode_opd)
        .fetch_one(conn)
        .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct OpdRow {
    id: Uuid,
    kode_opd: String,
    nama_opd: String,
    singkatan: String,
    alamat: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<OpdRow> for Opd {
    fn from(row: OpdRow) -> Self {
        Opd {
            id: row.id,
            kode_opd: row.kode_opd,
            nama_opd: row.nama_opd,
            singkatan: row.singkatan,
            alamat: row.alamat,
            created_at: row.created_at,
        }
    }
}
