//! Jabatan Repository

use kinerja_core::domain::pegawai::Jabatan;
use sqlx::PgConnection;

const SELECT_JABATAN: &str = r#"
    SELECT id, kode_jabatan, nama_jabatan, kode_opd, kelas_jabatan, jenis_jabatan, nilai_jabatan
    FROM jabatan
"#;

pub async fn create(conn: &mut PgConnection, jabatan: &Jabatan) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO jabatan (id, kode_jabatan, nama_jabatan, kode_opd, kelas_jabatan,
                             jenis_jabatan, nilai_jabatan)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&jabatan.id)
    .bind(&jabatan.kode_jabatan)
    .bind(&jabatan.nama_jabatan)
    .bind(&jabatan.kode_opd)
    .bind(&jabatan.kelas_jabatan)
    .bind(&jabatan.jenis_jabatan)
    .bind(jabatan.nilai_jabatan)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut PgConnection, jabatan: &Jabatan) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE jabatan
        SET kode_jabatan = $1, nama_jabatan = $2, kode_opd = $3, kelas_jabatan = $4,
            jenis_jabatan = $5, nilai_jabatan = $6
        WHERE id = $7
        "#,
    )
    .bind(&jabatan.kode_jabatan)
    .bind(&jabatan.nama_jabatan)
    .bind(&jabatan.kode_opd)
    .bind(&jabatan.kelas_jabatan)
    .bind(&jabatan.jenis_jabatan)
    .bind(jabatan.nilai_jabatan)
    .bind(&jabatan.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jabatan WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(conn: &mut PgConnection, id: &str) -> Result<Option<Jabatan>, sqlx::Error> {
    let sql = format!("{} WHERE id = $1", SELECT_JABATAN);
    let row = sqlx::query_as::<_, JabatanRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// All positions, optionally limited to one OPD
pub async fn find_all(
    conn: &mut PgConnection,
    kode_opd: Option<&str>,
) -> Result<Vec<Jabatan>, sqlx::Error> {
    let sql = format!(
        "{} WHERE ($1::text IS NULL OR kode_opd = $1) ORDER BY nama_jabatan ASC",
        SELECT_JABATAN
    );
    let rows = sqlx::query_as::<_, JabatanRow>(&sql)
        .bind(kode_opd)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JabatanRow {
    id: String,
    kode_jabatan: String,
    nama_jabatan: String,
    kode_opd: String,
    kelas_jabatan: String,
    jenis_jabatan: String,
    nilai_jabatan: i32,
}

impl From<JabatanRow> for Jabatan {
    fn from(row: JabatanRow) -> Self {
        Jabatan {
            id: row.id,
            kode_jabatan: row.kode_jabatan,
            nama_jabatan: row.nama_jabatan,
            kode_opd: row.kode_opd,
            kelas_jabatan: row.kelas_jabatan,
            jenis_jabatan: row.jenis_jabatan,
            nilai_jabatan: row.nilai_jabatan,
        }
    }
}
