//! Periode and Tujuan OPD Repository

use kinerja_core::domain::tujuan_opd::{Periode, TujuanOpd};
use sqlx::PgConnection;

// =============================================================================
// Periode
// =============================================================================

pub async fn create_periode(conn: &mut PgConnection, periode: &Periode) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO periode (tahun_awal, tahun_akhir, jenis_periode)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&periode.tahun_awal)
    .bind(&periode.tahun_akhir)
    .bind(&periode.jenis_periode)
    .fetch_one(conn)
    .await
}

pub async fn find_periode(conn: &mut PgConnection, id: i32) -> Result<Option<Periode>, sqlx::Error> {
    let row = sqlx::query_as::<_, PeriodeRow>(
        "SELECT id, tahun_awal, tahun_akhir, jenis_periode FROM periode WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all_periode(conn: &mut PgConnection) -> Result<Vec<Periode>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PeriodeRow>(
        r#"
        SELECT id, tahun_awal, tahun_akhir, jenis_periode
        FROM periode
        ORDER BY tahun_awal ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Tujuan OPD
// =============================================================================

const SELECT_TUJUAN: &str = r#"
    SELECT t.id, t.kode_opd, COALESCE(o.nama_opd, '') AS nama_opd, t.kode_bidang_urusan,
           t.tujuan, p.id AS periode_id, p.tahun_awal, p.tahun_akhir, p.jenis_periode
    FROM tujuan_opd t
    LEFT JOIN opd o ON o.kode_opd = t.kode_opd
    LEFT JOIN periode p ON p.id = t.periode_id
"#;

pub async fn create(conn: &mut PgConnection, tujuan: &TujuanOpd) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO tujuan_opd (kode_opd, kode_bidang_urusan, tujuan, periode_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&tujuan.kode_opd)
    .bind(&tujuan.kode_bidang_urusan)
    .bind(&tujuan.tujuan)
    .bind(tujuan.periode.as_ref().map(|p| p.id))
    .fetch_one(conn)
    .await
}

pub async fn update(conn: &mut PgConnection, tujuan: &TujuanOpd) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE tujuan_opd
        SET kode_opd = $1, kode_bidang_urusan = $2, tujuan = $3, periode_id = $4
        WHERE id = $5
        "#,
    )
    .bind(&tujuan.kode_opd)
    .bind(&tujuan.kode_bidang_urusan)
    .bind(&tujuan.tujuan)
    .bind(tujuan.periode.as_ref().map(|p| p.id))
    .bind(tujuan.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tujuan_opd WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<TujuanOpd>, sqlx::Error> {
    let sql = format!("{} WHERE t.id = $1", SELECT_TUJUAN);
    let row = sqlx::query_as::<_, TujuanRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Goals of an OPD, optionally limited to one periode
pub async fn find_by_opd(
    conn: &mut PgConnection,
    kode_opd: &str,
    tahun_awal: Option<&str>,
    tahun_akhir: Option<&str>,
    jenis_periode: Option<&str>,
) -> Result<Vec<TujuanOpd>, sqlx::Error> {
    let sql = format!(
        r#"
        {}
        WHERE t.kode_opd = $1
          AND ($2::text IS NULL OR p.tahun_awal = $2)
          AND ($3::text IS NULL OR p.tahun_akhir = $3)
          AND ($4::text IS NULL OR p.jenis_periode = $4)
        ORDER BY t.id ASC
        "#,
        SELECT_TUJUAN
    );
    let rows = sqlx::query_as::<_, TujuanRow>(&sql)
        .bind(kode_opd)
        .bind(tahun_awal)
        .bind(tahun_akhir)
        .bind(jenis_periode)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Goals of an OPD whose periode covers `tahun`
pub async fn find_by_opd_tahun(
    conn: &mut PgConnection,
    kode_opd: &str,
    tahun: &str,
) -> Result<Vec<TujuanOpd>, sqlx::Error> {
    let sql = format!(
        r#"
        {}
        WHERE t.kode_opd = $1 AND p.tahun_awal <= $2 AND p.tahun_akhir >= $2
        ORDER BY t.id ASC
        "#,
        SELECT_TUJUAN
    );
    let rows = sqlx::query_as::<_, TujuanRow>(&sql)
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
struct PeriodeRow {
    id: i32,
    tahun_awal: String,
    tahun_akhir: String,
    jenis_periode: String,
}

impl From<PeriodeRow> for Periode {
    fn from(row: PeriodeRow) -> Self {
        Periode {
            id: row.id,
            tahun_awal: row.tahun_awal,
            tahun_akhir: row.tahun_akhir,
            jenis_periode: row.jenis_periode,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TujuanRow {
    id: i32,
    kode_opd: String,
    nama_opd: String,
    kode_bidang_urusan: String,
    tujuan: String,
    periode_id: Option<i32>,
    tahun_awal: Option<String>,
    tahun_akhir: Option<String>,
    jenis_periode: Option<String>,
}

impl From<TujuanRow> for TujuanOpd {
    fn from(row: TujuanRow) -> Self {
        let periode = row.periode_id.map(|id| Periode {
            id,
            tahun_awal: row.tahun_awal.unwrap_or_default(),
            tahun_akhir: row.tahun_akhir.unwrap_or_default(),
            jenis_periode: row.jenis_periode.unwrap_or_default(),
        });

        TujuanOpd {
            id: row.id,
            kode_opd: row.kode_opd,
            nama_opd: row.nama_opd,
            kode_bidang_urusan: row.kode_bidang_urusan,
            tujuan: row.tujuan,
            periode,
            indikator: Vec::new(),
        }
    }
}
