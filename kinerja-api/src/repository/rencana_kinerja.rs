//! Rencana Kinerja Repository

use kinerja_core::domain::rencana_kinerja::RencanaKinerja;
use sqlx::PgConnection;

/// Plans joined with the names of their node, OPD and employee
const SELECT_REKIN: &str = r#"
    SELECT rk.id, rk.id_pohon, COALESCE(pk.nama_pohon, '') AS nama_pohon,
           COALESCE(pk.level_pohon, 0) AS level_pohon, rk.nama_rencana_kinerja, rk.tahun,
           rk.status_rencana_kinerja, rk.catatan, rk.kode_opd,
           COALESCE(o.nama_opd, '') AS nama_opd, rk.pegawai_id,
           COALESCE(p.nama_pegawai, '') AS nama_pegawai, rk.created_at
    FROM rencana_kinerja rk
    LEFT JOIN pohon_kinerja pk ON pk.id = rk.id_pohon
    LEFT JOIN opd o ON o.kode_opd = rk.kode_opd
    LEFT JOIN pegawai p ON p.nip = rk.pegawai_id
"#;

pub async fn create(conn: &mut PgConnection, rekin: &RencanaKinerja) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO rencana_kinerja (id, id_pohon, nama_rencana_kinerja, tahun,
                                     status_rencana_kinerja, catatan, kode_opd, pegawai_id,
                                     created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(&rekin.id)
    .bind(rekin.id_pohon)
    .bind(&rekin.nama_rencana_kinerja)
    .bind(&rekin.tahun)
    .bind(&rekin.status_rencana_kinerja)
    .bind(&rekin.catatan)
    .bind(&rekin.kode_opd)
    .bind(&rekin.pegawai_id)
    .bind(rekin.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut PgConnection, rekin: &RencanaKinerja) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE rencana_kinerja
        SET id_pohon = $1, nama_rencana_kinerja = $2, tahun = $3, status_rencana_kinerja = $4,
            catatan = $5, kode_opd = $6, pegawai_id = $7
        WHERE id = $8
        "#,
    )
    .bind(rekin.id_pohon)
    .bind(&rekin.nama_rencana_kinerja)
    .bind(&rekin.tahun)
    .bind(&rekin.status_rencana_kinerja)
    .bind(&rekin.catatan)
    .bind(&rekin.kode_opd)
    .bind(&rekin.pegawai_id)
    .bind(&rekin.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM rencana_kinerja WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(
    conn: &mut PgConnection,
    id: &str,
) -> Result<Option<RencanaKinerja>, sqlx::Error> {
    let sql = format!("{} WHERE rk.id = $1", SELECT_REKIN);
    let row = sqlx::query_as::<_, RekinRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Plans matching every filter that is set
pub async fn find_all(
    conn: &mut PgConnection,
    pegawai_id: Option<&str>,
    kode_opd: Option<&str>,
    tahun: Option<&str>,
) -> Result<Vec<RencanaKinerja>, sqlx::Error> {
    let sql = format!(
        r#"
        {}
        WHERE ($1::text IS NULL OR rk.pegawai_id = $1)
          AND ($2::text IS NULL OR rk.kode_opd = $2)
          AND ($3::text IS NULL OR rk.tahun = $3)
        ORDER BY rk.created_at ASC, rk.id ASC
        "#,
        SELECT_REKIN
    );
    let rows = sqlx::query_as::<_, RekinRow>(&sql)
        .bind(pegawai_id)
        .bind(kode_opd)
        .bind(tahun)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

pub async fn find_by_ids(
    conn: &mut PgConnection,
    ids: &[String],
) -> Result<Vec<RencanaKinerja>, sqlx::Error> {
    let sql = format!("{} WHERE rk.id = ANY($1) ORDER BY rk.created_at, rk.id", SELECT_REKIN);
    let rows = sqlx::query_as::<_, RekinRow>(&sql)
        .bind(ids)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Plans attached to any of the given nodes
pub async fn find_by_pohon_ids(
    conn: &mut PgConnection,
    pohon_ids: &[i32],
) -> Result<Vec<RencanaKinerja>, sqlx::Error> {
    let sql = format!(
        "{} WHERE rk.id_pohon = ANY($1) ORDER BY rk.created_at, rk.id",
        SELECT_REKIN
    );
    let rows = sqlx::query_as::<_, RekinRow>(&sql)
        .bind(pohon_ids)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct RekinRow {
    id: String,
    id_pohon: i32,
    nama_pohon: String,
    level_pohon: i32,
    nama_rencana_kinerja: String,
    tahun: String,
    status_rencana_kinerja: String,
    catatan: String,
    kode_opd: String,
    nama_opd: String,
    pegawai_id: String,
    nama_pegawai: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<RekinRow> for RencanaKinerja {
    fn from(row: RekinRow) -> Self {
        RencanaKinerja {
            id: row.id,
            id_pohon: row.id_pohon,
            nama_pohon: row.nama_pohon,
            level_pohon: row.level_pohon,
            nama_rencana_kinerja: row.nama_rencana_kinerja,
            tahun: row.tahun,
            status_rencana_kinerja: row.status_rencana_kinerja,
            catatan: row.catatan,
            kode_opd: row.kode_opd,
            nama_opd: row.nama_opd,
            pegawai_id: row.pegawai_id,
            nama_pegawai: row.nama_pegawai,
            created_at: row.created_at,
            indikator: Vec::new(),
        }
    }
}
