//! Pohon Kinerja Repository
//!
//! Tree nodes and their pelaksana. Indikator of a node are stored through
//! [`super::indikator`] with [`super::indikator::IndikatorOwner::Pokin`].

use std::collections::HashMap;

use kinerja_core::domain::pohon_kinerja::{PelaksanaPokin, PohonKinerja};
use sqlx::PgConnection;

const SELECT_POHON: &str = r#"
    SELECT pk.id, pk.parent, pk.nama_pohon, pk.kode_opd, COALESCE(o.nama_opd, '') AS nama_opd,
           pk.keterangan, pk.tahun, pk.jenis_pohon, pk.level_pohon, pk.status, pk.is_active,
           pk.clone_from, pk.created_at
    FROM pohon_kinerja pk
    LEFT JOIN opd o ON o.kode_opd = pk.kode_opd
"#;

/// Insert a node and return its generated id
pub async fn insert(conn: &mut PgConnection, pohon: &PohonKinerja) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO pohon_kinerja (parent, nama_pohon, kode_opd, keterangan, tahun, jenis_pohon,
                                   level_pohon, status, is_active, clone_from)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(pohon.parent)
    .bind(&pohon.nama_pohon)
    .bind(&pohon.kode_opd)
    .bind(&pohon.keterangan)
    .bind(&pohon.tahun)
    .bind(&pohon.jenis_pohon)
    .bind(pohon.level_pohon)
    .bind(&pohon.status)
    .bind(pohon.is_active)
    .bind(pohon.clone_from)
    .fetch_one(conn)
    .await
}

pub async fn update(conn: &mut PgConnection, pohon: &PohonKinerja) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE pohon_kinerja
        SET parent = $1, nama_pohon = $2, kode_opd = $3, keterangan = $4, tahun = $5,
            jenis_pohon = $6, level_pohon = $7, status = $8
        WHERE id = $9
        "#,
    )
    .bind(pohon.parent)
    .bind(&pohon.nama_pohon)
    .bind(&pohon.kode_opd)
    .bind(&pohon.keterangan)
    .bind(&pohon.tahun)
    .bind(&pohon.jenis_pohon)
    .bind(pohon.level_pohon)
    .bind(&pohon.status)
    .bind(pohon.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Find a node by ID (without indikator and pelaksana)
pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<PohonKinerja>, sqlx::Error> {
    let sql = format!("{} WHERE pk.id = $1", SELECT_POHON);
    let row = sqlx::query_as::<_, PohonRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Every node of an OPD for a year
pub async fn find_by_opd_tahun(
    conn: &mut PgConnection,
    kode_opd: &str,
    tahun: &str,
) -> Result<Vec<PohonKinerja>, sqlx::Error> {
    let sql = format!(
        "{} WHERE pk.kode_opd = $1 AND pk.tahun = $2 ORDER BY pk.level_pohon, pk.id",
        SELECT_POHON
    );
    let rows = sqlx::query_as::<_, PohonRow>(&sql)
        .bind(kode_opd)
        .bind(tahun)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Every node of a year, pemda and OPD side
pub async fn find_all_by_tahun(
    conn: &mut PgConnection,
    tahun: &str,
) -> Result<Vec<PohonKinerja>, sqlx::Error> {
    let sql = format!(
        "{} WHERE pk.tahun = $1 ORDER BY pk.level_pohon, pk.id",
        SELECT_POHON
    );
    let rows = sqlx::query_as::<_, PohonRow>(&sql)
        .bind(tahun)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Direct children of a node
pub async fn find_children(
    conn: &mut PgConnection,
    parent: i32,
) -> Result<Vec<PohonKinerja>, sqlx::Error> {
    let sql = format!("{} WHERE pk.parent = $1 ORDER BY pk.id", SELECT_POHON);
    let rows = sqlx::query_as::<_, PohonRow>(&sql)
        .bind(parent)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Every node below `id` (not including `id` itself)
pub async fn find_descendants(
    conn: &mut PgConnection,
    id: i32,
) -> Result<Vec<PohonKinerja>, sqlx::Error> {
    let sql = format!(
        r#"
        WITH RECURSIVE subtree AS (
            SELECT id FROM pohon_kinerja WHERE parent = $1
            UNION ALL
            SELECT c.id FROM pohon_kinerja c JOIN subtree s ON c.parent = s.id
        )
        {} WHERE pk.id IN (SELECT id FROM subtree) ORDER BY pk.level_pohon, pk.id
        "#,
        SELECT_POHON
    );
    let rows = sqlx::query_as::<_, PohonRow>(&sql)
        .bind(id)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Delete a node with its whole subtree. Indikator, targets and pelaksana go
/// with the rows through cascading keys. Returns the `clone_from` of every
/// removed node.
pub async fn delete_subtree(conn: &mut PgConnection, id: i32) -> Result<Vec<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        WITH RECURSIVE subtree AS (
            SELECT id FROM pohon_kinerja WHERE id = $1
            UNION ALL
            SELECT c.id FROM pohon_kinerja c JOIN subtree s ON c.parent = s.id
        )
        DELETE FROM pohon_kinerja
        WHERE id IN (SELECT id FROM subtree)
        RETURNING clone_from
        "#,
    )
    .bind(id)
    .fetch_all(conn)
    .await
}

pub async fn set_status(conn: &mut PgConnection, ids: &[i32], status: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE pohon_kinerja SET status = $1 WHERE id = ANY($2)")
        .bind(status)
        .bind(ids)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn set_active(conn: &mut PgConnection, id: i32, is_active: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE pohon_kinerja SET is_active = $1 WHERE id = $2")
        .bind(is_active)
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists_for_opd_tahun(
    conn: &mut PgConnection,
    kode_opd: &str,
    tahun: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM pohon_kinerja WHERE kode_opd = $1 AND tahun = $2)",
    )
    .bind(kode_opd)
    .bind(tahun)
    .fetch_one(conn)
    .await
}

/// Number of nodes with `status` per level for an OPD and year
pub async fn count_by_level_with_status(
    conn: &mut PgConnection,
    kode_opd: &str,
    tahun: &str,
    status: &str,
) -> Result<HashMap<i32, i64>, sqlx::Error> {
    let rows: Vec<(i32, i64)> = sqlx::query_as(
        r#"
        SELECT level_pohon, COUNT(*)
        FROM pohon_kinerja
        WHERE kode_opd = $1 AND tahun = $2 AND status = $3
        GROUP BY level_pohon
        "#,
    )
    .bind(kode_opd)
    .bind(tahun)
    .bind(status)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().collect())
}

// =============================================================================
// Pelaksana
// =============================================================================

pub async fn insert_pelaksana(
    conn: &mut PgConnection,
    pelaksana: &PelaksanaPokin,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pelaksana_pokin (id, pohon_kinerja_id, pegawai_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&pelaksana.id)
    .bind(pelaksana.pohon_kinerja_id)
    .bind(&pelaksana.pegawai_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn delete_pelaksana_by_pokin(
    conn: &mut PgConnection,
    pohon_kinerja_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM pelaksana_pokin WHERE pohon_kinerja_id = $1")
        .bind(pohon_kinerja_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn delete_pelaksana(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pelaksana_pokin WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Pelaksana of many nodes with employee details, keyed by node id
pub async fn find_pelaksana_by_pokin_ids(
    conn: &mut PgConnection,
    ids: &[i32],
) -> Result<HashMap<i32, Vec<PelaksanaPokin>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PelaksanaRow>(
        r#"
        SELECT pp.id, pp.pohon_kinerja_id, pp.pegawai_id, p.nip, p.nama_pegawai
        FROM pelaksana_pokin pp
        JOIN pegawai p ON p.id = pp.pegawai_id
        WHERE pp.pohon_kinerja_id = ANY($1)
        ORDER BY p.nama_pegawai
        "#,
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;

    let mut grouped: HashMap<i32, Vec<PelaksanaPokin>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.pohon_kinerja_id)
            .or_default()
            .push(row.into());
    }

    Ok(grouped)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PohonRow {
    id: i32,
    parent: i32,
    nama_pohon: String,
    kode_opd: String,
    nama_opd: String,
    keterangan: String,
    tahun: String,
    jenis_pohon: String,
    level_pohon: i32,
    status: String,
    is_active: bool,
    clone_from: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PohonRow> for PohonKinerja {
    fn from(row: PohonRow) -> Self {
        PohonKinerja {
            id: row.id,
            parent: row.parent,
            nama_pohon: row.nama_pohon,
            kode_opd: row.kode_opd,
            nama_opd: row.nama_opd,
            keterangan: row.keterangan,
            tahun: row.tahun,
            jenis_pohon: row.jenis_pohon,
            level_pohon: row.level_pohon,
            status: row.status,
            is_active: row.is_active,
            clone_from: row.clone_from,
            created_at: row.created_at,
            indikator: Vec::new(),
            pelaksana: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct PelaksanaRow {
    id: String,
    pohon_kinerja_id: i32,
    pegawai_id: String,
    nip: String,
    nama_pegawai: String,
}

impl From<PelaksanaRow> for PelaksanaPokin {
    fn from(row: PelaksanaRow) -> Self {
        PelaksanaPokin {
            id: row.id,
            pohon_kinerja_id: row.pohon_kinerja_id,
            pegawai_id: row.pegawai_id,
            nip: row.nip,
            nama_pegawai: row.nama_pegawai,
        }
    }
}
