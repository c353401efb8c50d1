//! Indikator Repository
//!
//! Indikator rows live in one table. Each row references exactly one owner
//! through one of the nullable owner columns; targets hang off the indikator
//! and are removed with it.

use std::collections::HashMap;

use kinerja_core::domain::indikator::{Indikator, Target};
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs};
use sqlx::{PgConnection, Postgres};

/// Entity an indikator belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndikatorOwner {
    Pokin(i32),
    RencanaKinerja(String),
    Program(String),
    Kegiatan(String),
    SubKegiatan(String),
    TujuanOpd(i32),
}

impl IndikatorOwner {
    fn column(&self) -> &'static str {
        match self {
            IndikatorOwner::Pokin(_) => "pokin_id",
            IndikatorOwner::RencanaKinerja(_) => "rencana_kinerja_id",
            IndikatorOwner::Program(_) => "program_id",
            IndikatorOwner::Kegiatan(_) => "kegiatan_id",
            IndikatorOwner::SubKegiatan(_) => "sub_kegiatan_id",
            IndikatorOwner::TujuanOpd(_) => "tujuan_opd_id",
        }
    }

    fn bind<'q>(&self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        match self {
            IndikatorOwner::Pokin(id) | IndikatorOwner::TujuanOpd(id) => query.bind(*id),
            IndikatorOwner::RencanaKinerja(id)
            | IndikatorOwner::Program(id)
            | IndikatorOwner::Kegiatan(id)
            | IndikatorOwner::SubKegiatan(id) => query.bind(id.clone()),
        }
    }

    fn bind_as<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self {
            IndikatorOwner::Pokin(id) | IndikatorOwner::TujuanOpd(id) => query.bind(*id),
            IndikatorOwner::RencanaKinerja(id)
            | IndikatorOwner::Program(id)
            | IndikatorOwner::Kegiatan(id)
            | IndikatorOwner::SubKegiatan(id) => query.bind(id.clone()),
        }
    }
}

const SELECT_INDIKATOR: &str = r#"
    SELECT id, indikator, tahun, kode, kode_opd, rumus_perhitungan, sumber_data,
           pagu_anggaran, pokin_id, rencana_kinerja_id, program_id, tujuan_opd_id
    FROM indikator
"#;

/// Insert an indikator with all of its targets
pub async fn insert(
    conn: &mut PgConnection,
    owner: &IndikatorOwner,
    indikator: &Indikator,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO indikator (id, indikator, tahun, kode, kode_opd, rumus_perhitungan,
                               sumber_data, pagu_anggaran, {})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
        owner.column()
    );

    let query = sqlx::query(&sql)
        .bind(&indikator.id)
        .bind(&indikator.indikator)
        .bind(&indikator.tahun)
        .bind(&indikator.kode)
        .bind(&indikator.kode_opd)
        .bind(&indikator.rumus_perhitungan)
        .bind(&indikator.sumber_data)
        .bind(indikator.pagu_anggaran);
    owner.bind(query).execute(&mut *conn).await?;

    for target in &indikator.target {
        insert_target(&mut *conn, target).await?;
    }

    Ok(())
}

pub async fn insert_target(conn: &mut PgConnection, target: &Target) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO target (id, indikator_id, target, satuan, tahun)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&target.id)
    .bind(&target.indikator_id)
    .bind(&target.target)
    .bind(&target.satuan)
    .bind(&target.tahun)
    .execute(conn)
    .await?;

    Ok(())
}

/// Update the descriptive fields of one indikator
pub async fn update(conn: &mut PgConnection, indikator: &Indikator) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE indikator
        SET indikator = $1, tahun = $2, kode = $3, kode_opd = $4, pagu_anggaran = $5
        WHERE id = $6
        "#,
    )
    .bind(&indikator.indikator)
    .bind(&indikator.tahun)
    .bind(&indikator.kode)
    .bind(&indikator.kode_opd)
    .bind(indikator.pagu_anggaran)
    .bind(&indikator.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_targets(conn: &mut PgConnection, indikator_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM target WHERE indikator_id = $1")
        .bind(indikator_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Remove every indikator (and through the cascade, every target) of an owner
pub async fn delete_by_owner(
    conn: &mut PgConnection,
    owner: &IndikatorOwner,
) -> Result<(), sqlx::Error> {
    let sql = format!("DELETE FROM indikator WHERE {} = $1", owner.column());
    owner.bind(sqlx::query(&sql)).execute(conn).await?;

    Ok(())
}

/// Replace the indikator set of an owner
pub async fn replace_for_owner(
    conn: &mut PgConnection,
    owner: &IndikatorOwner,
    indikator: &[Indikator],
) -> Result<(), sqlx::Error> {
    delete_by_owner(&mut *conn, owner).await?;
    for item in indikator {
        insert(&mut *conn, owner, item).await?;
    }

    Ok(())
}

pub async fn find_by_id(conn: &mut PgConnection, id: &str) -> Result<Option<Indikator>, sqlx::Error> {
    let sql = format!("{} WHERE id = $1", SELECT_INDIKATOR);
    let row = sqlx::query_as::<_, IndikatorRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut indikator: Indikator = row.into();
    indikator.target = find_targets(&mut *conn, &[indikator.id.clone()])
        .await?
        .remove(&indikator.id)
        .unwrap_or_default();

    Ok(Some(indikator))
}

/// Indikator of one owner, in insertion order, with their targets
pub async fn find_by_owner(
    conn: &mut PgConnection,
    owner: &IndikatorOwner,
) -> Result<Vec<Indikator>, sqlx::Error> {
    let sql = format!("{} WHERE {} = $1 ORDER BY seq", SELECT_INDIKATOR, owner.column());
    let rows = owner
        .bind_as(sqlx::query_as::<_, IndikatorRow>(&sql))
        .fetch_all(&mut *conn)
        .await?;

    let mut indikator: Vec<Indikator> = rows.into_iter().map(Into::into).collect();
    attach_targets(&mut *conn, &mut indikator).await?;

    Ok(indikator)
}

/// Indikator of many pohon kinerja nodes, keyed by node id
pub async fn find_by_pokin_ids(
    conn: &mut PgConnection,
    ids: &[i32],
) -> Result<HashMap<i32, Vec<Indikator>>, sqlx::Error> {
    let sql = format!("{} WHERE pokin_id = ANY($1) ORDER BY seq", SELECT_INDIKATOR);
    let rows = sqlx::query_as::<_, IndikatorRow>(&sql)
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    group_by(&mut *conn, rows, |row| row.pokin_id).await
}

/// Indikator of many rencana kinerja, keyed by rencana kinerja id
pub async fn find_by_rekin_ids(
    conn: &mut PgConnection,
    ids: &[String],
) -> Result<HashMap<String, Vec<Indikator>>, sqlx::Error> {
    let sql = format!("{} WHERE rencana_kinerja_id = ANY($1) ORDER BY seq", SELECT_INDIKATOR);
    let rows = sqlx::query_as::<_, IndikatorRow>(&sql)
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    group_by(&mut *conn, rows, |row| row.rencana_kinerja_id.clone()).await
}

/// Indikator of many programs, keyed by program id
pub async fn find_by_program_ids(
    conn: &mut PgConnection,
    ids: &[String],
) -> Result<HashMap<String, Vec<Indikator>>, sqlx::Error> {
    let sql = format!("{} WHERE program_id = ANY($1) ORDER BY seq", SELECT_INDIKATOR);
    let rows = sqlx::query_as::<_, IndikatorRow>(&sql)
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    group_by(&mut *conn, rows, |row| row.program_id.clone()).await
}

/// Indikator of many tujuan OPD, keyed by tujuan id
pub async fn find_by_tujuan_ids(
    conn: &mut PgConnection,
    ids: &[i32],
) -> Result<HashMap<i32, Vec<Indikator>>, sqlx::Error> {
    let sql = format!("{} WHERE tujuan_opd_id = ANY($1) ORDER BY seq", SELECT_INDIKATOR);
    let rows = sqlx::query_as::<_, IndikatorRow>(&sql)
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    group_by(&mut *conn, rows, |row| row.tujuan_opd_id).await
}

async fn group_by<K, F>(
    conn: &mut PgConnection,
    rows: Vec<IndikatorRow>,
    key: F,
) -> Result<HashMap<K, Vec<Indikator>>, sqlx::Error>
where
    K: std::hash::Hash + Eq,
    F: Fn(&IndikatorRow) -> Option<K>,
{
    let keyed: Vec<(Option<K>, Indikator)> = rows
        .into_iter()
        .map(|row| (key(&row), Indikator::from(row)))
        .collect();

    let ids: Vec<String> = keyed.iter().map(|(_, i)| i.id.clone()).collect();
    let mut targets = find_targets(conn, &ids).await?;

    let mut grouped: HashMap<K, Vec<Indikator>> = HashMap::new();
    for (owner, mut indikator) in keyed {
        let Some(owner) = owner else { continue };
        indikator.target = targets.remove(&indikator.id).unwrap_or_default();
        grouped.entry(owner).or_default().push(indikator);
    }

    Ok(grouped)
}

async fn attach_targets(
    conn: &mut PgConnection,
    indikator: &mut [Indikator],
) -> Result<(), sqlx::Error> {
    let ids: Vec<String> = indikator.iter().map(|i| i.id.clone()).collect();
    let mut targets = find_targets(conn, &ids).await?;
    for item in indikator.iter_mut() {
        item.target = targets.remove(&item.id).unwrap_or_default();
    }

    Ok(())
}

/// Targets of many indikator, keyed by indikator id
pub async fn find_targets(
    conn: &mut PgConnection,
    indikator_ids: &[String],
) -> Result<HashMap<String, Vec<Target>>, sqlx::Error> {
    if indikator_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, TargetRow>(
        r#"
        SELECT id, indikator_id, target, satuan, tahun
        FROM target
        WHERE indikator_id = ANY($1)
        ORDER BY seq
        "#,
    )
    .bind(indikator_ids)
    .fetch_all(conn)
    .await?;

    let mut grouped: HashMap<String, Vec<Target>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.indikator_id.clone())
            .or_default()
            .push(row.into());
    }

    Ok(grouped)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct IndikatorRow {
    id: String,
    indikator: String,
    tahun: String,
    kode: String,
    kode_opd: String,
    rumus_perhitungan: String,
    sumber_data: String,
    pagu_anggaran: i64,
    pokin_id: Option<i32>,
    rencana_kinerja_id: Option<String>,
    program_id: Option<String>,
    tujuan_opd_id: Option<i32>,
}

impl From<IndikatorRow> for Indikator {
    fn from(row: IndikatorRow) -> Self {
        Indikator {
            id: row.id,
            indikator: row.indikator,
            tahun: row.tahun,
            kode: row.kode,
            kode_opd: row.kode_opd,
            rumus_perhitungan: row.rumus_perhitungan,
            sumber_data: row.sumber_data,
            pagu_anggaran: row.pagu_anggaran,
            target: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TargetRow {
    id: String,
    indikator_id: String,
    target: String,
    satuan: String,
    tahun: String,
}

impl From<TargetRow> for Target {
    fn from(row: TargetRow) -> Self {
        Target {
            id: row.id,
            indikator_id: row.indikator_id,
            target: row.target,
            satuan: row.satuan,
            tahun: row.tahun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_columns() {
        assert_eq!(IndikatorOwner::Pokin(1).column(), "pokin_id");
        assert_eq!(
            IndikatorOwner::RencanaKinerja("REKIN-PEG-2025-00001".into()).column(),
            "rencana_kinerja_id"
        );
        assert_eq!(IndikatorOwner::SubKegiatan("SUB-1".into()).column(), "sub_kegiatan_id");
        assert_eq!(IndikatorOwner::TujuanOpd(3).column(), "tujuan_opd_id");
    }
}
