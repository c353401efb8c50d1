//! Rencana Kinerja Service
//!
//! Employee performance plans hanging off pohon kinerja nodes, and the
//! "rekin atasan" view: the plans and budgets of the node one level up.

use std::collections::{BTreeMap, HashMap, HashSet};

use kinerja_core::domain::indikator::{Indikator, Target};
use kinerja_core::domain::pohon_kinerja::{
    LEVEL_OPERATIONAL, LEVEL_STRATEGIC, LEVEL_TACTICAL, PelaksanaPokin, PohonKinerja,
};
use kinerja_core::domain::program::{self, PaguRekin, RekinSubKegiatan};
use kinerja_core::domain::rencana_kinerja::RencanaKinerja;
use kinerja_core::dto::rencana_kinerja::{
    FindByIdRekinsRequest, IndikatorRekinRequest, KegiatanAtasanResponse, PokinParentInfo,
    ProgramAtasanResponse, RekinAtasanDetail, RekinAtasanResponse, RencanaKinerjaCloneRequest,
    RencanaKinerjaFilter, RencanaKinerjaRequest, RencanaKinerjaResponse,
    SubKegiatanAtasanResponse, SubKegiatanRekinResponse,
};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::indikator::IndikatorOwner;
use crate::repository::{
    indikator_repository, opd_repository, pegawai_repository, pohon_kinerja_repository,
    program_repository, rencana_kinerja_repository, sub_kegiatan_repository,
};

pub fn validate(req: &RencanaKinerjaRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors
        .required_num("id_pohon", req.id_pohon)
        .required("nama_rencana_kinerja", &req.nama_rencana_kinerja)
        .required("tahun", &req.tahun)
        .required("status_rencana_kinerja", &req.status_rencana_kinerja)
        .required("kode_opd", &req.kode_opd)
        .required("pegawai_id", &req.pegawai_id);
    for (i, ind) in req.indikator.iter().enumerate() {
        errors.required(&format!("indikator[{}].nama_indikator", i), &ind.nama_indikator);
    }
    errors.finish()
}

/// Indikator of a plan; ids the caller sent are kept, targets without a year
/// take the plan's year
fn indikator_from_request(items: Vec<IndikatorRekinRequest>, tahun: &str) -> Vec<Indikator> {
    items
        .into_iter()
        .map(|ind| {
            let indikator_id = if ind.id_indikator.trim().is_empty() {
                id::digit_id("IND-REKIN")
            } else {
                ind.id_indikator
            };
            Indikator {
                target: ind
                    .target
                    .into_iter()
                    .map(|t| Target {
                        id: if t.id_target.trim().is_empty() {
                            id::digit_id("TRGT-IND-REKIN")
                        } else {
                            t.id_target
                        },
                        indikator_id: indikator_id.clone(),
                        target: t.target,
                        satuan: t.satuan,
                        tahun: or_year(t.tahun, tahun),
                    })
                    .collect(),
                id: indikator_id,
                indikator: ind.nama_indikator,
                rumus_perhitungan: ind.rumus_perhitungan,
                sumber_data: ind.sumber_data,
                tahun: or_year(ind.tahun, tahun),
                ..Default::default()
            }
        })
        .collect()
}

fn or_year(value: String, tahun: &str) -> String {
    if value.trim().is_empty() {
        tahun.to_string()
    } else {
        value
    }
}

// =============================================================================
// CRUD
// =============================================================================

pub async fn create(pool: &PgPool, req: RencanaKinerjaRequest) -> Result<RencanaKinerjaResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;
    check_references(&mut tx, &req).await?;

    let rekin = RencanaKinerja {
        id: id::rencana_kinerja_id(),
        id_pohon: req.id_pohon,
        nama_rencana_kinerja: req.nama_rencana_kinerja,
        tahun: req.tahun,
        status_rencana_kinerja: req.status_rencana_kinerja,
        catatan: req.catatan,
        kode_opd: req.kode_opd,
        pegawai_id: req.pegawai_id,
        created_at: chrono::Utc::now(),
        ..Default::default()
    };
    rencana_kinerja_repository::create(&mut tx, &rekin).await?;

    let owner = IndikatorOwner::RencanaKinerja(rekin.id.clone());
    for indikator in indikator_from_request(req.indikator, &rekin.tahun) {
        indikator_repository::insert(&mut tx, &owner, &indikator).await?;
    }

    let response = load(&mut tx, &rekin.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Rencana kinerja created: {} (pohon {}, pegawai {})",
        response.id_rencana_kinerja,
        response.id_pohon,
        response.pegawai_id
    );

    Ok(response)
}

pub async fn update(
    pool: &PgPool,
    id: &str,
    req: RencanaKinerjaRequest,
) -> Result<RencanaKinerjaResponse> {
    validate(&req)?;

    let mut tx = pool.begin().await?;
    let existing = rencana_kinerja_repository::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("rencana kinerja", id))?;
    check_references(&mut tx, &req).await?;

    let rekin = RencanaKinerja {
        id_pohon: req.id_pohon,
        nama_rencana_kinerja: req.nama_rencana_kinerja,
        tahun: req.tahun,
        status_rencana_kinerja: req.status_rencana_kinerja,
        catatan: req.catatan,
        kode_opd: req.kode_opd,
        pegawai_id: req.pegawai_id,
        ..existing
    };
    rencana_kinerja_repository::update(&mut tx, &rekin).await?;

    let indikator = indikator_from_request(req.indikator, &rekin.tahun);
    indikator_repository::replace_for_owner(
        &mut tx,
        &IndikatorOwner::RencanaKinerja(rekin.id.clone()),
        &indikator,
    )
    .await?;

    let response = load(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Rencana kinerja updated: {}", id);

    Ok(response)
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !rencana_kinerja_repository::delete(&mut conn, id).await? {
        return Err(ServiceError::not_found("rencana kinerja", id));
    }

    tracing::info!("Rencana kinerja deleted: {}", id);
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<RencanaKinerjaResponse> {
    let mut conn = pool.acquire().await?;
    load(&mut conn, id).await
}

pub async fn find_all(
    pool: &PgPool,
    filter: &RencanaKinerjaFilter,
) -> Result<Vec<RencanaKinerjaResponse>> {
    let mut conn = pool.acquire().await?;
    let rekins = rencana_kinerja_repository::find_all(
        &mut conn,
        filter.pegawai_id.as_deref(),
        filter.kode_opd.as_deref(),
        filter.tahun.as_deref(),
    )
    .await?;

    to_responses(&mut conn, rekins).await
}

pub async fn find_by_ids(
    pool: &PgPool,
    req: &FindByIdRekinsRequest,
) -> Result<Vec<RencanaKinerjaResponse>> {
    FieldErrors::new().non_empty("id_rekins", &req.id_rekins).finish()?;

    let mut conn = pool.acquire().await?;
    let rekins = rencana_kinerja_repository::find_by_ids(&mut conn, &req.id_rekins).await?;

    to_responses(&mut conn, rekins).await
}

/// Copy a plan into another year under a fresh id
pub async fn clone(
    pool: &PgPool,
    id: &str,
    req: RencanaKinerjaCloneRequest,
) -> Result<RencanaKinerjaResponse> {
    FieldErrors::new().required("tahun", &req.tahun).finish()?;

    let mut tx = pool.begin().await?;
    let source = rencana_kinerja_repository::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("rencana kinerja", id))?;
    if source.tahun == req.tahun {
        return Err(ServiceError::Validation(format!(
            "rencana kinerja {} already belongs to {}",
            id, req.tahun
        )));
    }

    let indikator = indikator_repository::find_by_owner(
        &mut tx,
        &IndikatorOwner::RencanaKinerja(source.id.clone()),
    )
    .await?;

    let copy = RencanaKinerja {
        id: id::rencana_kinerja_id(),
        tahun: req.tahun.clone(),
        created_at: chrono::Utc::now(),
        ..source
    };
    rencana_kinerja_repository::create(&mut tx, &copy).await?;

    let owner = IndikatorOwner::RencanaKinerja(copy.id.clone());
    for ind in indikator {
        let indikator_id = id::digit_id("IND-REKIN");
        let cloned = Indikator {
            tahun: req.tahun.clone(),
            target: ind
                .target
                .iter()
                .map(|t| Target {
                    id: id::digit_id("TRGT-IND-REKIN"),
                    indikator_id: indikator_id.clone(),
                    tahun: req.tahun.clone(),
                    ..t.clone()
                })
                .collect(),
            id: indikator_id,
            ..ind
        };
        indikator_repository::insert(&mut tx, &owner, &cloned).await?;
    }

    let response = load(&mut tx, &copy.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Rencana kinerja {} cloned to {} for {}",
        id,
        response.id_rencana_kinerja,
        req.tahun
    );

    Ok(response)
}

// =============================================================================
// Rekin atasan
// =============================================================================

/// Budgets grouped for the rekin atasan view
#[derive(Debug, Default, PartialEq)]
pub struct AtasanBudget {
    pub program: Vec<ProgramAtasanResponse>,
    pub kegiatan: Vec<KegiatanAtasanResponse>,
    pub sub_kegiatan: Vec<SubKegiatanAtasanResponse>,
    pub total: i64,
}

/// Plans whose owner executes the node they belong to
pub fn filter_by_pelaksana(
    rekins: Vec<RencanaKinerja>,
    pelaksana: &HashMap<i32, Vec<PelaksanaPokin>>,
) -> Vec<RencanaKinerja> {
    let mut seen = HashSet::new();
    rekins
        .into_iter()
        .filter(|r| {
            pelaksana
                .get(&r.id_pohon)
                .is_some_and(|list| list.iter().any(|p| p.nip == r.pegawai_id))
        })
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

/// One row per sub kegiatan; plans sharing a sub kegiatan share its pagu
pub fn distinct_sub_kegiatan(pagu: &[PaguRekin]) -> Vec<&PaguRekin> {
    let mut seen = HashSet::new();
    pagu.iter()
        .filter(|p| seen.insert(p.kode_subkegiatan.as_str()))
        .collect()
}

/// Group plan budgets by the level of the parent node.
///
/// Strategic and tactical parents report per program. An operational parent
/// reports per kegiatan and per sub kegiatan. The total sums the programs or
/// the sub kegiatan respectively; other levels carry no budget. Each sub
/// kegiatan is counted once however many plans link it.
pub fn aggregate_budget(
    parent_level: i32,
    pagu: &[PaguRekin],
    program_names: &HashMap<String, String>,
    kegiatan_names: &HashMap<String, String>,
) -> AtasanBudget {
    let pagu = distinct_sub_kegiatan(pagu);
    match parent_level {
        LEVEL_STRATEGIC | LEVEL_TACTICAL => {
            let mut by_program: BTreeMap<String, i64> = BTreeMap::new();
            for p in &pagu {
                if let Some(kode) = program::kode_program_of(&p.kode_subkegiatan) {
                    *by_program.entry(kode).or_default() += p.pagu;
                }
            }
            let program: Vec<ProgramAtasanResponse> = by_program
                .into_iter()
                .map(|(kode, total)| ProgramAtasanResponse {
                    nama_program: program_names.get(&kode).cloned().unwrap_or_default(),
                    kode_program: kode,
                    pagu_program: total,
                })
                .collect();
            let total = program.iter().map(|p| p.pagu_program).sum();

            AtasanBudget {
                program,
                total,
                ..Default::default()
            }
        }
        LEVEL_OPERATIONAL => {
            let mut by_kegiatan: BTreeMap<String, i64> = BTreeMap::new();
            let mut by_sub: BTreeMap<String, (String, i64)> = BTreeMap::new();
            for p in &pagu {
                if let Some(kode) = program::kode_kegiatan_of(&p.kode_subkegiatan) {
                    *by_kegiatan.entry(kode).or_default() += p.pagu;
                }
                let entry = by_sub
                    .entry(p.kode_subkegiatan.clone())
                    .or_insert_with(|| (p.nama_subkegiatan.clone(), 0));
                entry.1 += p.pagu;
            }

            let kegiatan = by_kegiatan
                .into_iter()
                .map(|(kode, total)| KegiatanAtasanResponse {
                    nama_kegiatan: kegiatan_names.get(&kode).cloned().unwrap_or_default(),
                    kode_kegiatan: kode,
                    pagu_kegiatan: total,
                })
                .collect();
            let sub_kegiatan: Vec<SubKegiatanAtasanResponse> = by_sub
                .into_iter()
                .map(|(kode, (nama, total))| SubKegiatanAtasanResponse {
                    kode_subkegiatan: kode,
                    nama_subkegiatan: nama,
                    pagu_subkegiatan: total,
                })
                .collect();
            let total = sub_kegiatan.iter().map(|s| s.pagu_subkegiatan).sum();

            AtasanBudget {
                kegiatan,
                sub_kegiatan,
                total,
                ..Default::default()
            }
        }
        _ => AtasanBudget::default(),
    }
}

/// Operational nodes whose plans fund a strategic or tactical parent.
///
/// A tactical parent uses its direct operational children. A strategic parent
/// uses the operational children of its tactical children. Deeper levels
/// never contribute.
pub fn budget_pokin_ids(parent: &PohonKinerja, descendants: &[PohonKinerja]) -> Vec<i32> {
    match parent.level_pohon {
        LEVEL_TACTICAL => children_at(descendants, parent.id, LEVEL_OPERATIONAL).collect(),
        LEVEL_STRATEGIC => children_at(descendants, parent.id, LEVEL_TACTICAL)
            .flat_map(|tactical| children_at(descendants, tactical, LEVEL_OPERATIONAL))
            .collect(),
        _ => Vec::new(),
    }
}

fn children_at(
    nodes: &[PohonKinerja],
    parent: i32,
    level: i32,
) -> impl Iterator<Item = i32> + '_ {
    nodes
        .iter()
        .filter(move |n| n.parent == parent && n.level_pohon == level)
        .map(|n| n.id)
}

/// Plans and budgets of the node above the plan's node
pub async fn find_rekin_atasan(pool: &PgPool, rekin_id: &str) -> Result<RekinAtasanResponse> {
    let mut conn = pool.acquire().await?;

    let rekin = rencana_kinerja_repository::find_by_id(&mut conn, rekin_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("rencana kinerja", rekin_id))?;
    let pohon = pohon_kinerja_repository::find_by_id(&mut conn, rekin.id_pohon)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", rekin.id_pohon))?;
    if pohon.is_root() {
        return Err(ServiceError::NotFound(format!(
            "pohon kinerja {} has no parent",
            pohon.id
        )));
    }
    let parent = pohon_kinerja_repository::find_by_id(&mut conn, pohon.parent)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", pohon.parent))?;

    let parent_pelaksana =
        pohon_kinerja_repository::find_pelaksana_by_pokin_ids(&mut conn, &[parent.id]).await?;
    let parent_rekins =
        rencana_kinerja_repository::find_by_pohon_ids(&mut conn, &[parent.id]).await?;
    let rekin_atasan = filter_by_pelaksana(parent_rekins, &parent_pelaksana);

    let budget_rekins = match parent.level_pohon {
        LEVEL_STRATEGIC | LEVEL_TACTICAL => {
            let descendants =
                pohon_kinerja_repository::find_descendants(&mut conn, parent.id).await?;
            let ids = budget_pokin_ids(&parent, &descendants);
            let rekins = rencana_kinerja_repository::find_by_pohon_ids(&mut conn, &ids).await?;
            let pelaksana =
                pohon_kinerja_repository::find_pelaksana_by_pokin_ids(&mut conn, &ids).await?;
            filter_by_pelaksana(rekins, &pelaksana)
        }
        LEVEL_OPERATIONAL => rekin_atasan.clone(),
        _ => Vec::new(),
    };

    let budget_ids: Vec<String> = budget_rekins.iter().map(|r| r.id.clone()).collect();
    let pagu = if budget_ids.is_empty() {
        Vec::new()
    } else {
        sub_kegiatan_repository::find_pagu_by_rekin_ids(&mut conn, &budget_ids).await?
    };

    let program_codes = unique(
        pagu.iter()
            .filter_map(|p| program::kode_program_of(&p.kode_subkegiatan)),
    );
    let kegiatan_codes = unique(
        pagu.iter()
            .filter_map(|p| program::kode_kegiatan_of(&p.kode_subkegiatan)),
    );
    let program_names = program_repository::find_program_names(&mut conn, &program_codes).await?;
    let kegiatan_names =
        program_repository::find_kegiatan_names(&mut conn, &kegiatan_codes).await?;

    let budget = aggregate_budget(parent.level_pohon, &pagu, &program_names, &kegiatan_names);

    tracing::debug!(
        "Rekin atasan of {}: parent {} (level {}), {} plans, pagu {}",
        rekin_id,
        parent.id,
        parent.level_pohon,
        rekin_atasan.len(),
        budget.total
    );

    Ok(RekinAtasanResponse {
        pokin_parent: PokinParentInfo {
            id: parent.id,
            nama_pohon: parent.nama_pohon,
            level_pohon: parent.level_pohon,
            kode_opd: parent.kode_opd,
            nama_opd: parent.nama_opd,
        },
        rekin_atasan: rekin_atasan.into_iter().map(RekinAtasanDetail::from).collect(),
        program: budget.program,
        kegiatan: budget.kegiatan,
        sub_kegiatan: budget.sub_kegiatan,
        pagu_anggaran_total: budget.total,
    })
}

fn unique(codes: impl Iterator<Item = String>) -> Vec<String> {
    let set: HashSet<String> = codes.collect();
    set.into_iter().collect()
}

// =============================================================================
// Helpers
// =============================================================================

async fn check_references(conn: &mut PgConnection, req: &RencanaKinerjaRequest) -> Result<()> {
    if !opd_repository::exists(&mut *conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }
    if pegawai_repository::find_by_nip(&mut *conn, &req.pegawai_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::not_found("pegawai with nip", &req.pegawai_id));
    }
    if pohon_kinerja_repository::find_by_id(conn, req.id_pohon)
        .await?
        .is_none()
    {
        return Err(ServiceError::not_found("pohon kinerja", req.id_pohon));
    }
    Ok(())
}

fn to_response(
    rekin: RencanaKinerja,
    link: Option<RekinSubKegiatan>,
) -> RencanaKinerjaResponse {
    let mut response = RencanaKinerjaResponse::from(rekin);
    response.sub_kegiatan = link.map(|l| SubKegiatanRekinResponse {
        id: l.id,
        kode_subkegiatan: l.kode_subkegiatan,
        nama_subkegiatan: l.nama_subkegiatan,
    });
    response
}

async fn to_responses(
    conn: &mut PgConnection,
    mut rekins: Vec<RencanaKinerja>,
) -> Result<Vec<RencanaKinerjaResponse>> {
    let ids: Vec<String> = rekins.iter().map(|r| r.id.clone()).collect();
    let mut indikator = indikator_repository::find_by_rekin_ids(&mut *conn, &ids).await?;
    let mut links = sub_kegiatan_repository::find_links_by_rekin_ids(conn, &ids).await?;

    for rekin in rekins.iter_mut() {
        rekin.indikator = indikator.remove(&rekin.id).unwrap_or_default();
    }

    Ok(rekins
        .into_iter()
        .map(|r| {
            let link = links.remove(&r.id);
            to_response(r, link)
        })
        .collect())
}

async fn load(conn: &mut PgConnection, id: &str) -> Result<RencanaKinerjaResponse> {
    let rekin = rencana_kinerja_repository::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("rencana kinerja", id))?;

    let mut responses = to_responses(conn, vec![rekin]).await?;
    responses
        .pop()
        .ok_or_else(|| ServiceError::not_found("rencana kinerja", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rekin(id: &str, pohon: i32, nip: &str) -> RencanaKinerja {
        RencanaKinerja {
            id: id.to_string(),
            id_pohon: pohon,
            pegawai_id: nip.to_string(),
            ..Default::default()
        }
    }

    fn pelaksana(pohon: i32, nip: &str) -> PelaksanaPokin {
        PelaksanaPokin {
            pohon_kinerja_id: pohon,
            nip: nip.to_string(),
            ..Default::default()
        }
    }

    fn pagu(rekin: &str, kode: &str, amount: i64) -> PaguRekin {
        PaguRekin {
            rekin_id: rekin.to_string(),
            kode_subkegiatan: kode.to_string(),
            nama_subkegiatan: format!("Sub {}", kode),
            pagu: amount,
        }
    }

    #[test]
    fn test_filter_keeps_plans_of_pelaksana_only() {
        let mut map = HashMap::new();
        map.insert(10, vec![pelaksana(10, "111"), pelaksana(10, "222")]);
        map.insert(11, vec![pelaksana(11, "333")]);

        let kept = filter_by_pelaksana(
            vec![
                rekin("A", 10, "111"),
                rekin("B", 10, "999"),
                rekin("C", 11, "333"),
                rekin("D", 12, "111"),
                rekin("A", 10, "111"),
            ],
            &map,
        );
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn test_strategic_parent_groups_by_program() {
        let mut names = HashMap::new();
        names.insert("1.01.01".to_string(), "Program Penunjang".to_string());

        let budget = aggregate_budget(
            LEVEL_STRATEGIC,
            &[
                pagu("A", "1.01.01.2.01.0001", 1_000),
                pagu("B", "1.01.01.2.02.0003", 500),
                pagu("C", "1.01.02.2.01.0001", 250),
                pagu("D", "bad", 99),
            ],
            &names,
            &HashMap::new(),
        );

        assert_eq!(budget.program.len(), 2);
        assert_eq!(budget.program[0].kode_program, "1.01.01");
        assert_eq!(budget.program[0].nama_program, "Program Penunjang");
        assert_eq!(budget.program[0].pagu_program, 1_500);
        assert_eq!(budget.program[1].nama_program, "");
        assert_eq!(budget.total, 1_750);
        assert!(budget.kegiatan.is_empty());
        assert!(budget.sub_kegiatan.is_empty());
    }

    #[test]
    fn test_operational_parent_groups_by_kegiatan_and_sub_kegiatan() {
        let mut kegiatan_names = HashMap::new();
        kegiatan_names.insert("1.01.01.2.01".to_string(), "Perencanaan".to_string());

        let budget = aggregate_budget(
            LEVEL_OPERATIONAL,
            &[
                pagu("A", "1.01.01.2.01.0001", 300),
                pagu("B", "1.01.01.2.01.0002", 100),
                pagu("C", "1.01.01.2.02.0001", 50),
            ],
            &HashMap::new(),
            &kegiatan_names,
        );

        assert!(budget.program.is_empty());
        assert_eq!(
            budget.kegiatan[0],
            KegiatanAtasanResponse {
                kode_kegiatan: "1.01.01.2.01".to_string(),
                nama_kegiatan: "Perencanaan".to_string(),
                pagu_kegiatan: 400,
            }
        );
        assert_eq!(budget.kegiatan[1].pagu_kegiatan, 50);
        assert_eq!(budget.sub_kegiatan.len(), 3);
        assert_eq!(budget.sub_kegiatan[0].pagu_subkegiatan, 300);
        assert_eq!(budget.total, 450);
    }

    #[test]
    fn test_shared_sub_kegiatan_counted_once() {
        let rows = [
            pagu("A", "1.01.01.2.01.0001", 1_000),
            pagu("B", "1.01.01.2.01.0001", 1_000),
        ];

        let strategic = aggregate_budget(LEVEL_STRATEGIC, &rows, &HashMap::new(), &HashMap::new());
        assert_eq!(strategic.program[0].pagu_program, 1_000);
        assert_eq!(strategic.total, 1_000);

        let operational =
            aggregate_budget(LEVEL_OPERATIONAL, &rows, &HashMap::new(), &HashMap::new());
        assert_eq!(operational.kegiatan[0].pagu_kegiatan, 1_000);
        assert_eq!(operational.sub_kegiatan.len(), 1);
        assert_eq!(operational.sub_kegiatan[0].pagu_subkegiatan, 1_000);
        assert_eq!(operational.total, 1_000);
    }

    fn pokin(id: i32, parent: i32, level: i32) -> PohonKinerja {
        PohonKinerja {
            id,
            parent,
            level_pohon: level,
            ..Default::default()
        }
    }

    #[test]
    fn test_tactical_parent_uses_direct_operational_children() {
        let parent = pokin(20, 10, LEVEL_TACTICAL);
        let descendants = [
            pokin(30, 20, LEVEL_OPERATIONAL),
            pokin(31, 20, LEVEL_OPERATIONAL),
            pokin(40, 30, 7),
            pokin(41, 99, LEVEL_OPERATIONAL),
        ];
        assert_eq!(budget_pokin_ids(&parent, &descendants), vec![30, 31]);
    }

    #[test]
    fn test_strategic_parent_uses_operational_under_tactical() {
        let parent = pokin(10, 0, LEVEL_STRATEGIC);
        let descendants = [
            pokin(20, 10, LEVEL_TACTICAL),
            pokin(21, 10, LEVEL_TACTICAL),
            pokin(30, 20, LEVEL_OPERATIONAL),
            pokin(31, 21, LEVEL_OPERATIONAL),
            pokin(32, 10, LEVEL_OPERATIONAL),
            pokin(40, 30, 7),
        ];
        assert_eq!(budget_pokin_ids(&parent, &descendants), vec![30, 31]);
    }

    #[test]
    fn test_operational_parent_has_no_budget_nodes() {
        let parent = pokin(30, 20, LEVEL_OPERATIONAL);
        assert!(budget_pokin_ids(&parent, &[pokin(40, 30, 7)]).is_empty());
    }

    #[test]
    fn test_other_levels_carry_no_budget() {
        let budget = aggregate_budget(
            7,
            &[pagu("A", "1.01.01.2.01.0001", 300)],
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(budget, AtasanBudget::default());
    }

    #[test]
    fn test_validation_lists_missing_fields() {
        let msg = validate(&RencanaKinerjaRequest::default())
            .unwrap_err()
            .to_string();
        for field in [
            "id_pohon",
            "nama_rencana_kinerja",
            "tahun",
            "status_rencana_kinerja",
            "kode_opd",
            "pegawai_id",
        ] {
            assert!(msg.contains(&format!("{} is required", field)), "{}", msg);
        }
    }

    #[test]
    fn test_indikator_ids_and_years() {
        let items = vec![IndikatorRekinRequest {
            nama_indikator: "Persentase dokumen tepat waktu".to_string(),
            target: vec![
                Default::default(),
                kinerja_core::dto::rencana_kinerja::TargetRekinRequest {
                    id_target: "TRGT-IND-REKIN-00042".to_string(),
                    tahun: "2027".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];
        let result = indikator_from_request(items, "2026");
        assert!(result[0].id.starts_with("IND-REKIN-"));
        assert_eq!(result[0].tahun, "2026");
        assert!(result[0].target[0].id.starts_with("TRGT-IND-REKIN-"));
        assert_eq!(result[0].target[0].tahun, "2026");
        assert_eq!(result[0].target[1].id, "TRGT-IND-REKIN-00042");
        assert_eq!(result[0].target[1].tahun, "2027");
        assert_eq!(result[0].target[1].indikator_id, result[0].id);
    }

    #[test]
    fn test_response_carries_linked_sub_kegiatan() {
        let response = to_response(
            rekin("REKIN-PEG-2025-00001", 1, "111"),
            Some(RekinSubKegiatan {
                id: "RSK-1".to_string(),
                rekin_id: "REKIN-PEG-2025-00001".to_string(),
                kode_subkegiatan: "1.01.01.2.01.0001".to_string(),
                nama_subkegiatan: "Penyusunan Dokumen".to_string(),
            }),
        );
        let sub = response.sub_kegiatan.unwrap();
        assert_eq!(sub.kode_subkegiatan, "1.01.01.2.01.0001");
        assert!(to_response(rekin("X", 1, "1"), None).sub_kegiatan.is_none());
    }
}
