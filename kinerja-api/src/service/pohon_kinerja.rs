//! Pohon Kinerja Service
//!
//! OPD trees (strategic and below) and the pemda tematik trees above them.
//! Reads fetch every node of a scope in one query and assemble the tree in
//! memory with [`build_tree`].

use std::collections::{HashMap, HashSet};

use kinerja_core::domain::indikator::{Indikator, Target};
use kinerja_core::domain::pohon_kinerja::{
    self as pokin, PelaksanaPokin, PohonKinerja, LEVEL_OPERATIONAL, LEVEL_STRATEGIC,
    LEVEL_TACTICAL, LEVEL_TEMATIK, STATUS_DISETUJUI, STATUS_DITOLAK, STATUS_MENUNGGU_DISETUJUI,
    STATUS_POKIN_PEMDA,
};
use kinerja_core::domain::tujuan_opd::TujuanOpd;
use kinerja_core::dto::pohon_kinerja::{
    CountPokinPemdaResponse, IndikatorPokinRequest, IndikatorTujuanPokinResponse, LevelDetail,
    PegawaiPokinResponse, PohonKinerjaAdminResponse, PohonKinerjaCloneRequest,
    PohonKinerjaNodeResponse, PohonKinerjaOpdAllResponse, PohonKinerjaOpdResponse,
    PohonKinerjaRequest, PokinAtasanResponse, PokinPemdaCloneRequest, PokinTolakRequest,
    SubTematikResponse, TargetTujuanPokinResponse, TemaResponse, TematikStatusRequest,
    TujuanOpdPokinResponse,
};
use kinerja_core::id;
use sqlx::{PgConnection, PgPool};

use super::error::{Result, ServiceError};
use super::validation::FieldErrors;
use crate::repository::indikator::IndikatorOwner;
use crate::repository::{
    indikator_repository, opd_repository, pegawai_repository, pohon_kinerja_repository,
    tujuan_opd_repository,
};

// =============================================================================
// Validation
// =============================================================================

/// `kode_opd` is always required for OPD nodes; tematik-side nodes only need
/// one from the strategic level down
pub fn validate(req: &PohonKinerjaRequest, opd_node: bool) -> Result<()> {
    let needs_opd = opd_node || req.level_pohon >= LEVEL_STRATEGIC;
    let mut errors = FieldErrors::new();
    errors
        .required("nama_pohon", &req.nama_pohon)
        .required("tahun", &req.tahun)
        .check(req.level_pohon >= LEVEL_TEMATIK, "level_pohon must not be negative");
    if needs_opd {
        errors.required("kode_opd", &req.kode_opd);
    }
    for (i, ind) in req.indikator.iter().enumerate() {
        errors.required(&format!("indikator[{}].indikator", i), &ind.indikator);
    }
    errors.finish()
}

pub fn validate_clone(req: &PohonKinerjaCloneRequest) -> Result<()> {
    FieldErrors::new()
        .required("kode_opd", &req.kode_opd)
        .required("tahun_sumber", &req.tahun_sumber)
        .required("tahun_tujuan", &req.tahun_tujuan)
        .check(
            req.tahun_sumber.trim() != req.tahun_tujuan.trim(),
            "tahun_tujuan must differ from tahun_sumber",
        )
        .finish()
}

/// A moved or re-levelled node must sit strictly below its new parent and
/// strictly above each of its children
pub fn check_update_levels(
    id: i32,
    level: i32,
    parent: Option<&PohonKinerja>,
    children: &[PohonKinerja],
) -> Result<()> {
    if let Some(parent) = parent {
        if parent.id == id {
            return Err(ServiceError::Validation(
                "parent must not be the node itself".to_string(),
            ));
        }
        if !pokin::is_valid_child_level(parent.level_pohon, level) {
            return Err(ServiceError::Validation(format!(
                "level_pohon {} must be greater than parent level {}",
                level, parent.level_pohon
            )));
        }
    }
    if let Some(child) = children
        .iter()
        .find(|c| !pokin::is_valid_child_level(level, c.level_pohon))
    {
        return Err(ServiceError::Validation(format!(
            "level_pohon {} must stay below child {} at level {}",
            level, child.id, child.level_pohon
        )));
    }
    Ok(())
}

// =============================================================================
// Tree assembly
// =============================================================================

/// Pemda-handed nodes first, then by id
pub fn sort_siblings(nodes: &mut [PohonKinerja]) {
    nodes.sort_by_key(|n| (n.status != STATUS_POKIN_PEMDA, n.id));
}

/// Assemble nodes into trees rooted at `root_level`.
///
/// A node at `root_level` is a root when its parent is 0 or outside the given
/// set. Other nodes hang under their parent only while their level is
/// strictly greater; anything unreachable from a root is left out.
pub fn build_tree(nodes: Vec<PohonKinerja>, root_level: i32) -> Vec<PohonKinerjaNodeResponse> {
    let ids: HashSet<i32> = nodes.iter().map(|n| n.id).collect();

    let mut roots = Vec::new();
    let mut by_parent: HashMap<i32, Vec<PohonKinerja>> = HashMap::new();
    for node in nodes {
        if node.level_pohon == root_level && (node.is_root() || !ids.contains(&node.parent)) {
            roots.push(node);
        } else if !node.is_root() {
            by_parent.entry(node.parent).or_default().push(node);
        }
    }

    sort_siblings(&mut roots);
    roots
        .into_iter()
        .map(|root| attach_children(root, &mut by_parent))
        .collect()
}

fn attach_children(
    node: PohonKinerja,
    by_parent: &mut HashMap<i32, Vec<PohonKinerja>>,
) -> PohonKinerjaNodeResponse {
    let (id, level) = (node.id, node.level_pohon);
    let mut response = PohonKinerjaNodeResponse::from(node);

    let mut children = by_parent.remove(&id).unwrap_or_default();
    children.retain(|c| pokin::is_valid_child_level(level, c.level_pohon));
    sort_siblings(&mut children);

    response.childs = children
        .into_iter()
        .map(|child| attach_children(child, by_parent))
        .collect();
    response
}

/// Per-level counts with strategic, tactical and operational always listed
/// and deeper levels appended in order
pub fn level_details(counts: &HashMap<i32, i64>) -> (Vec<LevelDetail>, i64) {
    let mut levels: Vec<i32> = vec![LEVEL_STRATEGIC, LEVEL_TACTICAL, LEVEL_OPERATIONAL];
    let mut deeper: Vec<i32> = counts
        .keys()
        .copied()
        .filter(|&l| l > LEVEL_OPERATIONAL)
        .collect();
    deeper.sort_unstable();
    levels.extend(deeper);

    let details: Vec<LevelDetail> = levels
        .into_iter()
        .map(|level| LevelDetail {
            level,
            jenis_pohon: pokin::jenis_pohon_for_level(level),
            jumlah_pemda: counts.get(&level).copied().unwrap_or(0),
        })
        .collect();
    let total = details.iter().map(|d| d.jumlah_pemda).sum();

    (details, total)
}

/// Tematik with their sub tematik hung under them, in id order
pub fn sub_tematik_tree(nodes: Vec<PohonKinerja>) -> Vec<TemaResponse> {
    let mut tematiks: Vec<PohonKinerja> = Vec::new();
    let mut subs: HashMap<i32, Vec<PohonKinerja>> = HashMap::new();
    for node in nodes {
        match node.level_pohon {
            LEVEL_TEMATIK => tematiks.push(node),
            1 => subs.entry(node.parent).or_default().push(node),
            _ => {}
        }
    }
    tematiks.sort_by_key(|t| t.id);

    tematiks
        .into_iter()
        .map(|tematik| {
            let mut children = subs.remove(&tematik.id).unwrap_or_default();
            children.sort_by_key(|c| c.id);
            let mut response = TemaResponse::from(tematik);
            response.childs = children.into_iter().map(TemaResponse::from).collect();
            response
        })
        .collect()
}

// =============================================================================
// Pemda hand-off
// =============================================================================

/// Nodes copied when an OPD takes a pemda proposal over: the proposal itself
/// and every node below it reachable without crossing into another OPD.
/// Parents come before their children.
pub fn handoff_nodes(root: &PohonKinerja, descendants: &[PohonKinerja]) -> Vec<PohonKinerja> {
    let mut picked = vec![root.clone()];
    let mut next = 0;
    while next < picked.len() {
        let (id, kode_opd) = (picked[next].id, picked[next].kode_opd.clone());
        picked.extend(
            descendants
                .iter()
                .filter(|n| n.parent == id && n.kode_opd == kode_opd)
                .cloned(),
        );
        next += 1;
    }
    picked
}

/// Pemda sources to send back to "menunggu_disetujui" once their OPD copies
/// are deleted
pub fn sources_to_reset(clone_from: &[i32]) -> Vec<i32> {
    let mut sources: Vec<i32> = clone_from.iter().copied().filter(|&c| c > 0).collect();
    sources.sort_unstable();
    sources.dedup();
    sources
}

/// Tujuan OPD shown above a tree, with only the targets of `tahun`
pub fn tujuan_for_tahun(tujuan: TujuanOpd, tahun: &str) -> TujuanOpdPokinResponse {
    TujuanOpdPokinResponse {
        id: tujuan.id,
        kode_opd: tujuan.kode_opd,
        tujuan: tujuan.tujuan,
        indikator: tujuan
            .indikator
            .into_iter()
            .map(|ind| IndikatorTujuanPokinResponse {
                indikator: ind.indikator,
                targets: ind
                    .target
                    .into_iter()
                    .filter(|t| t.tahun == tahun)
                    .map(|t| TargetTujuanPokinResponse {
                        tahun: t.tahun,
                        target: t.target,
                        satuan: t.satuan,
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Indikator of a node from the request, keeping ids the caller sent and
/// dating every target with the node's year
fn indikator_from_request(items: Vec<IndikatorPokinRequest>, tahun: &str) -> Vec<Indikator> {
    items
        .into_iter()
        .map(|ind| {
            let indikator_id = non_empty_or(ind.id, || id::short_id("IND"));
            Indikator {
                target: ind
                    .target
                    .into_iter()
                    .map(|t| Target {
                        id: non_empty_or(t.id, || id::short_id("TRG")),
                        indikator_id: indikator_id.clone(),
                        target: t.target,
                        satuan: t.satuan,
                        tahun: tahun.to_string(),
                    })
                    .collect(),
                id: indikator_id,
                indikator: ind.indikator,
                tahun: tahun.to_string(),
                ..Default::default()
            }
        })
        .collect()
}

fn non_empty_or(value: String, generate: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        generate()
    } else {
        value
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Create an OPD node
pub async fn create(pool: &PgPool, req: PohonKinerjaRequest) -> Result<PohonKinerjaOpdResponse> {
    validate(&req, true)?;
    insert_node(pool, req).await
}

/// Create a pemda-side node (tematik and below)
pub async fn create_tematik(
    pool: &PgPool,
    req: PohonKinerjaRequest,
) -> Result<PohonKinerjaOpdResponse> {
    validate(&req, false)?;
    insert_node(pool, req).await
}

async fn insert_node(pool: &PgPool, req: PohonKinerjaRequest) -> Result<PohonKinerjaOpdResponse> {
    let mut tx = pool.begin().await?;

    check_references(&mut tx, &req).await?;
    if req.parent != pokin::ROOT_PARENT {
        check_parent(&mut tx, req.parent, req.level_pohon).await?;
    }

    let mut node = PohonKinerja {
        parent: req.parent,
        jenis_pohon: non_empty_or(req.jenis_pohon, || {
            pokin::jenis_pohon_for_level(req.level_pohon)
        }),
        nama_pohon: req.nama_pohon,
        kode_opd: req.kode_opd,
        keterangan: req.keterangan,
        tahun: req.tahun,
        level_pohon: req.level_pohon,
        status: req.status,
        is_active: true,
        ..Default::default()
    };
    node.id = pohon_kinerja_repository::insert(&mut tx, &node).await?;

    let owner = IndikatorOwner::Pokin(node.id);
    for indikator in indikator_from_request(req.indikator, &node.tahun) {
        indikator_repository::insert(&mut tx, &owner, &indikator).await?;
    }
    for p in &req.pelaksana {
        pohon_kinerja_repository::insert_pelaksana(
            &mut tx,
            &PelaksanaPokin {
                id: id::short_id("PLKS"),
                pohon_kinerja_id: node.id,
                pegawai_id: p.pegawai_id.clone(),
                ..Default::default()
            },
        )
        .await?;
    }

    let response = load_node(&mut tx, node.id).await?;
    tx.commit().await?;

    tracing::info!(
        "Pohon kinerja created: {} (level {}, parent {})",
        response.id,
        response.level_pohon,
        response.parent
    );

    Ok(response)
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    req: PohonKinerjaRequest,
) -> Result<PohonKinerjaOpdResponse> {
    let mut tx = pool.begin().await?;

    let existing = pohon_kinerja_repository::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", id))?;
    validate(&req, !existing.is_pemda_level())?;

    check_references(&mut tx, &req).await?;
    let parent = if req.parent == pokin::ROOT_PARENT {
        None
    } else {
        let parent = pohon_kinerja_repository::find_by_id(&mut tx, req.parent)
            .await?
            .ok_or_else(|| ServiceError::not_found("parent pohon kinerja", req.parent))?;
        Some(parent)
    };
    let children = pohon_kinerja_repository::find_children(&mut tx, id).await?;
    check_update_levels(id, req.level_pohon, parent.as_ref(), &children)?;

    let node = PohonKinerja {
        id,
        parent: req.parent,
        jenis_pohon: non_empty_or(req.jenis_pohon, || {
            pokin::jenis_pohon_for_level(req.level_pohon)
        }),
        nama_pohon: req.nama_pohon,
        kode_opd: req.kode_opd,
        keterangan: req.keterangan,
        tahun: req.tahun,
        level_pohon: req.level_pohon,
        status: req.status,
        ..existing
    };
    pohon_kinerja_repository::update(&mut tx, &node).await?;

    let indikator = indikator_from_request(req.indikator, &node.tahun);
    indikator_repository::replace_for_owner(&mut tx, &IndikatorOwner::Pokin(id), &indikator)
        .await?;

    pohon_kinerja_repository::delete_pelaksana_by_pokin(&mut tx, id).await?;
    for p in &req.pelaksana {
        pohon_kinerja_repository::insert_pelaksana(
            &mut tx,
            &PelaksanaPokin {
                id: id::short_id("PLKS"),
                pohon_kinerja_id: id,
                pegawai_id: p.pegawai_id.clone(),
                ..Default::default()
            },
        )
        .await?;
    }

    let response = load_node(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Pohon kinerja updated: {}", id);

    Ok(response)
}

/// Delete a node and everything below it
pub async fn delete(pool: &PgPool, id: i32) -> Result<()> {
    let mut tx = pool.begin().await?;

    pohon_kinerja_repository::find_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", id))?;

    let removed = pohon_kinerja_repository::delete_subtree(&mut tx, id).await?;
    let sources = sources_to_reset(&removed);
    if !sources.is_empty() {
        pohon_kinerja_repository::set_status(&mut tx, &sources, STATUS_MENUNGGU_DISETUJUI).await?;
    }
    tx.commit().await?;

    tracing::info!(
        "Pohon kinerja {} deleted with its subtree ({} pemda sources reset)",
        id,
        sources.len()
    );
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<PohonKinerjaOpdResponse> {
    let mut conn = pool.acquire().await?;
    load_node(&mut conn, id).await
}

pub async fn delete_pelaksana(pool: &PgPool, id: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    if !pohon_kinerja_repository::delete_pelaksana(&mut conn, id).await? {
        return Err(ServiceError::not_found("pelaksana", id));
    }

    tracing::info!("Pelaksana deleted: {}", id);
    Ok(())
}

/// The node above `id` with the employees executing it
pub async fn find_pokin_atasan(pool: &PgPool, id: i32) -> Result<PokinAtasanResponse> {
    let mut conn = pool.acquire().await?;

    let node = pohon_kinerja_repository::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", id))?;
    if node.is_root() {
        return Err(ServiceError::NotFound(format!(
            "pohon kinerja {} has no parent",
            id
        )));
    }

    let parent = pohon_kinerja_repository::find_by_id(&mut conn, node.parent)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", node.parent))?;
    let pelaksana = pohon_kinerja_repository::find_pelaksana_by_pokin_ids(&mut conn, &[parent.id])
        .await?
        .remove(&parent.id)
        .unwrap_or_default();

    Ok(PokinAtasanResponse {
        id: parent.id,
        nama_pohon: parent.nama_pohon,
        pegawai: pelaksana
            .into_iter()
            .map(|p| PegawaiPokinResponse {
                id_pegawai: p.pegawai_id,
                nip_pegawai: p.nip,
                nama_pegawai: p.nama_pegawai,
            })
            .collect(),
    })
}

/// The whole tree of an OPD for a year, with its goals
pub async fn find_all_opd(
    pool: &PgPool,
    kode_opd: &str,
    tahun: &str,
) -> Result<PohonKinerjaOpdAllResponse> {
    let mut conn = pool.acquire().await?;

    let opd = opd_repository::find_by_kode(&mut conn, kode_opd)
        .await?
        .ok_or_else(|| ServiceError::not_found("opd", kode_opd))?;

    let mut nodes = pohon_kinerja_repository::find_by_opd_tahun(&mut conn, kode_opd, tahun).await?;
    nodes.retain(|n| !pokin::is_pemda_proposal(&n.status));
    load_details(&mut conn, &mut nodes).await?;

    let mut tujuan = tujuan_opd_repository::find_by_opd_tahun(&mut conn, kode_opd, tahun).await?;
    let tujuan_ids: Vec<i32> = tujuan.iter().map(|t| t.id).collect();
    let mut tujuan_indikator = indikator_repository::find_by_tujuan_ids(&mut conn, &tujuan_ids).await?;
    for t in tujuan.iter_mut() {
        t.indikator = tujuan_indikator.remove(&t.id).unwrap_or_default();
    }

    tracing::debug!(
        "Assembling tree of {} for {} from {} nodes",
        kode_opd,
        tahun,
        nodes.len()
    );

    Ok(PohonKinerjaOpdAllResponse {
        kode_opd: opd.kode_opd,
        nama_opd: opd.nama_opd,
        tahun: tahun.to_string(),
        tujuan_opd: tujuan
            .into_iter()
            .map(|t| tujuan_for_tahun(t, tahun))
            .collect(),
        childs: build_tree(nodes, LEVEL_STRATEGIC),
    })
}

/// Nodes handed down from the pemda tree, counted per level
pub async fn count_pokin_pemda(
    pool: &PgPool,
    kode_opd: &str,
    tahun: &str,
) -> Result<CountPokinPemdaResponse> {
    let mut conn = pool.acquire().await?;

    let opd = opd_repository::find_by_kode(&mut conn, kode_opd)
        .await?
        .ok_or_else(|| ServiceError::not_found("opd", kode_opd))?;
    let counts = pohon_kinerja_repository::count_by_level_with_status(
        &mut conn,
        kode_opd,
        tahun,
        STATUS_POKIN_PEMDA,
    )
    .await?;

    let (detail_level, total_pemda) = level_details(&counts);

    Ok(CountPokinPemdaResponse {
        kode_opd: opd.kode_opd,
        nama_opd: opd.nama_opd,
        tahun: tahun.to_string(),
        total_pemda,
        detail_level,
    })
}

/// Copy every node of an OPD from one year into another
pub async fn clone(pool: &PgPool, req: PohonKinerjaCloneRequest) -> Result<usize> {
    validate_clone(&req)?;

    let mut tx = pool.begin().await?;

    if !opd_repository::exists(&mut tx, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }
    if pohon_kinerja_repository::exists_for_opd_tahun(&mut tx, &req.kode_opd, &req.tahun_tujuan)
        .await?
    {
        return Err(ServiceError::Conflict(format!(
            "pohon kinerja {} already has data for {}",
            req.kode_opd, req.tahun_tujuan
        )));
    }

    let mut nodes =
        pohon_kinerja_repository::find_by_opd_tahun(&mut tx, &req.kode_opd, &req.tahun_sumber)
            .await?;
    nodes.retain(|n| !pokin::is_pemda_proposal(&n.status));
    if nodes.is_empty() {
        return Err(ServiceError::NotFound(format!(
            "no pohon kinerja for {} in {}",
            req.kode_opd, req.tahun_sumber
        )));
    }
    load_details(&mut tx, &mut nodes).await?;

    // parents are inserted before children because nodes come ordered by level
    let mut new_ids: HashMap<i32, i32> = HashMap::new();
    for source in &nodes {
        let copy = PohonKinerja {
            id: 0,
            parent: new_ids.get(&source.parent).copied().unwrap_or(pokin::ROOT_PARENT),
            tahun: req.tahun_tujuan.clone(),
            clone_from: 0,
            indikator: Vec::new(),
            pelaksana: Vec::new(),
            ..source.clone()
        };
        let new_id = pohon_kinerja_repository::insert(&mut tx, &copy).await?;
        new_ids.insert(source.id, new_id);
        copy_details(&mut tx, source, new_id, &req.tahun_tujuan).await?;
    }
    tx.commit().await?;

    tracing::info!(
        "Cloned {} pohon kinerja nodes of {} from {} to {}",
        new_ids.len(),
        req.kode_opd,
        req.tahun_sumber,
        req.tahun_tujuan
    );

    Ok(new_ids.len())
}

/// Take a pemda proposal over into an OPD tree.
///
/// The proposal and its same-OPD subtree are copied under `req.parent` with
/// status "pokin dari pemda" and `clone_from` pointing at their sources,
/// which are marked "disetujui".
pub async fn clone_from_pemda(
    pool: &PgPool,
    req: PokinPemdaCloneRequest,
) -> Result<PohonKinerjaOpdResponse> {
    let mut tx = pool.begin().await?;

    let source = pohon_kinerja_repository::find_by_id(&mut tx, req.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", req.id))?;
    if !pokin::can_hand_off(&source.status) {
        return Err(ServiceError::Validation(format!(
            "pohon kinerja {} must be {} or {} to be taken over",
            req.id, STATUS_MENUNGGU_DISETUJUI, STATUS_DITOLAK
        )));
    }
    if req.parent != pokin::ROOT_PARENT {
        check_parent(&mut tx, req.parent, source.level_pohon).await?;
    }

    let descendants = pohon_kinerja_repository::find_descendants(&mut tx, source.id).await?;
    let mut nodes = handoff_nodes(&source, &descendants);
    load_details(&mut tx, &mut nodes).await?;

    let mut new_ids: HashMap<i32, i32> = HashMap::new();
    for node in &nodes {
        let (parent, jenis_pohon) = if node.id == source.id {
            (req.parent, non_empty_or(req.jenis_pohon.clone(), || node.jenis_pohon.clone()))
        } else {
            let parent = new_ids.get(&node.parent).copied().unwrap_or(pokin::ROOT_PARENT);
            (parent, node.jenis_pohon.clone())
        };
        let copy = PohonKinerja {
            id: 0,
            parent,
            jenis_pohon,
            status: STATUS_POKIN_PEMDA.to_string(),
            clone_from: node.id,
            is_active: true,
            indikator: Vec::new(),
            pelaksana: Vec::new(),
            ..node.clone()
        };
        let new_id = pohon_kinerja_repository::insert(&mut tx, &copy).await?;
        new_ids.insert(node.id, new_id);
        copy_details(&mut tx, node, new_id, &node.tahun).await?;
    }

    let approved: Vec<i32> = nodes
        .iter()
        .filter(|n| pokin::can_hand_off(&n.status))
        .map(|n| n.id)
        .collect();
    pohon_kinerja_repository::set_status(&mut tx, &approved, STATUS_DISETUJUI).await?;

    let new_root = new_ids
        .get(&source.id)
        .copied()
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", source.id))?;
    let response = load_node(&mut tx, new_root).await?;
    tx.commit().await?;

    tracing::info!(
        "Pohon kinerja {} taken over from pemda as {} ({} nodes)",
        source.id,
        new_root,
        new_ids.len()
    );

    Ok(response)
}

/// Turn a pemda proposal down
pub async fn reject_pemda(pool: &PgPool, req: PokinTolakRequest) -> Result<()> {
    let mut conn = pool.acquire().await?;

    let node = pohon_kinerja_repository::find_by_id(&mut conn, req.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", req.id))?;
    if !pokin::can_reject(&node.status) {
        return Err(ServiceError::Validation(format!(
            "only pohon kinerja with status {} can be rejected",
            STATUS_MENUNGGU_DISETUJUI
        )));
    }

    pohon_kinerja_repository::set_status(&mut conn, &[req.id], STATUS_DITOLAK).await?;

    tracing::info!("Pemda pohon kinerja {} rejected", req.id);
    Ok(())
}

/// Pemda proposals addressed to an OPD that it has not taken over yet
pub async fn find_from_pemda(
    pool: &PgPool,
    kode_opd: &str,
    tahun: &str,
) -> Result<Vec<PohonKinerjaNodeResponse>> {
    let mut conn = pool.acquire().await?;

    if !opd_repository::exists(&mut conn, kode_opd).await? {
        return Err(ServiceError::not_found("opd", kode_opd));
    }

    let mut nodes = pohon_kinerja_repository::find_by_opd_tahun(&mut conn, kode_opd, tahun).await?;
    nodes.retain(|n| pokin::can_hand_off(&n.status));
    load_details(&mut conn, &mut nodes).await?;

    Ok(nodes.into_iter().map(PohonKinerjaNodeResponse::from).collect())
}

/// Tematik of a year with their sub tematik
pub async fn find_sub_tematik(pool: &PgPool, tahun: &str) -> Result<SubTematikResponse> {
    let mut conn = pool.acquire().await?;

    let mut nodes = pohon_kinerja_repository::find_all_by_tahun(&mut conn, tahun).await?;
    nodes.retain(|n| n.level_pohon <= 1);
    load_details(&mut conn, &mut nodes).await?;

    Ok(SubTematikResponse {
        tahun: tahun.to_string(),
        tematiks: sub_tematik_tree(nodes),
    })
}

/// Every tematik tree of a year
pub async fn find_all_tematik(pool: &PgPool, tahun: &str) -> Result<PohonKinerjaAdminResponse> {
    let mut conn = pool.acquire().await?;

    let mut nodes = pohon_kinerja_repository::find_all_by_tahun(&mut conn, tahun).await?;
    load_details(&mut conn, &mut nodes).await?;

    Ok(PohonKinerjaAdminResponse {
        tahun: tahun.to_string(),
        tematiks: build_tree(nodes, LEVEL_TEMATIK),
    })
}

pub async fn set_tematik_active(pool: &PgPool, req: TematikStatusRequest) -> Result<()> {
    let mut conn = pool.acquire().await?;

    let node = pohon_kinerja_repository::find_by_id(&mut conn, req.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", req.id))?;
    if node.level_pohon != LEVEL_TEMATIK {
        return Err(ServiceError::Validation(format!(
            "pohon kinerja {} is not a tematik",
            req.id
        )));
    }

    pohon_kinerja_repository::set_active(&mut conn, req.id, req.is_active).await?;

    tracing::info!("Tematik {} is_active = {}", req.id, req.is_active);
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

async fn check_references(conn: &mut PgConnection, req: &PohonKinerjaRequest) -> Result<()> {
    if !req.kode_opd.is_empty() && !opd_repository::exists(&mut *conn, &req.kode_opd).await? {
        return Err(ServiceError::not_found("opd", &req.kode_opd));
    }

    let pegawai_ids: Vec<String> = req.pelaksana.iter().map(|p| p.pegawai_id.clone()).collect();
    if !pegawai_ids.is_empty() {
        let found = pegawai_repository::find_by_ids(conn, &pegawai_ids).await?;
        if let Some(missing) = pegawai_ids.iter().find(|id| !found.contains_key(*id)) {
            return Err(ServiceError::not_found("pegawai", missing));
        }
    }

    Ok(())
}

async fn check_parent(conn: &mut PgConnection, parent_id: i32, level: i32) -> Result<()> {
    let parent = pohon_kinerja_repository::find_by_id(conn, parent_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("parent pohon kinerja", parent_id))?;

    if !pokin::is_valid_child_level(parent.level_pohon, level) {
        return Err(ServiceError::Validation(format!(
            "level_pohon {} must be greater than parent level {}",
            level, parent.level_pohon
        )));
    }
    Ok(())
}

/// Copy indikator, targets and pelaksana of `source` onto node `new_id`,
/// dated `tahun`
async fn copy_details(
    conn: &mut PgConnection,
    source: &PohonKinerja,
    new_id: i32,
    tahun: &str,
) -> Result<()> {
    let owner = IndikatorOwner::Pokin(new_id);
    for ind in &source.indikator {
        let indikator_id = id::short_id("IND");
        let indikator = Indikator {
            id: indikator_id.clone(),
            tahun: tahun.to_string(),
            target: ind
                .target
                .iter()
                .map(|t| Target {
                    id: id::short_id("TRG"),
                    indikator_id: indikator_id.clone(),
                    tahun: tahun.to_string(),
                    ..t.clone()
                })
                .collect(),
            ..ind.clone()
        };
        indikator_repository::insert(&mut *conn, &owner, &indikator).await?;
    }

    for p in &source.pelaksana {
        pohon_kinerja_repository::insert_pelaksana(
            &mut *conn,
            &PelaksanaPokin {
                id: id::short_id("PLKS"),
                pohon_kinerja_id: new_id,
                pegawai_id: p.pegawai_id.clone(),
                ..Default::default()
            },
        )
        .await?;
    }
    Ok(())
}

/// Fill indikator and pelaksana of many nodes with two batched queries each
async fn load_details(conn: &mut PgConnection, nodes: &mut [PohonKinerja]) -> Result<()> {
    let ids: Vec<i32> = nodes.iter().map(|n| n.id).collect();
    let mut indikator = indikator_repository::find_by_pokin_ids(&mut *conn, &ids).await?;
    let mut pelaksana = pohon_kinerja_repository::find_pelaksana_by_pokin_ids(conn, &ids).await?;

    for node in nodes.iter_mut() {
        node.indikator = indikator.remove(&node.id).unwrap_or_default();
        node.pelaksana = pelaksana.remove(&node.id).unwrap_or_default();
    }
    Ok(())
}

async fn load_node(conn: &mut PgConnection, id: i32) -> Result<PohonKinerjaOpdResponse> {
    let node = pohon_kinerja_repository::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("pohon kinerja", id))?;

    let mut nodes = [node];
    load_details(conn, &mut nodes).await?;
    let [node] = nodes;

    Ok(node.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinerja_core::domain::indikator::Indikator;

    fn node(id: i32, parent: i32, level: i32) -> PohonKinerja {
        PohonKinerja {
            id,
            parent,
            level_pohon: level,
            nama_pohon: format!("node {}", id),
            kode_opd: "1.01.0.00.0.00.01.0000".to_string(),
            tahun: "2025".to_string(),
            ..Default::default()
        }
    }

    fn ids(nodes: &[PohonKinerjaNodeResponse]) -> Vec<i32> {
        nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_build_tree_nests_levels() {
        let tree = build_tree(
            vec![node(1, 0, 4), node(2, 1, 5), node(3, 2, 6), node(4, 3, 7)],
            LEVEL_STRATEGIC,
        );
        assert_eq!(ids(&tree), vec![1]);
        assert_eq!(ids(&tree[0].childs), vec![2]);
        assert_eq!(ids(&tree[0].childs[0].childs), vec![3]);
        assert_eq!(ids(&tree[0].childs[0].childs[0].childs), vec![4]);
        assert_eq!(tree[0].childs[0].childs[0].childs[0].parent, Some(3));
    }

    #[test]
    fn test_pemda_nodes_sort_first_then_by_id() {
        let mut pemda = node(9, 1, 5);
        pemda.status = STATUS_POKIN_PEMDA.to_string();
        let tree = build_tree(
            vec![node(1, 0, 4), node(5, 1, 5), node(3, 1, 5), pemda],
            LEVEL_STRATEGIC,
        );
        assert_eq!(ids(&tree[0].childs), vec![9, 3, 5]);
    }

    #[test]
    fn test_strategic_under_pemda_parent_is_a_root() {
        // parent 77 lives in the pemda tree, outside this OPD's node set
        let tree = build_tree(vec![node(10, 77, 4), node(11, 10, 5)], LEVEL_STRATEGIC);
        assert_eq!(ids(&tree), vec![10]);
        assert_eq!(ids(&tree[0].childs), vec![11]);
    }

    #[test]
    fn test_orphans_and_level_violations_are_dropped() {
        let tree = build_tree(
            vec![
                node(1, 0, 4),
                node(2, 1, 4),  // same level as parent
                node(3, 99, 5), // parent missing
                node(4, 1, 6),
            ],
            LEVEL_STRATEGIC,
        );
        assert_eq!(ids(&tree), vec![1]);
        assert_eq!(ids(&tree[0].childs), vec![4]);
    }

    #[test]
    fn test_tematik_tree_roots_at_level_zero() {
        let mut tematik = node(1, 0, 0);
        tematik.kode_opd.clear();
        let mut sub = node(2, 1, 1);
        sub.kode_opd.clear();
        let tree = build_tree(vec![tematik, sub, node(3, 2, 4)], LEVEL_TEMATIK);
        assert_eq!(ids(&tree), vec![1]);
        assert!(tree[0].perangkat_daerah.is_none());
        assert_eq!(ids(&tree[0].childs[0].childs), vec![3]);
        assert!(tree[0].childs[0].childs[0].perangkat_daerah.is_some());
    }

    #[test]
    fn test_level_details_always_list_opd_levels() {
        let mut counts = HashMap::new();
        counts.insert(5, 2);
        counts.insert(8, 1);
        counts.insert(7, 4);

        let (details, total) = level_details(&counts);
        let levels: Vec<i32> = details.iter().map(|d| d.level).collect();
        assert_eq!(levels, vec![4, 5, 6, 7, 8]);
        assert_eq!(details[0].jumlah_pemda, 0);
        assert_eq!(details[1].jumlah_pemda, 2);
        assert_eq!(details[3].jenis_pohon, "Operational-1");
        assert_eq!(details[4].jenis_pohon, "Operational-2");
        assert_eq!(total, 7);
    }

    #[test]
    fn test_tujuan_targets_filtered_by_year() {
        let tujuan = TujuanOpd {
            id: 4,
            kode_opd: "1.01".to_string(),
            tujuan: "Meningkatkan kualitas perencanaan".to_string(),
            indikator: vec![Indikator {
                indikator: "Indeks perencanaan".to_string(),
                target: vec![
                    Target {
                        tahun: "2024".to_string(),
                        target: "70".to_string(),
                        ..Default::default()
                    },
                    Target {
                        tahun: "2025".to_string(),
                        target: "75".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        let response = tujuan_for_tahun(tujuan, "2025");
        assert_eq!(response.indikator[0].targets.len(), 1);
        assert_eq!(response.indikator[0].targets[0].target, "75");
    }

    #[test]
    fn test_indikator_ids_kept_or_generated() {
        let items = vec![
            IndikatorPokinRequest {
                id: "IND-keep0001".to_string(),
                indikator: "a".to_string(),
                target: vec![Default::default()],
            },
            IndikatorPokinRequest {
                indikator: "b".to_string(),
                ..Default::default()
            },
        ];
        let result = indikator_from_request(items, "2026");
        assert_eq!(result[0].id, "IND-keep0001");
        assert_eq!(result[0].target[0].indikator_id, "IND-keep0001");
        assert_eq!(result[0].target[0].tahun, "2026");
        assert!(result[0].target[0].id.starts_with("TRG-"));
        assert!(result[1].id.starts_with("IND-"));
    }

    #[test]
    fn test_validation_rules() {
        let err = validate(&PohonKinerjaRequest::default(), true)
            .unwrap_err()
            .to_string();
        assert_eq!(
            err,
            "nama_pohon is required; tahun is required; kode_opd is required"
        );

        let tematik = PohonKinerjaRequest {
            nama_pohon: "Tematik A".to_string(),
            tahun: "2025".to_string(),
            level_pohon: 0,
            ..Default::default()
        };
        assert!(validate(&tematik, false).is_ok());

        let strategic_without_opd = PohonKinerjaRequest {
            level_pohon: 4,
            ..tematik
        };
        assert!(validate(&strategic_without_opd, false).is_err());
    }

    #[test]
    fn test_update_levels_rejected() {
        let children = [node(3, 2, 6)];

        let err = check_update_levels(2, 5, Some(&node(2, 1, 4)), &[]).unwrap_err();
        assert_eq!(err.to_string(), "parent must not be the node itself");

        let err = check_update_levels(2, 4, Some(&node(1, 0, 4)), &children).unwrap_err();
        assert_eq!(
            err.to_string(),
            "level_pohon 4 must be greater than parent level 4"
        );

        let err = check_update_levels(2, 6, None, &children).unwrap_err();
        assert_eq!(
            err.to_string(),
            "level_pohon 6 must stay below child 3 at level 6"
        );
    }

    #[test]
    fn test_update_levels_accepted() {
        let children = [node(3, 2, 6), node(4, 2, 7)];
        assert!(check_update_levels(2, 5, Some(&node(1, 0, 4)), &children).is_ok());
        assert!(check_update_levels(2, 4, None, &children).is_ok());
        assert!(check_update_levels(2, 5, Some(&node(1, 0, 4)), &[]).is_ok());
    }

    fn opd_node(id: i32, parent: i32, level: i32, kode_opd: &str) -> PohonKinerja {
        PohonKinerja {
            kode_opd: kode_opd.to_string(),
            ..node(id, parent, level)
        }
    }

    #[test]
    fn test_handoff_stays_inside_the_opd() {
        let root = opd_node(10, 2, 4, "1.01");
        let descendants = [
            opd_node(20, 10, 5, "1.01"),
            opd_node(21, 10, 5, "2.02"),
            opd_node(30, 20, 6, "1.01"),
            opd_node(31, 21, 6, "1.01"),
        ];
        let picked: Vec<i32> = handoff_nodes(&root, &descendants)
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(picked, vec![10, 20, 30]);
    }

    #[test]
    fn test_handoff_of_a_leaf_is_the_leaf() {
        let root = opd_node(10, 2, 6, "1.01");
        assert_eq!(handoff_nodes(&root, &[]), vec![root]);
    }

    #[test]
    fn test_delete_resets_each_pemda_source_once() {
        assert_eq!(sources_to_reset(&[0, 12, 0, 7, 12]), vec![7, 12]);
        assert!(sources_to_reset(&[0, 0]).is_empty());
        assert!(sources_to_reset(&[]).is_empty());
    }

    #[test]
    fn test_sub_tematik_tree() {
        let mut tematik_b = node(5, 0, 0);
        tematik_b.nama_pohon = "Kemiskinan".to_string();
        let tree = sub_tematik_tree(vec![
            node(9, 1, 1),
            tematik_b,
            node(1, 0, 0),
            node(3, 1, 1),
            node(7, 3, 2),
            node(8, 42, 1),
        ]);

        let ids: Vec<i32> = tree.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 5]);
        let subs: Vec<i32> = tree[0].childs.iter().map(|t| t.id).collect();
        assert_eq!(subs, vec![3, 9]);
        assert_eq!(tree[0].childs[0].parent, Some(1));
        assert!(tree[1].childs.is_empty());
        assert_eq!(tree[1].tema, "Kemiskinan");
    }

    #[test]
    fn test_clone_years_must_differ() {
        let req = PohonKinerjaCloneRequest {
            kode_opd: "1.01".to_string(),
            tahun_sumber: "2025".to_string(),
            tahun_tujuan: "2025".to_string(),
        };
        assert!(validate_clone(&req).is_err());
        assert!(
            validate_clone(&PohonKinerjaCloneRequest {
                tahun_tujuan: "2026".to_string(),
                ..req
            })
            .is_ok()
        );
    }
}
