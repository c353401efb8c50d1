//! Pohon kinerja DTOs
//!
//! Every tree endpoint (OPD trees and the pemda tematik trees) renders nodes
//! with the same recursive [`PohonKinerjaNodeResponse`]. Roots serialize
//! `"parent": null`, and `childs` is left out for leaves.

use serde::{Deserialize, Serialize};

use crate::domain::indikator::{Indikator, Target};
use crate::domain::pohon_kinerja::{PelaksanaPokin, PohonKinerja};
use crate::dto::opd::OpdRef;

// ============================================================================
// Requests
// ============================================================================

/// Body of create and update, for OPD nodes and tematik nodes alike
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PohonKinerjaRequest {
    #[serde(default)]
    pub parent: i32,
    #[serde(default)]
    pub nama_pohon: String,
    #[serde(default)]
    pub jenis_pohon: String,
    #[serde(default)]
    pub level_pohon: i32,
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub keterangan: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pelaksana: Vec<PelaksanaRequest>,
    #[serde(default)]
    pub indikator: Vec<IndikatorPokinRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PelaksanaRequest {
    #[serde(default)]
    pub pegawai_id: String,
}

/// `id` is empty for new indikator; existing ids are kept on update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndikatorPokinRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub indikator: String,
    #[serde(default)]
    pub target: Vec<TargetPokinRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetPokinRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub satuan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TematikStatusRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PohonKinerjaCloneRequest {
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub tahun_sumber: String,
    #[serde(default)]
    pub tahun_tujuan: String,
}

/// Take a pemda proposal over into an OPD tree under `parent`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PokinPemdaCloneRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub parent: i32,
    #[serde(default)]
    pub jenis_pohon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PokinTolakRequest {
    #[serde(default)]
    pub id: i32,
}

// ============================================================================
// Responses
// ============================================================================

/// Single node as returned by create, update and detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PohonKinerjaOpdResponse {
    pub id: i32,
    pub parent: String,
    pub nama_pohon: String,
    pub jenis_pohon: String,
    pub level_pohon: i32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub kode_opd: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub nama_opd: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub keterangan: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tahun: String,
    pub status: String,
    pub pelaksana: Vec<PelaksanaResponse>,
    pub indikator: Vec<IndikatorResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PelaksanaResponse {
    pub id_pelaksana: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub pohon_kinerja_id: String,
    pub pegawai_id: String,
    pub nip: String,
    pub nama_pegawai: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndikatorResponse {
    pub id_indikator: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub kode: String,
    pub nama_indikator: String,
    pub targets: Vec<TargetResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetResponse {
    pub id_target: String,
    pub indikator_id: String,
    pub target: String,
    pub satuan: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tahun: String,
}

/// Recursive tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PohonKinerjaNodeResponse {
    pub id: i32,
    pub parent: Option<i32>,
    pub nama_pohon: String,
    pub jenis_pohon: String,
    pub level_pohon: i32,
    pub keterangan: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub perangkat_daerah: Option<OpdRef>,
    pub is_active: bool,
    pub pelaksana: Vec<PelaksanaResponse>,
    pub indikator: Vec<IndikatorResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub childs: Vec<PohonKinerjaNodeResponse>,
}

/// Whole tree of an OPD for one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PohonKinerjaOpdAllResponse {
    pub kode_opd: String,
    pub nama_opd: String,
    pub tahun: String,
    pub tujuan_opd: Vec<TujuanOpdPokinResponse>,
    pub childs: Vec<PohonKinerjaNodeResponse>,
}

/// Tujuan OPD as shown above an OPD tree, targets limited to the tree's year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TujuanOpdPokinResponse {
    pub id: i32,
    pub kode_opd: String,
    pub tujuan: String,
    pub indikator: Vec<IndikatorTujuanPokinResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndikatorTujuanPokinResponse {
    pub indikator: String,
    pub targets: Vec<TargetTujuanPokinResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetTujuanPokinResponse {
    pub tahun: String,
    pub target: String,
    pub satuan: String,
}

/// Tematik trees of a year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PohonKinerjaAdminResponse {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tahun: String,
    pub tematiks: Vec<PohonKinerjaNodeResponse>,
}

/// Tematik and their sub tematik of a year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTematikResponse {
    pub tahun: String,
    pub tematiks: Vec<TemaResponse>,
}

/// Tematik (with `childs`) or sub tematik (without)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemaResponse {
    pub id: i32,
    pub parent: Option<i32>,
    pub tema: String,
    pub jenis_pohon: String,
    pub level_pohon: i32,
    pub indikator: Vec<IndikatorResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub childs: Vec<TemaResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPokinPemdaResponse {
    pub kode_opd: String,
    pub nama_opd: String,
    pub tahun: String,
    pub total_pemda: i64,
    pub detail_level: Vec<LevelDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDetail {
    pub level: i32,
    pub jenis_pohon: String,
    pub jumlah_pemda: i64,
}

/// Parent of a node with the employees executing it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokinAtasanResponse {
    pub id: i32,
    pub nama_pohon: String,
    pub pegawai: Vec<PegawaiPokinResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegawaiPokinResponse {
    pub id_pegawai: String,
    pub nip_pegawai: String,
    pub nama_pegawai: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<PohonKinerja> for PohonKinerjaOpdResponse {
    fn from(p: PohonKinerja) -> Self {
        PohonKinerjaOpdResponse {
            id: p.id,
            parent: p.parent.to_string(),
            nama_pohon: p.nama_pohon,
            jenis_pohon: p.jenis_pohon,
            level_pohon: p.level_pohon,
            kode_opd: p.kode_opd,
            nama_opd: p.nama_opd,
            keterangan: p.keterangan,
            tahun: p.tahun,
            status: p.status,
            pelaksana: p.pelaksana.into_iter().map(Into::into).collect(),
            indikator: p.indikator.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PohonKinerja> for PohonKinerjaNodeResponse {
    fn from(p: PohonKinerja) -> Self {
        let parent = (!p.is_root()).then_some(p.parent);
        let perangkat_daerah =
            (!p.kode_opd.is_empty()).then(|| OpdRef::new(p.kode_opd.clone(), p.nama_opd.clone()));
        PohonKinerjaNodeResponse {
            id: p.id,
            parent,
            nama_pohon: p.nama_pohon,
            jenis_pohon: p.jenis_pohon,
            level_pohon: p.level_pohon,
            keterangan: p.keterangan,
            status: p.status,
            perangkat_daerah,
            is_active: p.is_active,
            pelaksana: p.pelaksana.into_iter().map(Into::into).collect(),
            indikator: p.indikator.into_iter().map(Into::into).collect(),
            childs: Vec::new(),
        }
    }
}

impl From<PohonKinerja> for TemaResponse {
    fn from(p: PohonKinerja) -> Self {
        TemaResponse {
            id: p.id,
            parent: (!p.is_root()).then_some(p.parent),
            tema: p.nama_pohon,
            jenis_pohon: p.jenis_pohon,
            level_pohon: p.level_pohon,
            indikator: p.indikator.into_iter().map(Into::into).collect(),
            childs: Vec::new(),
        }
    }
}

impl From<PelaksanaPokin> for PelaksanaResponse {
    fn from(p: PelaksanaPokin) -> Self {
        PelaksanaResponse {
            id_pelaksana: p.id,
            pohon_kinerja_id: p.pohon_kinerja_id.to_string(),
            pegawai_id: p.pegawai_id,
            nip: p.nip,
            nama_pegawai: p.nama_pegawai,
        }
    }
}

impl From<Indikator> for IndikatorResponse {
    fn from(i: Indikator) -> Self {
        IndikatorResponse {
            id_indikator: i.id,
            kode: i.kode,
            nama_indikator: i.indikator,
            targets: i.target.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Target> for TargetResponse {
    fn from(t: Target) -> Self {
        TargetResponse {
            id_target: t.id,
            indikator_id: t.indikator_id,
            target: t.target,
            satuan: t.satuan,
            tahun: t.tahun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i32, parent: i32, level: i32) -> PohonKinerja {
        PohonKinerja {
            id,
            parent,
            nama_pohon: format!("node {}", id),
            kode_opd: "5.01.5.05.0.00.01.0000".to_string(),
            nama_opd: "Badan Perencanaan".to_string(),
            level_pohon: level,
            ..Default::default()
        }
    }

    #[test]
    fn test_root_node_serializes_null_parent_and_no_childs() {
        let value = serde_json::to_value(PohonKinerjaNodeResponse::from(node(1, 0, 4))).unwrap();
        assert!(value["parent"].is_null());
        assert!(value.get("childs").is_none());
        assert_eq!(value["perangkat_daerah"]["nama_opd"], "Badan Perencanaan");
    }

    #[test]
    fn test_child_node_keeps_parent_id() {
        let mut parent = PohonKinerjaNodeResponse::from(node(1, 0, 4));
        parent.childs.push(PohonKinerjaNodeResponse::from(node(2, 1, 5)));
        let value = serde_json::to_value(parent).unwrap();
        assert_eq!(value["childs"][0]["parent"], 1);
        assert_eq!(value["childs"][0]["level_pohon"], 5);
    }

    #[test]
    fn test_tematik_node_has_no_perangkat_daerah() {
        let mut tematik = node(1, 0, 0);
        tematik.kode_opd.clear();
        let value = serde_json::to_value(PohonKinerjaNodeResponse::from(tematik)).unwrap();
        assert!(value.get("perangkat_daerah").is_none());
    }

    #[test]
    fn test_tema_uses_node_name() {
        let mut tematik = node(1, 0, 0);
        tematik.nama_pohon = "Kemiskinan".to_string();
        let value = serde_json::to_value(TemaResponse::from(tematik)).unwrap();
        assert_eq!(value["tema"], "Kemiskinan");
        assert!(value["parent"].is_null());
        assert!(value.get("childs").is_none());
    }

    #[test]
    fn test_detail_parent_is_a_string() {
        let value = serde_json::to_value(PohonKinerjaOpdResponse::from(node(9, 3, 5))).unwrap();
        assert_eq!(value["parent"], "3");
    }

    #[test]
    fn test_request_defaults_missing_lists() {
        let req: PohonKinerjaRequest =
            serde_json::from_str(r#"{"nama_pohon":"x","tahun":"2025","level_pohon":4}"#).unwrap();
        assert_eq!(req.parent, 0);
        assert!(req.pelaksana.is_empty());
        assert!(req.indikator.is_empty());
    }
}
