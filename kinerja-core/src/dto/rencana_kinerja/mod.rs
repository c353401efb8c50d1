//! Rencana kinerja DTOs

use serde::{Deserialize, Serialize};

use crate::domain::indikator::{Indikator, Target};
use crate::domain::rencana_kinerja::RencanaKinerja;
use crate::dto::opd::OpdRef;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RencanaKinerjaRequest {
    #[serde(default)]
    pub id_pohon: i32,
    #[serde(default)]
    pub nama_rencana_kinerja: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub status_rencana_kinerja: String,
    #[serde(default)]
    pub catatan: String,
    #[serde(default)]
    pub kode_opd: String,
    /// NIP of the owning employee
    #[serde(default)]
    pub pegawai_id: String,
    #[serde(default)]
    pub indikator: Vec<IndikatorRekinRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndikatorRekinRequest {
    #[serde(default)]
    pub id_indikator: String,
    #[serde(default)]
    pub nama_indikator: String,
    #[serde(default)]
    pub rumus_perhitungan: String,
    #[serde(default)]
    pub sumber_data: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub target: Vec<TargetRekinRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRekinRequest {
    #[serde(default)]
    pub id_target: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub satuan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindByIdRekinsRequest {
    #[serde(default)]
    pub id_rekins: Vec<String>,
    #[serde(default)]
    pub bulan: i32,
    #[serde(default)]
    pub tahun: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RencanaKinerjaCloneRequest {
    #[serde(default)]
    pub tahun: String,
}

/// Query string of the rencana kinerja listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RencanaKinerjaFilter {
    pub pegawai_id: Option<String>,
    pub kode_opd: Option<String>,
    pub tahun: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RencanaKinerjaResponse {
    pub id_rencana_kinerja: String,
    pub id_pohon: i32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub nama_pohon: String,
    pub level_pohon: i32,
    pub nama_rencana_kinerja: String,
    pub tahun: String,
    pub status_rencana_kinerja: String,
    pub catatan: String,
    pub operasional_daerah: OpdRef,
    pub pegawai_id: String,
    pub nama_pegawai: String,
    pub indikator: Vec<IndikatorRekinResponse>,
    pub sub_kegiatan: Option<SubKegiatanRekinResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndikatorRekinResponse {
    pub id_indikator: String,
    pub rencana_kinerja_id: String,
    pub nama_indikator: String,
    pub rumus_perhitungan: String,
    pub sumber_data: String,
    pub targets: Vec<TargetRekinResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRekinResponse {
    pub id_target: String,
    pub indikator_id: String,
    pub target: String,
    pub satuan: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tahun: String,
}

/// Sub kegiatan funding a rencana kinerja
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubKegiatanRekinResponse {
    pub id: String,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
}

/// Plans and budgets of the node above a plan's node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RekinAtasanResponse {
    pub pokin_parent: PokinParentInfo,
    pub rekin_atasan: Vec<RekinAtasanDetail>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub program: Vec<ProgramAtasanResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub kegiatan: Vec<KegiatanAtasanResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sub_kegiatan: Vec<SubKegiatanAtasanResponse>,
    pub pagu_anggaran_total: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PokinParentInfo {
    pub id: i32,
    pub nama_pohon: String,
    pub level_pohon: i32,
    pub kode_opd: String,
    pub nama_opd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RekinAtasanDetail {
    pub id_rencana_kinerja: String,
    pub nama_rencana_kinerja: String,
    pub id_pohon: i32,
    pub tahun: String,
    pub status_rencana_kinerja: String,
    pub catatan: String,
    pub kode_opd: String,
    pub pegawai_id: String,
    pub nama_pegawai: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramAtasanResponse {
    pub kode_program: String,
    pub nama_program: String,
    pub pagu_program: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KegiatanAtasanResponse {
    pub kode_kegiatan: String,
    pub nama_kegiatan: String,
    pub pagu_kegiatan: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubKegiatanAtasanResponse {
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
    pub pagu_subkegiatan: i64,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<RencanaKinerja> for RencanaKinerjaResponse {
    fn from(r: RencanaKinerja) -> Self {
        let rekin_id = r.id.clone();
        RencanaKinerjaResponse {
            id_rencana_kinerja: r.id,
            id_pohon: r.id_pohon,
            nama_pohon: r.nama_pohon,
            level_pohon: r.level_pohon,
            nama_rencana_kinerja: r.nama_rencana_kinerja,
            tahun: r.tahun,
            status_rencana_kinerja: r.status_rencana_kinerja,
            catatan: r.catatan,
            operasional_daerah: OpdRef::new(r.kode_opd, r.nama_opd),
            pegawai_id: r.pegawai_id,
            nama_pegawai: r.nama_pegawai,
            indikator: r
                .indikator
                .into_iter()
                .map(|i| IndikatorRekinResponse::new(&rekin_id, i))
                .collect(),
            sub_kegiatan: None,
        }
    }
}

impl IndikatorRekinResponse {
    fn new(rekin_id: &str, i: Indikator) -> Self {
        IndikatorRekinResponse {
            id_indikator: i.id,
            rencana_kinerja_id: rekin_id.to_string(),
            nama_indikator: i.indikator,
            rumus_perhitungan: i.rumus_perhitungan,
            sumber_data: i.sumber_data,
            targets: i.target.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Target> for TargetRekinResponse {
    fn from(t: Target) -> Self {
        TargetRekinResponse {
            id_target: t.id,
            indikator_id: t.indikator_id,
            target: t.target,
            satuan: t.satuan,
            tahun: t.tahun,
        }
    }
}

impl From<RencanaKinerja> for RekinAtasanDetail {
    fn from(r: RencanaKinerja) -> Self {
        RekinAtasanDetail {
            id_rencana_kinerja: r.id,
            nama_rencana_kinerja: r.nama_rencana_kinerja,
            id_pohon: r.id_pohon,
            tahun: r.tahun,
            status_rencana_kinerja: r.status_rencana_kinerja,
            catatan: r.catatan,
            kode_opd: r.kode_opd,
            pegawai_id: r.pegawai_id,
            nama_pegawai: r.nama_pegawai,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_sub_kegiatan_serializes_null() {
        let rekin = RencanaKinerja {
            id: "REKIN-PEG-2025-00001".to_string(),
            kode_opd: "1.01".to_string(),
            nama_opd: "Dinas Pendidikan".to_string(),
            indikator: vec![Indikator {
                id: "IND-REKIN-00001".to_string(),
                indikator: "Angka partisipasi".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(RencanaKinerjaResponse::from(rekin)).unwrap();
        assert!(value["sub_kegiatan"].is_null());
        assert_eq!(value["operasional_daerah"]["kode_opd"], "1.01");
        assert_eq!(
            value["indikator"][0]["rencana_kinerja_id"],
            "REKIN-PEG-2025-00001"
        );
    }

    #[test]
    fn test_atasan_omits_empty_budget_lists() {
        let resp = RekinAtasanResponse {
            pokin_parent: PokinParentInfo::default(),
            rekin_atasan: Vec::new(),
            program: Vec::new(),
            kegiatan: Vec::new(),
            sub_kegiatan: Vec::new(),
            pagu_anggaran_total: 0,
        };
        let value = serde_json::to_value(resp).unwrap();
        assert!(value.get("program").is_none());
        assert!(value.get("kegiatan").is_none());
        assert!(value["rekin_atasan"].as_array().unwrap().is_empty());
        assert_eq!(value["pagu_anggaran_total"], 0);
    }
}
