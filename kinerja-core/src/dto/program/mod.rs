//! Program, kegiatan and sub kegiatan DTOs

use serde::{Deserialize, Serialize};

use crate::domain::indikator::{Indikator, Target};
use crate::domain::program::{
    Kegiatan, PaguSubKegiatan, Program, RekinSubKegiatan, SubKegiatan, SubKegiatanOpd,
};

// ============================================================================
// Indikator shared by program and kegiatan
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndikatorRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub indikator: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub pagu_anggaran: i64,
    #[serde(default)]
    pub target: Vec<TargetRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub satuan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndikatorResponse {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub kode: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub kode_opd: String,
    pub indikator: String,
    pub pagu_anggaran: i64,
    pub tahun: String,
    pub target: Vec<TargetResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetResponse {
    pub id: String,
    pub indikator_id: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tahun: String,
    pub target: String,
    pub satuan: String,
}

impl From<Indikator> for IndikatorResponse {
    fn from(i: Indikator) -> Self {
        IndikatorResponse {
            id: i.id,
            kode: i.kode,
            kode_opd: i.kode_opd,
            indikator: i.indikator,
            pagu_anggaran: i.pagu_anggaran,
            tahun: i.tahun,
            target: i.target.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Target> for TargetResponse {
    fn from(t: Target) -> Self {
        TargetResponse {
            id: t.id,
            indikator_id: t.indikator_id,
            tahun: t.tahun,
            target: t.target,
            satuan: t.satuan,
        }
    }
}

// ============================================================================
// Program
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramRequest {
    #[serde(default)]
    pub kode_program: String,
    #[serde(default)]
    pub nama_program: String,
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub indikator: Vec<IndikatorRequest>,
}

/// Edit one program indikator in place, with a single target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIndikatorRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub kode: String,
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub indikator: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub pagu_anggaran: i64,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub satuan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramResponse {
    pub id: String,
    pub kode_program: String,
    pub nama_program: String,
    pub kode_opd: String,
    pub tahun: String,
    pub is_active: bool,
    pub indikator: Vec<IndikatorResponse>,
}

impl From<Program> for ProgramResponse {
    fn from(p: Program) -> Self {
        ProgramResponse {
            id: p.id,
            kode_program: p.kode_program,
            nama_program: p.nama_program,
            kode_opd: p.kode_opd,
            tahun: p.tahun,
            is_active: p.is_active,
            indikator: p.indikator.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Kegiatan
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KegiatanRequest {
    #[serde(default)]
    pub kode_kegiatan: String,
    #[serde(default)]
    pub nama_kegiatan: String,
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub indikator: Vec<IndikatorRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KegiatanResponse {
    pub id: String,
    pub kode_kegiatan: String,
    pub nama_kegiatan: String,
    pub kode_opd: String,
    pub indikator: Vec<IndikatorResponse>,
}

impl From<Kegiatan> for KegiatanResponse {
    fn from(k: Kegiatan) -> Self {
        KegiatanResponse {
            id: k.id,
            kode_kegiatan: k.kode_kegiatan,
            nama_kegiatan: k.nama_kegiatan,
            kode_opd: k.kode_opd,
            indikator: k.indikator.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Sub kegiatan
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubKegiatanRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub kode_subkegiatan: String,
    #[serde(default)]
    pub nama_subkegiatan: String,
    #[serde(default)]
    pub indikator: Vec<IndikatorSubKegiatanRequest>,
    #[serde(default)]
    pub pagu: Vec<PaguRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndikatorSubKegiatanRequest {
    #[serde(default)]
    pub id_indikator: String,
    #[serde(default, alias = "nama_indikator")]
    pub indikator: String,
    #[serde(default)]
    pub targets: Vec<TargetSubKegiatanRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSubKegiatanRequest {
    #[serde(default)]
    pub id_target: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub satuan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaguRequest {
    #[serde(default)]
    pub jenis_pagu: String,
    #[serde(default)]
    pub pagu_anggaran: i64,
    #[serde(default)]
    pub tahun: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubKegiatanResponse {
    pub id: String,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
    pub status: String,
    pub indikator: Vec<IndikatorSubKegiatanResponse>,
    pub pagu: Vec<PaguResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndikatorSubKegiatanResponse {
    pub id_indikator: String,
    pub nama_indikator: String,
    pub targets: Vec<TargetSubKegiatanResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSubKegiatanResponse {
    pub id_target: String,
    pub indikator_id: String,
    pub target: String,
    pub satuan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaguResponse {
    pub id: String,
    pub jenis_pagu: String,
    pub pagu_anggaran: i64,
    pub tahun: String,
}

impl From<SubKegiatan> for SubKegiatanResponse {
    fn from(s: SubKegiatan) -> Self {
        SubKegiatanResponse {
            id: s.id,
            kode_subkegiatan: s.kode_subkegiatan,
            nama_subkegiatan: s.nama_subkegiatan,
            status: s.status,
            indikator: s
                .indikator
                .into_iter()
                .map(|i| IndikatorSubKegiatanResponse {
                    id_indikator: i.id,
                    nama_indikator: i.indikator,
                    targets: i
                        .target
                        .into_iter()
                        .map(|t| TargetSubKegiatanResponse {
                            id_target: t.id,
                            indikator_id: t.indikator_id,
                            target: t.target,
                            satuan: t.satuan,
                        })
                        .collect(),
                })
                .collect(),
            pagu: s.pagu.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PaguSubKegiatan> for PaguResponse {
    fn from(p: PaguSubKegiatan) -> Self {
        PaguResponse {
            id: p.id,
            jenis_pagu: p.jenis_pagu,
            pagu_anggaran: p.pagu_anggaran,
            tahun: p.tahun,
        }
    }
}

// ============================================================================
// Sub kegiatan links
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubKegiatanRekinRequest {
    #[serde(default)]
    pub kode_subkegiatan: String,
    #[serde(default)]
    pub rekin_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubKegiatanRekinResponse {
    pub id: String,
    pub rekin_id: String,
    pub kode_subkegiatan: String,
}

impl From<RekinSubKegiatan> for SubKegiatanRekinResponse {
    fn from(r: RekinSubKegiatan) -> Self {
        SubKegiatanRekinResponse {
            id: r.id,
            rekin_id: r.rekin_id,
            kode_subkegiatan: r.kode_subkegiatan,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubKegiatanOpdRequest {
    #[serde(default)]
    pub kode_subkegiatan: String,
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub tahun: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubKegiatanOpdResponse {
    pub id: i32,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
    pub kode_opd: String,
    pub nama_opd: String,
    pub tahun: String,
}

impl From<SubKegiatanOpd> for SubKegiatanOpdResponse {
    fn from(s: SubKegiatanOpd) -> Self {
        SubKegiatanOpdResponse {
            id: s.id,
            kode_subkegiatan: s.kode_subkegiatan,
            nama_subkegiatan: s.nama_subkegiatan,
            kode_opd: s.kode_opd,
            nama_opd: s.nama_opd,
            tahun: s.tahun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_kegiatan_indikator_accepts_both_names() {
        let create: IndikatorSubKegiatanRequest =
            serde_json::from_str(r#"{"indikator":"Jumlah sekolah","targets":[]}"#).unwrap();
        let update: IndikatorSubKegiatanRequest =
            serde_json::from_str(r#"{"id_indikator":"IND-SUB-1","nama_indikator":"Jumlah sekolah"}"#)
                .unwrap();
        assert_eq!(create.indikator, update.indikator);
        assert_eq!(update.id_indikator, "IND-SUB-1");
    }

    #[test]
    fn test_program_response_shape() {
        let program = Program {
            id: "PRGM-2025-abcde".to_string(),
            kode_program: "1.01.01".to_string(),
            nama_program: "Program penunjang".to_string(),
            tahun: "2025".to_string(),
            is_active: true,
            indikator: vec![Indikator {
                id: "IND-PRG-1".to_string(),
                indikator: "Persentase".to_string(),
                pagu_anggaran: 1_500_000,
                ..Default::default()
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(ProgramResponse::from(program)).unwrap();
        assert_eq!(value["indikator"][0]["pagu_anggaran"], 1_500_000);
        assert!(value["indikator"][0].get("kode").is_none());
        assert_eq!(value["is_active"], true);
    }
}
