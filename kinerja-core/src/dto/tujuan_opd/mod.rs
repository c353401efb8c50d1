//! Tujuan OPD and periode DTOs

use serde::{Deserialize, Serialize};

use crate::domain::indikator::{Indikator, Target};
use crate::domain::tujuan_opd::{Periode, TujuanOpd};

// ============================================================================
// Periode
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodeRequest {
    #[serde(default)]
    pub tahun_awal: String,
    #[serde(default)]
    pub tahun_akhir: String,
    #[serde(default)]
    pub jenis_periode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodeResponse {
    pub id: i32,
    pub tahun_awal: String,
    pub tahun_akhir: String,
    pub jenis_periode: String,
}

impl PeriodeResponse {
    /// True for the zero value, which is never rendered
    pub fn is_empty(&self) -> bool {
        *self == PeriodeResponse::default()
    }
}

impl From<Periode> for PeriodeResponse {
    fn from(p: Periode) -> Self {
        PeriodeResponse {
            id: p.id,
            tahun_awal: p.tahun_awal,
            tahun_akhir: p.tahun_akhir,
            jenis_periode: p.jenis_periode,
        }
    }
}

// ============================================================================
// Tujuan OPD
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TujuanOpdRequest {
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub kode_bidang_urusan: String,
    #[serde(default)]
    pub tujuan: String,
    #[serde(default)]
    pub periode_id: i32,
    #[serde(default)]
    pub indikator: Vec<IndikatorTujuanRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndikatorTujuanRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub indikator: String,
    #[serde(default)]
    pub rumus_perhitungan: String,
    #[serde(default)]
    pub sumber_data: String,
    #[serde(default)]
    pub target: Vec<TargetTujuanRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetTujuanRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tahun: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub satuan: String,
}

/// Optional periode filter on the tujuan OPD listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TujuanOpdFilter {
    pub tahun_awal: Option<String>,
    pub tahun_akhir: Option<String>,
    pub jenis_periode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TujuanOpdResponse {
    pub id_tujuan_opd: i32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub kode_bidang_urusan: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub kode_opd: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub nama_opd: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tujuan: String,
    #[serde(skip_serializing_if = "PeriodeResponse::is_empty", default)]
    pub periode: PeriodeResponse,
    pub indikator: Vec<IndikatorTujuanResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndikatorTujuanResponse {
    pub id: String,
    pub id_tujuan_opd: i32,
    pub indikator: String,
    pub rumus_perhitungan: String,
    pub sumber_data: String,
    pub target: Vec<TargetTujuanResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetTujuanResponse {
    pub id: String,
    pub indikator_id: String,
    pub tahun: String,
    pub target: String,
    pub satuan: String,
}

impl From<TujuanOpd> for TujuanOpdResponse {
    fn from(t: TujuanOpd) -> Self {
        let id = t.id;
        TujuanOpdResponse {
            id_tujuan_opd: t.id,
            kode_bidang_urusan: t.kode_bidang_urusan,
            kode_opd: t.kode_opd,
            nama_opd: t.nama_opd,
            tujuan: t.tujuan,
            periode: t.periode.map(Into::into).unwrap_or_default(),
            indikator: t
                .indikator
                .into_iter()
                .map(|i| IndikatorTujuanResponse::new(id, i))
                .collect(),
        }
    }
}

impl IndikatorTujuanResponse {
    fn new(id_tujuan_opd: i32, i: Indikator) -> Self {
        IndikatorTujuanResponse {
            id: i.id,
            id_tujuan_opd,
            indikator: i.indikator,
            rumus_perhitungan: i.rumus_perhitungan,
            sumber_data: i.sumber_data,
            target: i.target.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Target> for TargetTujuanResponse {
    fn from(t: Target) -> Self {
        TargetTujuanResponse {
            id: t.id,
            indikator_id: t.indikator_id,
            tahun: t.tahun,
            target: t.target,
            satuan: t.satuan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tujuan(periode: Option<Periode>) -> TujuanOpd {
        TujuanOpd {
            id: 3,
            kode_opd: "1.01".to_string(),
            tujuan: "Meningkatkan mutu pendidikan".to_string(),
            periode,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_periode_is_omitted() {
        let value = serde_json::to_value(TujuanOpdResponse::from(tujuan(None))).unwrap();
        assert!(value.get("periode").is_none());

        let value =
            serde_json::to_value(TujuanOpdResponse::from(tujuan(Some(Periode::default())))).unwrap();
        assert!(value.get("periode").is_none());
    }

    #[test]
    fn test_filled_periode_is_rendered() {
        let periode = Periode {
            id: 1,
            tahun_awal: "2025".to_string(),
            tahun_akhir: "2029".to_string(),
            jenis_periode: "RPJMD".to_string(),
        };
        let value = serde_json::to_value(TujuanOpdResponse::from(tujuan(Some(periode)))).unwrap();
        assert_eq!(value["periode"]["tahun_awal"], "2025");
        assert_eq!(value["periode"]["jenis_periode"], "RPJMD");
        assert_eq!(value["id_tujuan_opd"], 3);
    }

    #[test]
    fn test_partially_filled_periode_is_rendered() {
        let periode = Periode {
            tahun_awal: "2025".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(TujuanOpdResponse::from(tujuan(Some(periode)))).unwrap();
        assert_eq!(value["periode"]["id"], 0);
    }
}
