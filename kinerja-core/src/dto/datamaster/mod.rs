//! Master RB (reformasi birokrasi) DTOs

use serde::{Deserialize, Serialize};

use crate::domain::master_rb::{IndikatorRb, MasterRb, TargetRb};
use crate::dto::quoted;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RbRequest {
    #[serde(default)]
    pub jenis_rb: String,
    #[serde(default)]
    pub kegiatan_utama: String,
    #[serde(default)]
    pub keterangan: String,
    #[serde(default)]
    pub tahun_baseline: i32,
    #[serde(default)]
    pub tahun_next: i32,
    #[serde(default)]
    pub indikator: Vec<IndikatorRbRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndikatorRbRequest {
    #[serde(default)]
    pub indikator: String,
    #[serde(default)]
    pub target: Vec<TargetRbRequest>,
}

/// Every field may be null; missing values become zero on conversion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetRbRequest {
    #[serde(default)]
    pub tahun_baseline: Option<i32>,
    #[serde(default, with = "quoted::option")]
    pub target_baseline: Option<i32>,
    #[serde(default, with = "quoted::option")]
    pub realisasi_baseline: Option<f32>,
    #[serde(default)]
    pub satuan_baseline: Option<String>,
    #[serde(default)]
    pub tahun_next: Option<i32>,
    #[serde(default, with = "quoted::option")]
    pub target_next: Option<i32>,
    #[serde(default)]
    pub satuan_next: Option<String>,
}

/// Build the entity stored for an RB request, stamped with the editing user
pub fn convert_rb_request_to_master(req: RbRequest, user_id: i32) -> MasterRb {
    MasterRb {
        jenis_rb: req.jenis_rb,
        kegiatan_utama: req.kegiatan_utama,
        keterangan: req.keterangan,
        tahun_baseline: req.tahun_baseline,
        tahun_next: req.tahun_next,
        last_updated_by: user_id,
        indikator: req
            .indikator
            .into_iter()
            .map(|ind| IndikatorRb {
                indikator: ind.indikator,
                target_rb: ind.target.into_iter().map(TargetRb::from).collect(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

impl From<TargetRbRequest> for TargetRb {
    fn from(t: TargetRbRequest) -> Self {
        TargetRb {
            tahun_baseline: t.tahun_baseline.unwrap_or_default(),
            target_baseline: t.target_baseline.unwrap_or_default(),
            realisasi_baseline: t.realisasi_baseline.unwrap_or_default(),
            satuan_baseline: t.satuan_baseline.unwrap_or_default(),
            tahun_next: t.tahun_next.unwrap_or_default(),
            target_next: t.target_next.unwrap_or_default(),
            satuan_next: t.satuan_next.unwrap_or_default(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbResponse {
    pub id: i32,
    pub jenis_rb: String,
    pub kegiatan_utama: String,
    pub keterangan: String,
    pub indikator: Vec<IndikatorRbResponse>,
    pub tahun_baseline: i32,
    pub tahun_next: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndikatorRbResponse {
    pub id: String,
    pub id_rb: i32,
    pub indikator: String,
    pub target: Vec<TargetRbResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRbResponse {
    pub id: String,
    pub id_indikator: String,
    pub tahun_baseline: i32,
    #[serde(with = "quoted")]
    pub target_baseline: i32,
    #[serde(with = "quoted")]
    pub realisasi_baseline: f32,
    pub satuan_baseline: String,
    pub tahun_next: i32,
    #[serde(with = "quoted")]
    pub target_next: i32,
    pub satuan_next: String,
}

impl From<MasterRb> for RbResponse {
    fn from(rb: MasterRb) -> Self {
        RbResponse {
            id: rb.id,
            jenis_rb: rb.jenis_rb,
            kegiatan_utama: rb.kegiatan_utama,
            keterangan: rb.keterangan,
            indikator: rb.indikator.into_iter().map(Into::into).collect(),
            tahun_baseline: rb.tahun_baseline,
            tahun_next: rb.tahun_next,
        }
    }
}

impl From<IndikatorRb> for IndikatorRbResponse {
    fn from(ind: IndikatorRb) -> Self {
        IndikatorRbResponse {
            id: ind.id_indikator,
            id_rb: ind.id_rb,
            indikator: ind.indikator,
            target: ind.target_rb.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TargetRb> for TargetRbResponse {
    fn from(t: TargetRb) -> Self {
        TargetRbResponse {
            id: t.id_target,
            id_indikator: t.id_indikator,
            tahun_baseline: t.tahun_baseline,
            target_baseline: t.target_baseline,
            realisasi_baseline: t.realisasi_baseline,
            satuan_baseline: t.satuan_baseline,
            tahun_next: t.tahun_next,
            target_next: t.target_next,
            satuan_next: t.satuan_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> RbRequest {
        RbRequest {
            jenis_rb: "RB General".to_string(),
            kegiatan_utama: "Penguatan akuntabilitas".to_string(),
            keterangan: "ket".to_string(),
            tahun_baseline: 2024,
            tahun_next: 2025,
            indikator: vec![IndikatorRbRequest {
                indikator: "Nilai SAKIP".to_string(),
                target: vec![TargetRbRequest {
                    tahun_baseline: Some(2024),
                    target_baseline: Some(70),
                    realisasi_baseline: Some(68.5),
                    satuan_baseline: Some("nilai".to_string()),
                    tahun_next: Some(2025),
                    target_next: Some(75),
                    satuan_next: Some("nilai".to_string()),
                }],
            }],
        }
    }

    #[test]
    fn test_converter_copies_every_field() {
        let rb = convert_rb_request_to_master(full_request(), 42);

        assert_eq!(rb.jenis_rb, "RB General");
        assert_eq!(rb.kegiatan_utama, "Penguatan akuntabilitas");
        assert_eq!(rb.keterangan, "ket");
        assert_eq!(rb.tahun_baseline, 2024);
        assert_eq!(rb.tahun_next, 2025);
        assert_eq!(rb.last_updated_by, 42);
        assert_eq!(rb.indikator.len(), 1);

        let ind = &rb.indikator[0];
        assert_eq!(ind.indikator, "Nilai SAKIP");
        let t = &ind.target_rb[0];
        assert_eq!(t.tahun_baseline, 2024);
        assert_eq!(t.target_baseline, 70);
        assert_eq!(t.realisasi_baseline, 68.5);
        assert_eq!(t.satuan_baseline, "nilai");
        assert_eq!(t.tahun_next, 2025);
        assert_eq!(t.target_next, 75);
        assert_eq!(t.satuan_next, "nilai");
    }

    #[test]
    fn test_converter_defaults_null_target_fields() {
        let mut req = full_request();
        req.indikator[0].target = vec![TargetRbRequest::default()];

        let rb = convert_rb_request_to_master(req, 1);
        assert_eq!(rb.indikator[0].target_rb[0], TargetRb::default());
    }

    #[test]
    fn test_converter_never_yields_missing_lists() {
        let req = RbRequest {
            jenis_rb: "x".to_string(),
            ..Default::default()
        };
        let rb = convert_rb_request_to_master(req, 1);
        assert!(rb.indikator.is_empty());

        let mut req = full_request();
        req.indikator[0].target.clear();
        let rb = convert_rb_request_to_master(req, 1);
        assert!(rb.indikator[0].target_rb.is_empty());
    }

    #[test]
    fn test_request_accepts_string_numbers() {
        let body = r#"{
            "jenis_rb": "RB Tematik",
            "kegiatan_utama": "Kemiskinan",
            "tahun_baseline": 2024,
            "tahun_next": 2025,
            "indikator": [{
                "indikator": "Persentase penduduk miskin",
                "target": [{
                    "tahun_baseline": 2024,
                    "target_baseline": "10",
                    "realisasi_baseline": "9.5",
                    "satuan_baseline": "%",
                    "tahun_next": null,
                    "target_next": "8"
                }]
            }]
        }"#;
        let req: RbRequest = serde_json::from_str(body).unwrap();
        let t = &req.indikator[0].target[0];
        assert_eq!(t.target_baseline, Some(10));
        assert_eq!(t.realisasi_baseline, Some(9.5));
        assert_eq!(t.tahun_next, None);
        assert_eq!(t.target_next, Some(8));
        assert_eq!(t.satuan_next, None);
    }

    #[test]
    fn test_response_quotes_numeric_targets() {
        let mut rb = convert_rb_request_to_master(full_request(), 1);
        rb.id = 7;
        let value = serde_json::to_value(RbResponse::from(rb)).unwrap();
        let target = &value["indikator"][0]["target"][0];
        assert_eq!(target["target_baseline"], "70");
        assert_eq!(target["realisasi_baseline"], "68.5");
        assert_eq!(target["target_next"], "75");
        assert_eq!(target["tahun_next"], 2025);
        assert_eq!(value["id"], 7);
    }
}
