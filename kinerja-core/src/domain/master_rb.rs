//! Master RB (reformasi birokrasi) domain types

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterRb {
    pub id: i32,
    pub jenis_rb: String,
    pub kegiatan_utama: String,
    pub keterangan: String,
    pub tahun_baseline: i32,
    pub tahun_next: i32,
    pub last_updated_by: i32,
    pub current_version: i32,
    pub indikator: Vec<IndikatorRb>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndikatorRb {
    pub id_indikator: String,
    pub id_rb: i32,
    pub indikator: String,
    pub target_rb: Vec<TargetRb>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetRb {
    pub id_target: String,
    pub id_indikator: String,
    pub tahun_baseline: i32,
    pub target_baseline: i32,
    pub realisasi_baseline: f32,
    pub satuan_baseline: String,
    pub tahun_next: i32,
    pub target_next: i32,
    pub satuan_next: String,
}
