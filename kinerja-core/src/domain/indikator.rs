//! Indicator and target domain types
//!
//! An indikator always belongs to exactly one owner (a pohon kinerja node, a
//! rencana kinerja, a program, a sub kegiatan or a tujuan OPD) and owns its
//! targets exclusively.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indikator {
    pub id: String,
    pub indikator: String,
    pub tahun: String,
    pub kode: String,
    pub kode_opd: String,
    pub rumus_perhitungan: String,
    pub sumber_data: String,
    pub pagu_anggaran: i64,
    pub target: Vec<Target>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    pub id: String,
    pub indikator_id: String,
    pub target: String,
    pub satuan: String,
    pub tahun: String,
}
