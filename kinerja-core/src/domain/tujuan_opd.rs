//! Tujuan OPD (work unit goal) and planning period domain types

use super::indikator::Indikator;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Periode {
    pub id: i32,
    pub tahun_awal: String,
    pub tahun_akhir: String,
    pub jenis_periode: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TujuanOpd {
    pub id: i32,
    pub kode_opd: String,
    pub nama_opd: String,
    pub kode_bidang_urusan: String,
    pub tujuan: String,
    pub periode: Option<Periode>,
    pub indikator: Vec<Indikator>,
}
