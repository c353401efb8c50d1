//! Rencana kinerja (performance plan) domain types

use super::indikator::Indikator;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RencanaKinerja {
    pub id: String,
    pub id_pohon: i32,
    pub nama_pohon: String,
    pub level_pohon: i32,
    pub nama_rencana_kinerja: String,
    pub tahun: String,
    pub status_rencana_kinerja: String,
    pub catatan: String,
    pub kode_opd: String,
    pub nama_opd: String,
    /// NIP of the owning employee
    pub pegawai_id: String,
    pub nama_pegawai: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub indikator: Vec<Indikator>,
}
