//! Pohon kinerja (performance tree) domain types
//!
//! Nodes form a single-parent tree. Pemda (regional government) levels sit at
//! the top (tematik and its sub levels), OPD levels below them:
//!
//! ```text
//! 0 Tematik ─ 1 Sub Tematik ─ 2 Sub Sub Tematik ─ 3 Super Sub Tematik
//!   └─ 4 Strategic ─ 5 Tactical ─ 6 Operational ─ 7.. Operational N
//! ```
//!
//! `level_pohon` strictly increases from a parent to each of its children.

use super::indikator::Indikator;

pub const LEVEL_TEMATIK: i32 = 0;
pub const LEVEL_SUPER_SUB_TEMATIK: i32 = 3;
pub const LEVEL_STRATEGIC: i32 = 4;
pub const LEVEL_TACTICAL: i32 = 5;
pub const LEVEL_OPERATIONAL: i32 = 6;

/// Parent id stored for root nodes
pub const ROOT_PARENT: i32 = 0;

/// Status of nodes that were handed down from the pemda tree
pub const STATUS_POKIN_PEMDA: &str = "pokin dari pemda";
/// Pemda proposal waiting for its OPD; also the status a proposal falls back
/// to when its OPD copy is deleted
pub const STATUS_MENUNGGU_DISETUJUI: &str = "menunggu_disetujui";
/// Pemda proposal taken over by its OPD
pub const STATUS_DISETUJUI: &str = "disetujui";
/// Pemda proposal turned down by its OPD
pub const STATUS_DITOLAK: &str = "ditolak";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PohonKinerja {
    pub id: i32,
    pub parent: i32,
    pub nama_pohon: String,
    pub kode_opd: String,
    pub nama_opd: String,
    pub keterangan: String,
    pub tahun: String,
    pub jenis_pohon: String,
    pub level_pohon: i32,
    pub status: String,
    pub is_active: bool,
    pub clone_from: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub indikator: Vec<Indikator>,
    pub pelaksana: Vec<PelaksanaPokin>,
}

impl PohonKinerja {
    pub fn is_root(&self) -> bool {
        self.parent == ROOT_PARENT
    }

    /// Pemda-side nodes are not bound to an OPD
    pub fn is_pemda_level(&self) -> bool {
        is_pemda_level(self.level_pohon)
    }
}

/// Employee assigned to execute a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PelaksanaPokin {
    pub id: String,
    pub pohon_kinerja_id: i32,
    pub pegawai_id: String,
    pub nip: String,
    pub nama_pegawai: String,
}

/// Proposals an OPD may still take over
pub fn can_hand_off(status: &str) -> bool {
    status == STATUS_MENUNGGU_DISETUJUI || status == STATUS_DITOLAK
}

/// Only proposals still waiting can be turned down
pub fn can_reject(status: &str) -> bool {
    status == STATUS_MENUNGGU_DISETUJUI
}

/// Pemda proposals live in the pemda tree and never show in an OPD tree
pub fn is_pemda_proposal(status: &str) -> bool {
    can_hand_off(status) || status == STATUS_DISETUJUI
}

pub fn is_pemda_level(level: i32) -> bool {
    (LEVEL_TEMATIK..=LEVEL_SUPER_SUB_TEMATIK).contains(&level)
}

/// A child must sit strictly below its parent
pub fn is_valid_child_level(parent_level: i32, child_level: i32) -> bool {
    child_level > parent_level
}

/// Default `jenis_pohon` label for a level
pub fn jenis_pohon_for_level(level: i32) -> String {
    match level {
        0 => "Tematik".to_string(),
        1 => "Sub Tematik".to_string(),
        2 => "Sub Sub Tematik".to_string(),
        3 => "Super Sub Tematik".to_string(),
        LEVEL_STRATEGIC => "Strategic".to_string(),
        LEVEL_TACTICAL => "Tactical".to_string(),
        LEVEL_OPERATIONAL => "Operational".to_string(),
        n if n > LEVEL_OPERATIONAL => format!("Operational-{}", n - LEVEL_OPERATIONAL),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_statuses() {
        assert!(can_hand_off(STATUS_MENUNGGU_DISETUJUI));
        assert!(can_hand_off(STATUS_DITOLAK));
        assert!(!can_hand_off(STATUS_DISETUJUI));
        assert!(!can_hand_off(STATUS_POKIN_PEMDA));

        assert!(can_reject(STATUS_MENUNGGU_DISETUJUI));
        assert!(!can_reject(STATUS_DITOLAK));

        assert!(is_pemda_proposal(STATUS_DISETUJUI));
        assert!(!is_pemda_proposal(STATUS_POKIN_PEMDA));
        assert!(!is_pemda_proposal(""));
    }

    #[test]
    fn test_child_level_must_increase() {
        assert!(is_valid_child_level(4, 5));
        assert!(is_valid_child_level(0, 4));
        assert!(!is_valid_child_level(5, 5));
        assert!(!is_valid_child_level(6, 4));
    }

    #[test]
    fn test_jenis_pohon_labels() {
        assert_eq!(jenis_pohon_for_level(0), "Tematik");
        assert_eq!(jenis_pohon_for_level(4), "Strategic");
        assert_eq!(jenis_pohon_for_level(6), "Operational");
        assert_eq!(jenis_pohon_for_level(7), "Operational-1");
        assert_eq!(jenis_pohon_for_level(9), "Operational-3");
        assert_eq!(jenis_pohon_for_level(-1), "");
    }

    #[test]
    fn test_pemda_levels() {
        assert!(is_pemda_level(0));
        assert!(is_pemda_level(3));
        assert!(!is_pemda_level(4));
    }
}
