//! Program / Kegiatan / Sub Kegiatan domain types
//!
//! Budget codes nest by prefix. A sub kegiatan code such as
//! `1.01.01.2.01.0001` belongs to kegiatan `1.01.01.2.01`, which belongs to
//! program `1.01.01`.

use super::indikator::Indikator;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub id: String,
    pub kode_program: String,
    pub nama_program: String,
    pub kode_opd: String,
    pub tahun: String,
    pub is_active: bool,
    pub indikator: Vec<Indikator>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kegiatan {
    pub id: String,
    pub kode_kegiatan: String,
    pub nama_kegiatan: String,
    pub kode_opd: String,
    pub indikator: Vec<Indikator>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubKegiatan {
    pub id: String,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
    pub status: String,
    pub indikator: Vec<Indikator>,
    pub pagu: Vec<PaguSubKegiatan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaguSubKegiatan {
    pub id: String,
    pub sub_kegiatan_id: String,
    pub jenis_pagu: String,
    pub pagu_anggaran: i64,
    pub tahun: String,
}

/// Sub kegiatan chosen by an OPD for a year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubKegiatanOpd {
    pub id: i32,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
    pub kode_opd: String,
    pub nama_opd: String,
    pub tahun: String,
}

/// Link between a rencana kinerja and the sub kegiatan that funds it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RekinSubKegiatan {
    pub id: String,
    pub rekin_id: String,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
}

/// Budget a rencana kinerja draws through one linked sub kegiatan, for the
/// plan's year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaguRekin {
    pub rekin_id: String,
    pub kode_subkegiatan: String,
    pub nama_subkegiatan: String,
    pub pagu: i64,
}

/// Program code of a kegiatan or sub kegiatan code
pub fn kode_program_of(kode: &str) -> Option<String> {
    code_prefix(kode, 3)
}

/// Kegiatan code of a sub kegiatan code
pub fn kode_kegiatan_of(kode_subkegiatan: &str) -> Option<String> {
    code_prefix(kode_subkegiatan, 5)
}

fn code_prefix(kode: &str, segments: usize) -> Option<String> {
    let parts: Vec<&str> = kode.split('.').collect();
    if parts.len() < segments || parts[..segments].iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts[..segments].join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefixes() {
        assert_eq!(
            kode_program_of("1.01.01.2.01.0001").as_deref(),
            Some("1.01.01")
        );
        assert_eq!(
            kode_kegiatan_of("1.01.01.2.01.0001").as_deref(),
            Some("1.01.01.2.01")
        );
        assert_eq!(kode_program_of("1.01.01.2.01").as_deref(), Some("1.01.01"));
    }

    #[test]
    fn test_short_codes_have_no_prefix() {
        assert_eq!(kode_kegiatan_of("1.01.01"), None);
        assert_eq!(kode_program_of("1.01"), None);
        assert_eq!(kode_program_of(""), None);
        assert_eq!(kode_program_of("1..01.2"), None);
    }
}
