//! Pegawai and jabatan DTOs

use serde::{Deserialize, Serialize};

use crate::domain::pegawai::{Jabatan, JabatanPegawai, Pegawai};

// ============================================================================
// Pegawai
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PegawaiCreateRequest {
    #[serde(default)]
    pub nama_pegawai: String,
    #[serde(default)]
    pub nip: String,
    #[serde(default)]
    pub kode_opd: String,
}

pub type PegawaiUpdateRequest = PegawaiCreateRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TambahJabatanRequest {
    #[serde(default)]
    pub nip: String,
    #[serde(default)]
    pub id_jabatan: String,
    #[serde(default)]
    pub bulan: i32,
    #[serde(default)]
    pub tahun: i32,
    #[serde(default)]
    pub kode_opd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegawaiResponse {
    pub id: String,
    pub nama_pegawai: String,
    pub nip: String,
    pub kode_opd: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub nama_opd: String,
    pub jabatan: Vec<JabatanPegawaiResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JabatanPegawaiResponse {
    pub id_jabatan: String,
    pub nama_jabatan: String,
    pub bulan: i32,
    pub tahun: i32,
    pub kode_opd: String,
}

impl From<Pegawai> for PegawaiResponse {
    fn from(p: Pegawai) -> Self {
        PegawaiResponse {
            id: p.id,
            nama_pegawai: p.nama_pegawai,
            nip: p.nip,
            kode_opd: p.kode_opd,
            nama_opd: p.nama_opd,
            jabatan: p.jabatan.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<JabatanPegawai> for JabatanPegawaiResponse {
    fn from(j: JabatanPegawai) -> Self {
        JabatanPegawaiResponse {
            id_jabatan: j.id_jabatan,
            nama_jabatan: j.nama_jabatan,
            bulan: j.bulan,
            tahun: j.tahun,
            kode_opd: j.kode_opd,
        }
    }
}

// ============================================================================
// Jabatan
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JabatanCreateRequest {
    #[serde(default)]
    pub kode_jabatan: String,
    #[serde(default)]
    pub nama_jabatan: String,
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub kelas_jabatan: String,
    #[serde(default)]
    pub jenis_jabatan: String,
    #[serde(default)]
    pub nilai_jabatan: i32,
}

pub type JabatanUpdateRequest = JabatanCreateRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JabatanResponse {
    pub id: String,
    pub kode_jabatan: String,
    pub nama_jabatan: String,
    pub kode_opd: String,
    pub kelas_jabatan: String,
    pub jenis_jabatan: String,
    pub nilai_jabatan: i32,
}

impl From<Jabatan> for JabatanResponse {
    fn from(j: Jabatan) -> Self {
        JabatanResponse {
            id: j.id,
            kode_jabatan: j.kode_jabatan,
            nama_jabatan: j.nama_jabatan,
            kode_opd: j.kode_opd,
            kelas_jabatan: j.kelas_jabatan,
            jenis_jabatan: j.jenis_jabatan,
            nilai_jabatan: j.nilai_jabatan,
        }
    }
}

/// `?kode_opd=` filter on pegawai and jabatan listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KodeOpdFilter {
    pub kode_opd: Option<String>,
}
