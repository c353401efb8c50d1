//! OPD DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::opd::Opd;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpdCreateRequest {
    #[serde(default)]
    pub kode_opd: String,
    #[serde(default)]
    pub nama_opd: String,
    #[serde(default)]
    pub singkatan: String,
    #[serde(default)]
    pub alamat: String,
}

/// Same shape as create; `kode_opd` in the path selects the row
pub type OpdUpdateRequest = OpdCreateRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpdResponse {
    pub id: Uuid,
    pub kode_opd: String,
    pub nama_opd: String,
    pub singkatan: String,
    pub alamat: String,
}

impl From<Opd> for OpdResponse {
    fn from(opd: Opd) -> Self {
        OpdResponse {
            id: opd.id,
            kode_opd: opd.kode_opd,
            nama_opd: opd.nama_opd,
            singkatan: opd.singkatan,
            alamat: opd.alamat,
        }
    }
}

/// Compact OPD reference embedded in other responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpdRef {
    pub kode_opd: String,
    pub nama_opd: String,
}

impl OpdRef {
    pub fn new(kode_opd: impl Into<String>, nama_opd: impl Into<String>) -> Self {
        Self {
            kode_opd: kode_opd.into(),
            nama_opd: nama_opd.into(),
        }
    }
}
