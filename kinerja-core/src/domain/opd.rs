//! OPD (regional government work unit) domain types

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opd {
    pub id: Uuid,
    pub kode_opd: String,
    pub nama_opd: String,
    pub singkatan: String,
    pub alamat: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
