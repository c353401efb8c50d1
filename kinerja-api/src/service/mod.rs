//! Service Module
//!
//! Business logic layer of the kinerja service.
//! Services validate requests, orchestrate repositories inside a connection
//! or transaction, and hand back response DTOs.

pub mod datamaster;
pub mod error;
pub mod jabatan;
pub mod opd;
pub mod pegawai;
pub mod pohon_kinerja;
pub mod program;
pub mod rencana_kinerja;
pub mod sub_kegiatan;
pub mod tujuan_opd;
pub mod validation;

// Re-export for convenience
pub use datamaster as datamaster_service;
pub use jabatan as jabatan_service;
pub use opd as opd_service;
pub use pegawai as pegawai_service;
pub use pohon_kinerja as pohon_kinerja_service;
pub use program as program_service;
pub use rencana_kinerja as rencana_kinerja_service;
pub use sub_kegiatan as sub_kegiatan_service;
pub use tujuan_opd as tujuan_opd_service;
