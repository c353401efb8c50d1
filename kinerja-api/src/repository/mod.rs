//! Repository Module
//!
//! Data access layer. Every function takes a `&mut PgConnection`, so the same
//! call works on a pooled connection for reads and inside a transaction for
//! multi-row writes.

pub mod indikator;
pub mod jabatan;
pub mod master_rb;
pub mod opd;
pub mod pegawai;
pub mod pohon_kinerja;
pub mod program;
pub mod rencana_kinerja;
pub mod sub_kegiatan;
pub mod tujuan_opd;

// Re-export for convenience
pub use indikator as indikator_repository;
pub use jabatan as jabatan_repository;
pub use master_rb as master_rb_repository;
pub use opd as opd_repository;
pub use pegawai as pegawai_repository;
pub use pohon_kinerja as pohon_kinerja_repository;
pub use program as program_repository;
pub use rencana_kinerja as rencana_kinerja_repository;
pub use sub_kegiatan as sub_kegiatan_repository;
pub use tujuan_opd as tujuan_opd_repository;
