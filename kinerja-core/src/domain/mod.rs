//! Core domain types
//!
//! Planning entities as the service stores and reasons about them. The HTTP
//! layer never exposes these directly; see [`crate::dto`] for the wire shapes.

pub mod indikator;
pub mod master_rb;
pub mod opd;
pub mod pegawai;
pub mod pohon_kinerja;
pub mod program;
pub mod rencana_kinerja;
pub mod tujuan_opd;
