//! Data Transfer Objects for the REST API
//!
//! Request and response bodies. Field names follow the JSON contract the
//! front-end already speaks, so several structs rename or skip fields
//! explicitly instead of relying on Rust field names.

pub mod datamaster;
pub mod opd;
pub mod pegawai;
pub mod pohon_kinerja;
pub mod program;
pub mod quoted;
pub mod rencana_kinerja;
pub mod tujuan_opd;
pub mod web;
