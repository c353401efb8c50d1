//! Kinerja Core
//!
//! Core types shared by the kinerja performance-planning service.
//!
//! This crate contains:
//! - Domain types: planning entities as stored (pohon kinerja, rencana kinerja, ...)
//! - DTOs: request/response bodies exchanged over the REST API
//! - Id helpers: the custom string identifiers used by most entities

pub mod domain;
pub mod dto;
pub mod id;
