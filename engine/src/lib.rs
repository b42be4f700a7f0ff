//! Shared engine crate for Probelab. Task sequencing, scoring, persistence and
//! export live here; rendering shells consume it.

pub mod core;
pub mod i18n;
pub mod results;
pub mod tasks;
