//! Extraction of guild, base and pal ownership from Palworld world-save
//! exports (the JSON produced by save conversion tools).
//!
//! [`save::SaveDocument`] loads the export, [`core_api::Engine`] joins its
//! collections into a [`core_api::Guild`] tree.

pub mod core_api;
pub mod field;
pub mod gender;
pub mod save;
