//! CNPJ viewer library
//!
//! Looks up one company in the CNPJ registry, caches the record for a day,
//! and exports it as a PDF or a WhatsApp share link.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod export;
pub mod logging;
pub mod presenter;
pub mod ui;
