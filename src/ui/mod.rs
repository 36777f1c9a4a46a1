//! UI rendering module for the CNPJ viewer
//!
//! This module contains the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod company_detail;
pub mod help_overlay;

pub use company_detail::render as render_company_detail;
pub use help_overlay::render as render_help_overlay;
