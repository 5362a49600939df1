//! Page Patcher - Incremental edits for generated HTML pages
//!
//! This crate applies natural-language change requests to an existing HTML
//! document, regenerating as little of the page as possible and falling back
//! to coarser rewrites when a narrow patch cannot be made safely.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
