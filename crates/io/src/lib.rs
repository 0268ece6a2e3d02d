//! `rowfuse-io` — source text acquisition and export of merged records.

pub mod export;
pub mod text;
