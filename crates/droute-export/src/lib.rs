//! GeoJSON and CSV route export.
//!
//! Serialization is a thin contract: deterministic output for identical
//! input, and atomic writes so a partially written file is never visible
//! at the destination path.

pub mod csv;
pub mod error;
pub mod geojson;
mod write;

pub use csv::export_csv;
pub use error::{ExportError, ExportResult};
pub use geojson::export_geojson;
