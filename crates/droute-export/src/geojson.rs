//! GeoJSON route export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use droute_models::VideoItem;

use crate::error::{ExportError, ExportResult};
use crate::write::write_atomic;

/// GeoJSON FeatureCollection of extracted routes.
///
/// Field order is fixed by the struct definitions, so output is
/// deterministic for identical input.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<RouteFeature>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: RouteProperties,
    pub geometry: LineStringGeometry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteProperties {
    /// Source file name
    pub name: String,
    /// When the trajectory was extracted (ISO-8601)
    #[serde(rename = "extractionDate")]
    pub extraction_date: DateTime<Utc>,
    /// Total sampled frames
    #[serde(rename = "totalFrames")]
    pub total_frames: usize,
    /// Frames with a valid fix
    #[serde(rename = "validFrames")]
    pub valid_frames: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineStringGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]` pairs, GeoJSON coordinate order
    pub coordinates: Vec<[f64; 2]>,
}

/// Build the FeatureCollection for a batch of videos.
///
/// Videos with zero valid points are omitted entirely; geometry is built
/// only from valid points, in frame order.
pub fn build_feature_collection(items: &[VideoItem]) -> RouteFeatureCollection {
    let features = items
        .iter()
        .filter(|item| item.trajectory.valid_count() > 0)
        .map(|item| {
            let coordinates: Vec<[f64; 2]> = item
                .trajectory
                .iter()
                .filter(|p| p.is_valid())
                .filter_map(|p| p.coordinate)
                .map(|c| [c.lon, c.lat])
                .collect();

            RouteFeature {
                kind: "Feature".to_string(),
                properties: RouteProperties {
                    name: item.name.clone(),
                    extraction_date: item.updated_at,
                    total_frames: item.trajectory.len(),
                    valid_frames: item.trajectory.valid_count(),
                },
                geometry: LineStringGeometry {
                    kind: "LineString".to_string(),
                    coordinates,
                },
            }
        })
        .collect();

    RouteFeatureCollection {
        kind: "FeatureCollection".to_string(),
        features,
    }
}

/// Serialize a batch of videos to a GeoJSON file, atomically.
pub async fn export_geojson(path: impl AsRef<Path>, items: &[VideoItem]) -> ExportResult<()> {
    let path = path.as_ref();
    let collection = build_feature_collection(items);

    let json = serde_json::to_vec_pretty(&collection)
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;

    write_atomic(path, &json).await?;
    info!(
        features = collection.features.len(),
        "Exported GeoJSON to {}",
        path.display()
    );
    Ok(())
}
