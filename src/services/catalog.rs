// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attraction catalog loading.

use crate::models::{Coordinate, PointOfInterest};
use geo::Point;
use geojson::GeoJson;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// In-memory list of attractions, in file order.
#[derive(Debug, Default, Clone)]
pub struct AttractionCatalog {
    attractions: Vec<PointOfInterest>,
}

impl AttractionCatalog {
    pub fn new(attractions: Vec<PointOfInterest>) -> Self {
        Self { attractions }
    }

    /// Load attractions from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load attractions from a GeoJSON FeatureCollection of points.
    ///
    /// Features without a name or without point geometry are skipped, and
    /// only the first feature with a given name is kept.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| CatalogError::ParseError(e.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(CatalogError::NotAFeatureCollection);
        };

        let mut attractions = Vec::new();
        let mut seen = HashSet::new();

        for feature in collection.features {
            let Some(name) = feature
                .property("name")
                .and_then(|v| v.as_str())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
            else {
                tracing::debug!("Skipping unnamed feature");
                continue;
            };

            let Some(geom) = feature.geometry.as_ref() else {
                continue;
            };
            let point: Point<f64> = match geom.value.clone().try_into() {
                Ok(point) => point,
                Err(_) => {
                    tracing::warn!(attraction = %name, "Skipping non-point attraction");
                    continue;
                }
            };

            if !seen.insert(name.clone()) {
                tracing::warn!(attraction = %name, "Duplicate attraction name ignored");
                continue;
            }

            let text = |key: &str| {
                feature
                    .property(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string()
            };

            let id = feature.property("id").map(|v| {
                v.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| v.to_string())
            });
            let mut attraction = PointOfInterest::new(name, Coordinate::from(point));
            match id {
                Some(Ok(id)) => attraction.id = id,
                Some(Err(raw)) => {
                    tracing::warn!(
                        attraction = %attraction.name,
                        id = %raw,
                        "Malformed attraction id, deriving one from the name"
                    );
                }
                None => {}
            }
            attraction.city = text("city");
            attraction.state = text("state");
            attractions.push(attraction);
        }

        tracing::info!(count = attractions.len(), "Loaded attractions");
        Ok(Self { attractions })
    }

    pub fn attractions(&self) -> &[PointOfInterest] {
        &self.attractions
    }

    pub fn len(&self) -> usize {
        self.attractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Expected a GeoJSON FeatureCollection")]
    NotAFeatureCollection,
}
