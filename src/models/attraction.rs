// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points of interest and the nearby-attraction view.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Coordinate;

/// A named point of interest from the attraction catalog.
///
/// The name is the deduplication key for rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: Uuid,
    /// Attraction name (e.g., "Disneyland")
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub location: Coordinate,
}

impl PointOfInterest {
    /// Build an attraction whose id is derived from its name.
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()),
            name,
            city: String::new(),
            state: String::new(),
            location,
        }
    }
}

/// One entry of the "five nearest attractions" listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyAttraction {
    pub name: String,
    pub attraction_latitude: f64,
    pub attraction_longitude: f64,
    pub user_latitude: f64,
    pub user_longitude: f64,
    /// Distance in statute miles
    pub distance: f64,
    pub reward_points: u32,
}
