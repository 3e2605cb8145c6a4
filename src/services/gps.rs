// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process location provider.
//!
//! Serves the attraction catalog and hands out reproducible pseudo-random
//! positions: the n-th fix for a user is always the same point.

use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Coordinate, PointOfInterest, VisitedLocation};
use crate::services::providers::LocationProvider;
use crate::services::AttractionCatalog;

/// Web Mercator latitude limit.
const MAX_LATITUDE: f64 = 85.05112878;

/// Location provider backed by a static catalog.
pub struct SimulatedGps {
    catalog: AttractionCatalog,
    /// Fixes handed out per user
    fixes: DashMap<Uuid, u64>,
}

impl SimulatedGps {
    pub fn new(catalog: AttractionCatalog) -> Self {
        Self {
            catalog,
            fixes: DashMap::new(),
        }
    }

    pub fn catalog(&self) -> &AttractionCatalog {
        &self.catalog
    }
}

impl LocationProvider for SimulatedGps {
    fn user_location(&self, user_id: Uuid) -> Result<VisitedLocation> {
        let fix = {
            let mut counter = self.fixes.entry(user_id).or_insert(0);
            let fix = *counter;
            *counter += 1;
            fix
        };
        Ok(VisitedLocation::new(
            user_id,
            simulated_position(user_id, fix),
            Utc::now(),
        ))
    }

    fn attractions(&self) -> Result<Vec<PointOfInterest>> {
        Ok(self.catalog.attractions().to_vec())
    }
}

/// Derive the `fix`-th position for a user.
fn simulated_position(user_id: Uuid, fix: u64) -> Coordinate {
    let digest = Sha256::new()
        .chain_update(user_id.as_bytes())
        .chain_update(fix.to_le_bytes())
        .finalize();

    let unit = |bytes: &[u8]| {
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        // Top 53 bits give a uniform f64 in [0, 1)
        (u64::from_le_bytes(word) >> 11) as f64 / (1u64 << 53) as f64
    };

    Coordinate::new(
        -MAX_LATITUDE + unit(&digest[0..8]) * 2.0 * MAX_LATITUDE,
        -180.0 + unit(&digest[8..16]) * 360.0,
    )
}
