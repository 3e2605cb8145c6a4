// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance and proximity thresholds.
//!
//! Distances are in statute miles. The central angle comes from the
//! spherical law of cosines and is converted through nautical miles
//! (one nautical mile per arc minute).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Coordinate, PointOfInterest, VisitedLocation};

pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.15077945;

/// Default reward buffer in miles.
pub const DEFAULT_REWARD_PROXIMITY_MILES: f64 = 10.0;
/// Default listing range in miles.
pub const DEFAULT_ATTRACTION_PROXIMITY_MILES: f64 = 200.0;

/// Distance between two coordinates in statute miles.
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());

    // Rounding can push the cosine just outside [-1, 1] for near-identical
    // or antipodal points, where acos would return NaN.
    let cos_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    let nautical_miles = 60.0 * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

/// Proximity thresholds in effect for one computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Max distance between a visit and an attraction to earn a reward
    pub reward_buffer_miles: f64,
    /// Max distance for an attraction to be listed as nearby
    pub listing_range_miles: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            reward_buffer_miles: DEFAULT_REWARD_PROXIMITY_MILES,
            listing_range_miles: DEFAULT_ATTRACTION_PROXIMITY_MILES,
        }
    }
}

impl ProximityConfig {
    /// Whether `attraction` is close enough to `location` to be listed.
    pub fn is_within_listing_range(
        &self,
        attraction: &PointOfInterest,
        location: Coordinate,
    ) -> bool {
        distance_miles(attraction.location, location) <= self.listing_range_miles
    }

    /// Whether a visit is close enough to `attraction` to earn its reward.
    pub fn is_reward_eligible(
        &self,
        visited: &VisitedLocation,
        attraction: &PointOfInterest,
    ) -> bool {
        distance_miles(attraction.location, visited.location) <= self.reward_buffer_miles
    }
}

/// Process-wide proximity switch.
///
/// Setters take effect for computations that take their snapshot afterwards;
/// work already in flight keeps the thresholds it started with. There is no
/// ordering between a setter and concurrent snapshots beyond that.
#[derive(Debug)]
pub struct ProximitySettings {
    default_reward_buffer: f64,
    reward_buffer_bits: AtomicU64,
    listing_range_bits: AtomicU64,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}

impl ProximitySettings {
    pub fn new(initial: ProximityConfig) -> Self {
        Self {
            default_reward_buffer: initial.reward_buffer_miles,
            reward_buffer_bits: AtomicU64::new(initial.reward_buffer_miles.to_bits()),
            listing_range_bits: AtomicU64::new(initial.listing_range_miles.to_bits()),
        }
    }

    pub fn set_reward_buffer(&self, miles: f64) {
        self.reward_buffer_bits
            .store(miles.to_bits(), Ordering::Relaxed);
    }

    /// Restore the reward buffer this instance was created with.
    pub fn reset_reward_buffer(&self) {
        self.set_reward_buffer(self.default_reward_buffer);
    }

    pub fn set_listing_range(&self, miles: f64) {
        self.listing_range_bits
            .store(miles.to_bits(), Ordering::Relaxed);
    }

    /// Current thresholds as an immutable value.
    pub fn snapshot(&self) -> ProximityConfig {
        ProximityConfig {
            reward_buffer_miles: f64::from_bits(self.reward_buffer_bits.load(Ordering::Relaxed)),
            listing_range_miles: f64::from_bits(self.listing_range_bits.load(Ordering::Relaxed)),
        }
    }
}
