// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

use super::{PointOfInterest, VisitedLocation};

/// Points earned by a user for visiting an attraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Visited location that qualified for the reward
    pub visited_location: VisitedLocation,
    pub attraction: PointOfInterest,
    pub reward_points: u32,
}

impl Reward {
    pub fn new(
        visited_location: VisitedLocation,
        attraction: PointOfInterest,
        reward_points: u32,
    ) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }

    pub fn attraction_name(&self) -> &str {
        &self.attraction.name
    }
}
