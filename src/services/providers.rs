// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collaborator interfaces consumed by the reward engine and the tracker.
//!
//! Implementations are blocking and may be slow; callers run them on
//! worker pools rather than on the async executor.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{PointOfInterest, VisitedLocation};

/// Source of user positions and of the attraction catalog.
pub trait LocationProvider: Send + Sync {
    /// Fetch the current position of a user.
    fn user_location(&self, user_id: Uuid) -> Result<VisitedLocation>;

    /// All attractions, in a stable order.
    fn attractions(&self) -> Result<Vec<PointOfInterest>>;
}

/// Source of reward point values.
pub trait ScoreProvider: Send + Sync {
    /// Points awarded to `user_id` for visiting `attraction_id`.
    ///
    /// Expected to be deterministic for a given pair.
    fn attraction_reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<u32>;
}
