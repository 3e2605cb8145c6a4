// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod attraction;
pub mod location;
pub mod reward;
pub mod user;

pub use attraction::{NearbyAttraction, PointOfInterest};
pub use location::{Coordinate, VisitedLocation};
pub use reward::Reward;
pub use user::User;
