// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod distance;
pub mod gps;
pub mod pool;
pub mod providers;
pub mod rewards;
pub mod scoring;
pub mod tour_guide;
pub mod tracker;

pub use catalog::{AttractionCatalog, CatalogError};
pub use distance::{distance_miles, ProximityConfig, ProximitySettings};
pub use gps::SimulatedGps;
pub use pool::{PoolHandle, WorkerPool};
pub use providers::{LocationProvider, ScoreProvider};
pub use rewards::{BulkRewardsHandle, BulkRewardsReport, RewardsService};
pub use scoring::HashedRewardCentral;
pub use tour_guide::TourGuideService;
pub use tracker::{Tracker, TrackerState};
