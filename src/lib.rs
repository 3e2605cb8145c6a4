// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TourGuide: rewards for visiting attractions
//!
//! This crate matches users' recorded positions against an attraction
//! catalog, awards points once per attraction visited, and keeps every
//! user's position refreshed from a background tracker.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

use config::Config;
use services::{
    LocationProvider, RewardsService, ScoreProvider, TourGuideService, Tracker, WorkerPool,
};
use std::sync::Arc;

/// Shared application state.
///
/// Owns both worker pools and the tracker. They are acquired in
/// [`AppState::start`] and released by [`AppState::shutdown`]; dropping the
/// state without calling `shutdown` still signals the tracker to stop.
pub struct AppState {
    pub config: Config,
    pub tour_guide: Arc<TourGuideService>,
    pub tracker: Tracker,
}

impl AppState {
    /// Build the services and start the tracker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: Config,
        locations: Arc<dyn LocationProvider>,
        scores: Arc<dyn ScoreProvider>,
    ) -> error::Result<Self> {
        let rewards_pool = WorkerPool::new("rewards", config.rewards_pool_size)?;
        let tracking_pool = WorkerPool::new("tracking", config.tracking_pool_size)?;

        let rewards = Arc::new(RewardsService::new(
            locations.clone(),
            scores,
            config.proximity(),
            rewards_pool,
        ));
        let tour_guide = Arc::new(TourGuideService::new(locations, rewards, tracking_pool));
        let tracker = Tracker::start(tour_guide.clone(), config.tracking_poll_interval);

        Ok(Self {
            config,
            tour_guide,
            tracker,
        })
    }

    /// Stop the tracker, then drain both pools.
    pub async fn shutdown(self) {
        self.tracker.shutdown().await;
        self.tour_guide.shutdown().await;
        self.tour_guide.rewards_service().shutdown().await;
        tracing::info!("Shutdown complete");
    }
}
