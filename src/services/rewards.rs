// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward computation.
//!
//! Handles:
//! - Matching a user's visited locations against the attraction catalog
//! - Awarding each attraction at most once per user
//! - Fanning the computation out over many users on a bounded pool

use futures_util::future::join_all;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{PointOfInterest, Reward, User, VisitedLocation};
use crate::services::distance::{distance_miles, ProximityConfig, ProximitySettings};
use crate::services::pool::WorkerPool;
use crate::services::providers::{LocationProvider, ScoreProvider};

/// Computes and records rewards for users.
pub struct RewardsService {
    locations: Arc<dyn LocationProvider>,
    scores: Arc<dyn ScoreProvider>,
    proximity: ProximitySettings,
    pool: WorkerPool,
}

impl RewardsService {
    pub fn new(
        locations: Arc<dyn LocationProvider>,
        scores: Arc<dyn ScoreProvider>,
        proximity: ProximityConfig,
        pool: WorkerPool,
    ) -> Self {
        Self {
            locations,
            scores,
            proximity: ProximitySettings::new(proximity),
            pool,
        }
    }

    /// Process-wide proximity thresholds.
    ///
    /// Changes apply to computations started afterwards.
    pub fn proximity(&self) -> &ProximitySettings {
        &self.proximity
    }

    pub fn set_proximity_buffer(&self, miles: f64) {
        self.proximity.set_reward_buffer(miles);
    }

    pub fn reset_proximity_buffer(&self) {
        self.proximity.reset_reward_buffer();
    }

    /// Whether `attraction` is close enough to `visited` to be listed.
    pub fn is_within_attraction_proximity(
        &self,
        attraction: &PointOfInterest,
        visited: &VisitedLocation,
    ) -> bool {
        self.proximity
            .snapshot()
            .is_within_listing_range(attraction, visited.location)
    }

    /// Whether `visited` earns the reward for `attraction` under current thresholds.
    pub fn near_attraction(&self, visited: &VisitedLocation, attraction: &PointOfInterest) -> bool {
        self.proximity
            .snapshot()
            .is_reward_eligible(visited, attraction)
    }

    pub fn distance(&self, attraction: &PointOfInterest, visited: &VisitedLocation) -> f64 {
        distance_miles(attraction.location, visited.location)
    }

    pub fn reward_points(&self, attraction: &PointOfInterest, user_id: Uuid) -> Result<u32> {
        self.scores.attraction_reward_points(attraction.id, user_id)
    }

    /// Award the user every attraction one of their visited locations qualifies for.
    ///
    /// The distance checks run in parallel; score lookups and inserts run on
    /// the calling thread, earliest location first. Thresholds are read once
    /// at the start. Returns the number of rewards added by this call.
    pub fn calculate_rewards(&self, user: &User) -> Result<usize> {
        let proximity = self.proximity.snapshot();
        let visited = user.visited_locations();
        let already_rewarded: HashSet<String> = user.rewarded_attraction_names();
        let attractions = self.locations.attractions()?;

        // Pure geometry only: score lookups may block and must stay off rayon's pool
        let attractions = &attractions;
        let already_rewarded = &already_rewarded;
        let candidates: Vec<(&VisitedLocation, &PointOfInterest)> = visited
            .par_iter()
            .flat_map_iter(move |location| {
                attractions
                    .iter()
                    .filter(move |a| {
                        !already_rewarded.contains(&a.name)
                            && proximity.is_reward_eligible(location, a)
                    })
                    .map(move |a| (location, a))
            })
            .collect();

        let mut added = 0;
        for (location, attraction) in candidates {
            // Claimed by an earlier location or a concurrent call
            if user.has_reward_for(&attraction.name) {
                continue;
            }
            let points = self.reward_points(attraction, user.id)?;
            let reward = Reward::new(location.clone(), attraction.clone(), points);
            if user.add_reward_if_absent(reward) {
                added += 1;
            }
        }

        if added > 0 {
            tracing::debug!(user_id = %user.id, added, "Rewards added");
        }
        Ok(added)
    }

    /// Compute rewards for every user on the rewards pool.
    ///
    /// The returned handle resolves once every user's task has finished.
    /// A failing user is logged and counted; it does not affect the others.
    /// Fails with [`AppError::PoolClosed`] after shutdown. Must be called
    /// from within a tokio runtime.
    pub fn calculate_rewards_bulk(
        self: &Arc<Self>,
        users: impl IntoIterator<Item = Arc<User>>,
    ) -> Result<BulkRewardsHandle> {
        let started = Instant::now();
        let mut tasks = Vec::new();
        for user in users {
            let service = self.clone();
            let user_id = user.id;
            let handle = match self.pool.spawn(move || service.calculate_rewards(&user)) {
                Ok(handle) => handle,
                Err(e) => {
                    // Already dispatched users still run; their outcome is not reported
                    tracing::warn!(
                        dispatched = tasks.len(),
                        pool = self.pool.name(),
                        error = %e,
                        "Bulk reward computation aborted part way"
                    );
                    return Err(e);
                }
            };
            tasks.push((user_id, handle));
        }

        let users = tasks.len();
        tracing::info!(users, pool = self.pool.name(), "Bulk reward computation dispatched");

        let handle = tokio::spawn(async move {
            let (ids, handles): (Vec<Uuid>, Vec<_>) = tasks.into_iter().unzip();
            let outcomes = join_all(handles).await;

            let mut report = BulkRewardsReport {
                users,
                ..Default::default()
            };
            for (user_id, outcome) in ids.into_iter().zip(outcomes) {
                let result = match outcome {
                    Ok(Ok(computed)) => computed,
                    Ok(Err(e)) => Err(e),
                    Err(e) => Err(AppError::TaskFailed(e.to_string())),
                };
                match result {
                    Ok(added) => {
                        report.succeeded += 1;
                        report.rewards_added += added;
                    }
                    Err(e) => {
                        tracing::warn!(user_id = %user_id, error = %e, "Reward computation failed");
                        report.failed_user_ids.push(user_id);
                    }
                }
            }

            tracing::info!(
                users = report.users,
                failed = report.failed_user_ids.len(),
                rewards_added = report.rewards_added,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Bulk reward computation finished"
            );
            report
        });

        Ok(BulkRewardsHandle { handle })
    }

    /// Stop accepting bulk work and wait for submitted users to finish.
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}

/// Outcome of a bulk reward computation.
#[derive(Debug, Clone, Default)]
pub struct BulkRewardsReport {
    /// Users dispatched
    pub users: usize,
    pub succeeded: usize,
    /// Rewards added across all users
    pub rewards_added: usize,
    /// Users whose computation failed
    pub failed_user_ids: Vec<Uuid>,
}

impl BulkRewardsReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed_user_ids.is_empty()
    }
}

/// Completion handle for [`RewardsService::calculate_rewards_bulk`].
pub struct BulkRewardsHandle {
    handle: JoinHandle<BulkRewardsReport>,
}

impl BulkRewardsHandle {
    /// Wait for every dispatched user to finish.
    pub async fn join(self) -> Result<BulkRewardsReport> {
        self.handle
            .await
            .map_err(|e| AppError::TaskFailed(e.to_string()))
    }
}
