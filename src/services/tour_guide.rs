// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing operations: location tracking, rewards and nearby attractions.

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{NearbyAttraction, PointOfInterest, Reward, User, VisitedLocation};
use crate::services::pool::{PoolHandle, WorkerPool};
use crate::services::providers::LocationProvider;
use crate::services::RewardsService;

/// Number of entries returned by [`TourGuideService::nearest_five`].
const NEAREST_ATTRACTIONS: usize = 5;

/// Tracks users and answers questions about their rewards and surroundings.
pub struct TourGuideService {
    locations: Arc<dyn LocationProvider>,
    rewards: Arc<RewardsService>,
    tracking_pool: WorkerPool,
    /// Registered users keyed by user name
    users: DashMap<String, Arc<User>>,
}

impl TourGuideService {
    pub fn new(
        locations: Arc<dyn LocationProvider>,
        rewards: Arc<RewardsService>,
        tracking_pool: WorkerPool,
    ) -> Self {
        Self {
            locations,
            rewards,
            tracking_pool,
            users: DashMap::new(),
        }
    }

    pub fn rewards_service(&self) -> &Arc<RewardsService> {
        &self.rewards
    }

    /// Register a user. An existing user with the same name is kept.
    pub fn add_user(&self, user: User) -> Arc<User> {
        self.users
            .entry(user.user_name.clone())
            .or_insert_with(|| Arc::new(user))
            .clone()
    }

    pub fn get_user(&self, user_name: &str) -> Option<Arc<User>> {
        self.users.get(user_name).map(|u| u.clone())
    }

    /// Snapshot of all registered users.
    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.users.iter().map(|e| e.value().clone()).collect()
    }

    /// Rewards of a user, in the order they were earned.
    pub fn user_rewards(&self, user: &User) -> Vec<Reward> {
        user.rewards()
    }

    /// Last known location, or a fresh fix if the user has none yet.
    pub fn user_location(&self, user: &User) -> Result<VisitedLocation> {
        match user.last_visited_location() {
            Some(visited) => Ok(visited),
            None => self.track_user_location(user),
        }
    }

    /// Fetch the user's current location, record it and update rewards.
    pub fn track_user_location(&self, user: &User) -> Result<VisitedLocation> {
        let visited = self.locations.user_location(user.id)?;
        user.add_visited_location(visited.clone());
        self.rewards.calculate_rewards(user)?;
        Ok(visited)
    }

    /// Run [`Self::track_user_location`] on the tracking pool.
    pub fn track_user_location_async(
        self: &Arc<Self>,
        user: Arc<User>,
    ) -> Result<PoolHandle<Result<VisitedLocation>>> {
        let service = self.clone();
        self.tracking_pool
            .spawn(move || service.track_user_location(&user))
    }

    /// All attractions within listing range of `visited`.
    pub fn nearby_attractions(&self, visited: &VisitedLocation) -> Result<Vec<PointOfInterest>> {
        let proximity = self.rewards.proximity().snapshot();
        Ok(self
            .locations
            .attractions()?
            .into_iter()
            .filter(|a| proximity.is_within_listing_range(a, visited.location))
            .collect())
    }

    /// The five attractions closest to `visited`, nearest first.
    ///
    /// Equal distances keep catalog order.
    pub fn nearest_five(
        &self,
        visited: &VisitedLocation,
        user: &User,
    ) -> Result<Vec<NearbyAttraction>> {
        let mut ranked: Vec<(f64, PointOfInterest)> = self
            .locations
            .attractions()?
            .into_iter()
            .map(|a| (self.rewards.distance(&a, visited), a))
            .collect();
        // Stable sort
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        ranked
            .into_iter()
            .take(NEAREST_ATTRACTIONS)
            .map(|(distance, attraction)| {
                Ok(NearbyAttraction {
                    reward_points: self.rewards.reward_points(&attraction, user.id)?,
                    attraction_latitude: attraction.location.latitude,
                    attraction_longitude: attraction.location.longitude,
                    user_latitude: visited.location.latitude,
                    user_longitude: visited.location.longitude,
                    distance,
                    name: attraction.name,
                })
            })
            .collect()
    }

    /// Stop accepting asynchronous tracking requests and drain pending ones.
    pub async fn shutdown(&self) {
        self.tracking_pool.shutdown().await;
    }
}
