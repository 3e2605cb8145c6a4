// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::Utc;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tourguide::error::{AppError, Result};
use tourguide::models::{Coordinate, PointOfInterest, User, VisitedLocation};
use tourguide::services::{
    LocationProvider, ProximityConfig, RewardsService, ScoreProvider, TourGuideService, WorkerPool,
};
use uuid::Uuid;

#[allow(dead_code)]
pub const DISNEYLAND: Coordinate = Coordinate {
    latitude: 33.817595,
    longitude: -117.922008,
};

/// Location provider with a fixed catalog and scripted user positions.
#[derive(Default)]
pub struct FakeLocations {
    pub attractions: Vec<PointOfInterest>,
    /// Position returned for a user; `DISNEYLAND` if unset
    pub positions: DashMap<Uuid, Coordinate>,
    pub failing_users: DashSet<Uuid>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeLocations {
    pub fn with_attractions(attractions: Vec<PointOfInterest>) -> Self {
        Self {
            attractions,
            ..Default::default()
        }
    }
}

impl LocationProvider for FakeLocations {
    fn user_location(&self, user_id: Uuid) -> Result<VisitedLocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.failing_users.contains(&user_id) {
            return Err(AppError::Location(format!("no fix for {}", user_id)));
        }
        let position = self
            .positions
            .get(&user_id)
            .map(|p| *p)
            .unwrap_or(DISNEYLAND);
        Ok(VisitedLocation::new(user_id, position, Utc::now()))
    }

    fn attractions(&self) -> Result<Vec<PointOfInterest>> {
        Ok(self.attractions.clone())
    }
}

/// Score provider awarding a fixed amount, optionally failing or panicking.
pub struct FakeScores {
    pub points: u32,
    pub failing_users: DashSet<Uuid>,
    pub panicking_users: DashSet<Uuid>,
    /// Latency of every lookup
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl Default for FakeScores {
    fn default() -> Self {
        Self {
            points: 100,
            failing_users: DashSet::new(),
            panicking_users: DashSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ScoreProvider for FakeScores {
    fn attraction_reward_points(&self, _attraction_id: Uuid, user_id: Uuid) -> Result<u32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.panicking_users.contains(&user_id) {
            panic!("score lookup exploded for {}", user_id);
        }
        if self.failing_users.contains(&user_id) {
            return Err(AppError::Score("reward central unavailable".to_string()));
        }
        Ok(self.points)
    }
}

/// Services wired to fakes.
#[allow(dead_code)]
pub struct Harness {
    pub locations: Arc<FakeLocations>,
    pub scores: Arc<FakeScores>,
    pub rewards: Arc<RewardsService>,
    pub tour_guide: Arc<TourGuideService>,
}

#[allow(dead_code)]
pub fn harness(locations: FakeLocations, scores: FakeScores) -> Harness {
    harness_with_pools(locations, scores, 50, 20)
}

#[allow(dead_code)]
pub fn harness_with_pools(
    locations: FakeLocations,
    scores: FakeScores,
    rewards_width: usize,
    tracking_width: usize,
) -> Harness {
    let locations = Arc::new(locations);
    let scores = Arc::new(scores);
    let rewards = Arc::new(RewardsService::new(
        locations.clone(),
        scores.clone(),
        ProximityConfig::default(),
        WorkerPool::new("rewards", rewards_width).expect("rewards pool"),
    ));
    let tour_guide = Arc::new(TourGuideService::new(
        locations.clone(),
        rewards.clone(),
        WorkerPool::new("tracking", tracking_width).expect("tracking pool"),
    ));
    Harness {
        locations,
        scores,
        rewards,
        tour_guide,
    }
}

#[allow(dead_code)]
pub fn make_user(name: &str) -> User {
    User::new(
        Uuid::new_v4(),
        name,
        "000",
        format!("{}@tourGuide.com", name),
    )
}

#[allow(dead_code)]
pub fn visit(user: &User, location: Coordinate) {
    user.add_visited_location(VisitedLocation::new(user.id, location, Utc::now()));
}

/// Coordinate `miles` due north of `origin`.
#[allow(dead_code)]
pub fn north_of(origin: Coordinate, miles: f64) -> Coordinate {
    let degrees = miles / (60.0 * tourguide::services::distance::STATUTE_MILES_PER_NAUTICAL_MILE);
    Coordinate::new(origin.latitude + degrees, origin.longitude)
}
