//! User model with its location history and reward collection.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use super::{Reward, VisitedLocation};

/// A registered user.
///
/// Users are shared as `Arc<User>` between the tracker, the reward engine
/// and API callers, so both collections use interior mutability.
#[derive(Debug)]
pub struct User {
    pub id: Uuid,
    /// Display name, also the registry key
    pub user_name: String,
    pub phone_number: String,
    pub email_address: String,
    /// Chronological location history (append-only)
    visited_locations: RwLock<Vec<VisitedLocation>>,
    /// Rewards keyed by attraction name; at most one per attraction
    rewards: DashMap<String, RewardSlot>,
    /// Insertion counter for reporting rewards in the order they were earned
    next_reward_seq: AtomicU64,
}

#[derive(Debug)]
struct RewardSlot {
    seq: u64,
    reward: Reward,
}

impl User {
    pub fn new(
        id: Uuid,
        user_name: impl Into<String>,
        phone_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            phone_number: phone_number.into(),
            email_address: email_address.into(),
            visited_locations: RwLock::new(Vec::new()),
            rewards: DashMap::new(),
            next_reward_seq: AtomicU64::new(0),
        }
    }

    /// Append a location to the history.
    pub fn add_visited_location(&self, visited: VisitedLocation) {
        self.visited_locations.write().push(visited);
    }

    /// Snapshot of the location history, oldest first.
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().clone()
    }

    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().last().cloned()
    }

    pub fn clear_visited_locations(&self) {
        self.visited_locations.write().clear();
    }

    /// Store a reward unless one already exists for the same attraction name.
    ///
    /// Returns `true` if the reward was stored. The check and the insert
    /// happen under the same shard lock, so concurrent callers racing on one
    /// attraction produce exactly one reward.
    pub fn add_reward_if_absent(&self, reward: Reward) -> bool {
        match self.rewards.entry(reward.attraction.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let seq = self.next_reward_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(RewardSlot { seq, reward });
                true
            }
        }
    }

    pub fn has_reward_for(&self, attraction_name: &str) -> bool {
        self.rewards.contains_key(attraction_name)
    }

    /// Names of all attractions this user has already been rewarded for.
    pub fn rewarded_attraction_names(&self) -> HashSet<String> {
        self.rewards.iter().map(|e| e.key().clone()).collect()
    }

    /// Rewards in the order they were earned.
    pub fn rewards(&self) -> Vec<Reward> {
        let mut slots: Vec<(u64, Reward)> = self
            .rewards
            .iter()
            .map(|e| (e.value().seq, e.value().reward.clone()))
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        slots.into_iter().map(|(_, reward)| reward).collect()
    }

    pub fn reward_count(&self) -> usize {
        self.rewards.len()
    }

    /// Sum of points across all rewards.
    pub fn total_reward_points(&self) -> u64 {
        self.rewards
            .iter()
            .map(|e| u64::from(e.value().reward.reward_points))
            .sum()
    }
}
