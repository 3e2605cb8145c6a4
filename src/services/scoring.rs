// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deterministic reward point source.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Result;
use crate::services::providers::ScoreProvider;

const MAX_POINTS: u32 = 1000;

/// Scores an (attraction, user) pair from a hash of both ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashedRewardCentral;

impl ScoreProvider for HashedRewardCentral {
    fn attraction_reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<u32> {
        let digest = Sha256::new()
            .chain_update(attraction_id.as_bytes())
            .chain_update(user_id.as_bytes())
            .finalize();
        let word = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
        Ok(word % MAX_POINTS + 1)
    }
}
