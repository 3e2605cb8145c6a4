// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk reward computation across many users.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tourguide::error::AppError;
use tourguide::models::{PointOfInterest, User};

mod common;
use common::{
    harness, harness_with_pools, make_user, north_of, visit, FakeLocations, FakeScores, DISNEYLAND,
};

fn users_at_disneyland(count: usize) -> Vec<Arc<User>> {
    (0..count)
        .map(|i| {
            let user = make_user(&format!("internalUser{}", i));
            visit(&user, DISNEYLAND);
            Arc::new(user)
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bulk_rewards_every_user() {
    let h = harness(
        FakeLocations::with_attractions(vec![PointOfInterest::new("Disneyland", DISNEYLAND)]),
        FakeScores::default(),
    );
    let users = users_at_disneyland(2);

    let report = h
        .rewards
        .calculate_rewards_bulk(users.clone())
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(report.users, 2);
    assert_eq!(report.succeeded, 2);
    assert!(report.is_complete_success());
    for user in &users {
        assert!(user.reward_count() >= 1, "{} has no reward", user.user_name);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_users_do_not_block_others() {
    let scores = FakeScores::default();
    let users = users_at_disneyland(20);
    scores.failing_users.insert(users[3].id);
    scores.panicking_users.insert(users[11].id);
    let h = harness(
        FakeLocations::with_attractions(vec![PointOfInterest::new("Disneyland", DISNEYLAND)]),
        scores,
    );

    let report = h
        .rewards
        .calculate_rewards_bulk(users.clone())
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(report.users, 20);
    assert_eq!(report.succeeded, 18);
    assert_eq!(report.rewards_added, 18);
    assert_eq!(report.failed_user_ids.len(), 2);
    assert!(report.failed_user_ids.contains(&users[3].id));
    assert!(report.failed_user_ids.contains(&users[11].id));

    for (i, user) in users.iter().enumerate() {
        if i == 3 || i == 11 {
            assert_eq!(user.reward_count(), 0);
        } else {
            assert_eq!(user.reward_count(), 1, "user {} missed its reward", i);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reward_counts_never_decrease() {
    let h = harness(
        FakeLocations::with_attractions(vec![PointOfInterest::new("Disneyland", DISNEYLAND)]),
        FakeScores::default(),
    );
    let users = users_at_disneyland(50);
    for user in users.iter().take(25) {
        h.rewards.calculate_rewards(user).unwrap();
    }
    let before: Vec<usize> = users.iter().map(|u| u.reward_count()).collect();

    h.rewards
        .calculate_rewards_bulk(users.clone())
        .unwrap()
        .join()
        .await
        .unwrap();

    for (user, before) in users.iter().zip(before) {
        assert!(user.reward_count() >= before);
        assert_eq!(user.reward_count(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_high_volume_bulk_rewards() {
    let h = harness(
        FakeLocations::with_attractions(vec![PointOfInterest::new("Disneyland", DISNEYLAND)]),
        FakeScores::default(),
    );
    let users = users_at_disneyland(10_000);

    let started = Instant::now();
    let report = h
        .rewards
        .calculate_rewards_bulk(users.clone())
        .unwrap()
        .join()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.succeeded, 10_000);
    assert!(users.iter().all(|u| u.reward_count() > 0));
    assert!(
        elapsed < Duration::from_secs(60),
        "bulk rewards took {:?}",
        elapsed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_score_lookups_scale_with_pool_width() {
    let stops: Vec<_> = (0..4)
        .map(|i| north_of(DISNEYLAND, 100.0 * i as f64))
        .collect();
    let catalog = stops
        .iter()
        .enumerate()
        .map(|(i, stop)| PointOfInterest::new(format!("Stop {}", i), *stop))
        .collect();
    let scores = FakeScores {
        delay: Some(Duration::from_millis(50)),
        ..Default::default()
    };
    let h = harness_with_pools(FakeLocations::with_attractions(catalog), scores, 50, 2);

    let users: Vec<Arc<User>> = (0..50)
        .map(|i| {
            let user = make_user(&format!("internalUser{}", i));
            for stop in &stops {
                visit(&user, *stop);
            }
            Arc::new(user)
        })
        .collect();

    let started = Instant::now();
    let report = h
        .rewards
        .calculate_rewards_bulk(users.clone())
        .unwrap()
        .join()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.rewards_added, 200);
    assert!(users.iter().all(|u| u.reward_count() == 4));
    // 4 lookups per user with 50 users side by side is about 0.2s;
    // running all 200 lookups one after another would take 10s
    assert!(
        elapsed < Duration::from_secs(3),
        "200 lookups on a 50-wide pool took {:?}",
        elapsed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_bulk_resolves() {
    let h = harness(FakeLocations::default(), FakeScores::default());

    let report = h
        .rewards
        .calculate_rewards_bulk(Vec::new())
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(report.users, 0);
    assert!(report.is_complete_success());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bulk_after_shutdown_is_rejected() {
    let h = harness_with_pools(
        FakeLocations::with_attractions(vec![PointOfInterest::new("Disneyland", DISNEYLAND)]),
        FakeScores::default(),
        4,
        2,
    );
    h.rewards.shutdown().await;

    let result = h.rewards.calculate_rewards_bulk(users_at_disneyland(3));
    assert!(matches!(result, Err(AppError::PoolClosed("rewards"))));
}
