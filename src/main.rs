// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TourGuide rewards service
//!
//! Loads the attraction catalog, starts the background tracker and runs
//! until interrupted.

use std::sync::Arc;
use tourguide::{
    config::Config,
    models::User,
    services::{AttractionCatalog, HashedRewardCentral, SimulatedGps},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        catalog = %config.catalog_path,
        poll_interval_secs = config.tracking_poll_interval.as_secs(),
        rewards_pool = config.rewards_pool_size,
        tracking_pool = config.tracking_pool_size,
        "Starting TourGuide"
    );

    let catalog = AttractionCatalog::load_from_file(&config.catalog_path)?;
    tracing::info!(count = catalog.len(), "Attraction catalog loaded");

    let gps = Arc::new(SimulatedGps::new(catalog));
    let user_count = config.internal_user_count;
    let state = AppState::start(config, gps, Arc::new(HashedRewardCentral))?;

    for i in 0..user_count {
        let user_name = format!("internalUser{}", i);
        let email = format!("{}@tourGuide.com", user_name);
        state
            .tour_guide
            .add_user(User::new(Uuid::new_v4(), user_name, "000", email));
    }
    tracing::info!(users = user_count, "Internal users registered");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");
    state.shutdown().await;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("tourguide=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
