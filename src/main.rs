// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Racer Ready terminal client.
//!
//! Records track visits, race-day conditions, tire maintenance and kart
//! setup snapshots against the owner's Firestore collections.

use racer_ready::{app::App, config::Config, db::FirestoreDb, services::IdentityClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Starting Racer Ready");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize the identity client
    let identity = IdentityClient::new(&config);

    let mut app = App::new(db, identity);
    app.run().await?;
    Ok(())
}

/// Initialize logging to stderr so panel output stays clean on stdout.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("racer_ready=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .with(format)
        .init();
}
