//! Maths Facts · Arithmetic Drill Backend
//!
//! - Procedural question generation across the curriculum's families
//! - Answer checking, streaks, timed drills and speed ratings
//! - Axum HTTP + WebSocket API, static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                   : u16 (default 3000)
//!   CURRICULUM_CONFIG_PATH : path to TOML curriculum config (levels, tiers, multipliers)
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod number_theory;
mod numeric;
mod domain;
mod generator;
mod checker;
mod rating;
mod mastery;
mod store;
mod config;
mod seeds;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::{spawn_session_sweeper, AppState};

const DEFAULT_PORT: u16 = 3000;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared state: validated curriculum config, progress store, sessions.
  let state = Arc::new(AppState::new());

  // Abandoned sessions (closed tabs, dropped clients) are swept in the background.
  let _sweeper = spawn_session_sweeper(state.clone());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  let port = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(DEFAULT_PORT);
  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "mathsfacts", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "mathsfacts", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "mathsfacts", error = %e, "Failed to listen for ctrl-c");
  }
  info!(target: "mathsfacts", "Shutdown signal received");
}
