//! CLI control surface: reads a CSV of orders, resolves coordinates,
//! runs `BatchCoordinator::plan`, writes the assembled waypoints and summary
//! CSVs. Argument parsing is hand-rolled `env::args()`, no CLI framework.

use routeplan::config::Config;
use routeplan::directions::client::HttpDirectionsClient;
use routeplan::directions::rate_limit::TokenBucket;
use routeplan::error::PlanError;
use routeplan::io::{read_orders, write_summary, write_waypoints, Geocoder, NoopGeocoder};
use routeplan::logging::TracingSink;
use routeplan::models::priority::Priority;
use routeplan::BatchCoordinator;
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fatal errors (bad input, auth/forbidden) get the generic failure code;
/// non-fatal ones (rate limiting, transient network/provider errors,
/// cancellation) get a distinct code so callers can tell "retry might help"
/// from "fix your input."
fn exit_code_for(err: &PlanError) -> ExitCode {
    if err.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::from(2)
    }
}

struct Args {
    orders_path: String,
    waypoints_out: String,
    summary_out: String,
    priority: Priority,
    batch_id: String,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut priority = Priority::default();
    let mut batch_id = "batch-1".to_string();

    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        if let Some(value) = arg.strip_prefix("--priority=") {
            priority = Priority::from_str(value).map_err(|e| e.to_string())?;
        } else if let Some(value) = arg.strip_prefix("--batch-id=") {
            batch_id = value.to_string();
        } else {
            positional.push(arg);
        }
    }

    if positional.len() != 3 {
        return Err(
            "usage: routeplan <orders.csv> <waypoints_out.csv> <summary_out.csv> [--priority=TIME|DISTANCE|RECOMMEND] [--batch-id=ID]"
                .to_string(),
        );
    }

    Ok(Args {
        orders_path: positional[0].clone(),
        waypoints_out: positional[1].clone(),
        summary_out: positional[2].clone(),
        priority,
        batch_id,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routeplan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("starting routeplan batch {}", args.batch_id);

    let orders = match read_orders(&args.orders_path) {
        Ok(orders) => orders,
        Err(e) => {
            tracing::error!("failed to read orders: {e}");
            return exit_code_for(&e);
        }
    };

    let geocoder = NoopGeocoder::new(config.min_lon, config.max_lon, config.min_lat, config.max_lat);
    let mut points = Vec::with_capacity(orders.len());
    for order in orders {
        match geocoder.resolve(order).await {
            Ok(point) => points.push(point),
            Err(e) => tracing::warn!("dropping order: {e}"),
        }
    }

    if points.is_empty() {
        tracing::error!("no resolvable points after geocoding");
        return ExitCode::FAILURE;
    }

    let sink = Arc::new(TracingSink);
    let bucket = TokenBucket::new(config.max_requests_per_second);
    let client = Arc::new(HttpDirectionsClient::new(
        config.directions_base_url.clone(),
        config.directions_api_key.clone(),
        bucket,
        sink.clone(),
    ));

    let coordinator = BatchCoordinator::new(config, client, sink);

    let result = match coordinator.plan(&args.batch_id, points, args.priority).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("batch planning failed: {e}");
            return exit_code_for(&e);
        }
    };

    if let Err(e) = write_waypoints(&args.waypoints_out, &result.waypoints) {
        tracing::error!("failed to write waypoints: {e}");
        return exit_code_for(&e);
    }
    if let Err(e) = write_summary(&args.summary_out, &result.summary) {
        tracing::error!("failed to write summary: {e}");
        return exit_code_for(&e);
    }

    tracing::info!(
        "batch {} planned: {} waypoints, {:.0}m, {:.0}s",
        args.batch_id,
        result.summary.waypoint_count,
        result.summary.total_distance_m,
        result.summary.total_duration_s
    );

    if result.summary.degraded {
        tracing::warn!("batch {} completed in degraded mode", args.batch_id);
    }
    if result.summary.partial {
        tracing::warn!("batch {} returned a partial result (cancelled mid-sweep)", args.batch_id);
    }

    ExitCode::SUCCESS
}
