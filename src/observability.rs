//! Observability module for centralized metrics and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection and Prometheus exposition
//! - Metric recording helpers called from the recognition and gesture code
//!
//! The library only records through the `metrics` facade; when no recorder
//! is installed the calls are no-ops.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::config::AppConfig;
use crate::price_recognition::PricePattern;
use crate::stepped_gesture::FeedbackIntensity;

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("pocket_tally={}", config.log_level).parse()?);

    // Pretty for development, JSON for everything else
    if config.is_development() || config.log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder and return a handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

/// Record the outcome of one price recognition attempt
pub fn record_price_recognition_metrics(
    pattern: Option<PricePattern>,
    duration: std::time::Duration,
) {
    let label = pattern.map(|p| p.as_str()).unwrap_or("none");
    metrics::counter!("price_recognition_total", "pattern" => label).increment(1);
    metrics::histogram!("price_recognition_duration_seconds").record(duration.as_secs_f64());
}

/// Record a stop point crossing; `None` means the clamp absorbed the delta
pub fn record_gesture_step_metrics(intensity: Option<FeedbackIntensity>) {
    match intensity {
        Some(intensity) => {
            metrics::counter!("gesture_steps_total", "intensity" => intensity.as_str())
                .increment(1);
        }
        None => metrics::counter!("gesture_steps_clamped_total").increment(1),
    }
}

/// Record a shopping list mutation and the resulting list size
pub fn record_shopping_list_metrics(operation: &'static str, item_count: usize) {
    metrics::counter!("shopping_list_operations_total", "operation" => operation).increment(1);
    metrics::gauge!("shopping_list_items_total").set(item_count as f64);
}
