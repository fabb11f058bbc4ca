use anyhow::{Context, Result};
use pocket_tally::config::AppConfig;
use pocket_tally::number_slider::{GestureEvent, NumberSlider};
use pocket_tally::observability;
use pocket_tally::price_recognition::PriceExtractor;
use pocket_tally::shopping_list::ShoppingList;
use std::env;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

const USAGE: &str = "usage: pocket-tally <prices|slide>\n\
    \n  prices   read shopping list lines from stdin and total their prices\
    \n  slide    read drag offsets from stdin (one per line, 'end' or 'cancel' to lift)";

/// Load and validate configuration at startup
fn load_configuration() -> Result<AppConfig> {
    let config = AppConfig::from_env().map_err(|e| {
        pocket_tally::errors::error_logging::log_config_error(&e, "environment", "load");
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    config.validate().map_err(|e| {
        anyhow::anyhow!(
            "Configuration validation failed: {}. Please check your environment.",
            e
        )
    })?;

    Ok(config)
}

fn run_prices(config: &AppConfig, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let vocabulary = config
        .price_vocabulary()
        .context("Failed to load price vocabulary")?;
    let extractor = PriceExtractor::with_vocabulary(vocabulary)?;
    let mut list = ShoppingList::with_extractor(extractor);

    for line in input.lines() {
        let line = line.context("Failed to read stdin")?;
        list.add_item(&line);
    }

    for item in list.items() {
        writeln!(out, "{:<40} {:>10}", item.text, item.display_price())?;
    }
    writeln!(out, "{} items, total {}", list.total_items(), list.formatted_total_price())?;

    info!(
        items = list.total_items(),
        total = %list.formatted_total_price(),
        "Shopping list processed"
    );
    Ok(())
}

fn parse_gesture_event(line: &str) -> Option<GestureEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "begin" => Some(GestureEvent::Began),
        "end" => Some(GestureEvent::Ended),
        "cancel" => Some(GestureEvent::Cancelled),
        other => other.parse::<f64>().ok().map(GestureEvent::Moved),
    }
}

fn run_slide(config: &AppConfig, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut slider = NumberSlider::new(config.slider.clone(), 0)?;

    for (line_number, line) in input.lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(event) = parse_gesture_event(&line) else {
            warn!(line_number, input = %line, "Skipping unrecognized gesture sample");
            continue;
        };
        if let Some(step) = slider.handle(event) {
            writeln!(
                out,
                "value={} delta={:+} intensity={}",
                step.new_value,
                step.applied_delta,
                step.intensity()
            )?;
        }
    }

    // Treat end of input as the finger lifting
    slider.handle(GestureEvent::Ended);
    writeln!(out, "final value={}", slider.value())?;
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = load_configuration()?;
    observability::init_tracing_with_config(&config)?;
    let metrics_handle = observability::init_metrics()?;

    let command = env::args().nth(1).unwrap_or_default();
    let stdin = io::stdin();
    let stdout = io::stdout();

    match command.as_str() {
        "prices" => run_prices(&config, stdin.lock(), stdout.lock())?,
        "slide" => run_slide(&config, stdin.lock(), stdout.lock())?,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    if config.print_metrics {
        print!("{}", metrics_handle.render());
    }

    Ok(())
}
