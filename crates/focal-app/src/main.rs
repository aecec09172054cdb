use std::time::Duration;

use clap::Parser;
use focal_app::fixture::load_calendars;
use focal_app::render::render_week;
use focal_app::zone::resolve_display_zone;
use focal_core::config::load_config;
use focal_view::state::{ViewConfig, WeekView};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Print a calendar week as a text agenda.
#[derive(Debug, Parser)]
#[command(name = "focal-week", version)]
struct Args {
    /// Settings file, instead of `focal.toml` in the working directory
    #[arg(long)]
    config: Option<String>,

    /// Calendar file (TOML); may be repeated
    #[arg(long = "calendar", value_name = "FILE")]
    calendars: Vec<String>,

    /// Year of the week to show; defaults to the current one
    #[arg(long)]
    year: Option<i32>,

    /// Week number to show; defaults to the current week
    #[arg(long)]
    week: Option<u32>,

    /// Keep running and redraw when the current-time marker moves
    #[arg(long)]
    watch: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let timezone = resolve_display_zone(&config)?;
    let mut view = WeekView::new(ViewConfig::from_settings(&config, timezone))?;

    for calendar in load_calendars(&args.calendars)? {
        view.add_calendar(calendar);
    }

    if args.year.is_some() || args.week.is_some() {
        let year = args.year.unwrap_or(view.current_year());
        let week = args.week.unwrap_or(view.current_week_number());
        view.goto_week(year, week)?;
    }

    println!("{}", render_week(&view));

    if !args.watch {
        return Ok(());
    }

    tracing::info!(
        interval_secs = config.refresh.interval_secs,
        "Watching, press Ctrl-C to stop"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh.interval_secs));
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let before = *view.now();
                let after = *view.refresh_now();
                if before != after {
                    println!("\n{}", render_week(&view));
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Stopping");
                return Ok(());
            }
        }
    }
}
