//! Sift CLI
//!
//! Replay combobox sessions, try the filter engine on a record file, and
//! inspect detached overlay placement.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sift_cn::components::combobox::filtered;
use sift_cn::ItemAccessor;
use sift_core::{Rect, Size};
use sift_layout::{compute_geometry, PlacementPreference};

mod config;
mod host;
mod session;

use config::{ItemsConfig, SessionConfig};

#[derive(Parser)]
#[command(name = "sift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless combobox toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session file and print a snapshot after every step
    Run {
        /// Session file, or a directory containing sift.toml
        #[arg(default_value = ".")]
        session: String,
    },

    /// Filter a JSON record file the way the combobox does
    Filter {
        /// JSON file holding an array of records
        items: String,

        /// Search query
        query: String,

        /// Field read for the label (repeatable, first present wins)
        #[arg(long = "label-key")]
        label_keys: Vec<String>,

        /// Field read for the value
        #[arg(long, default_value = "id")]
        value_key: String,

        /// Field joined into the search text (repeatable)
        #[arg(long = "search-key")]
        search_keys: Vec<String>,
    },

    /// Compute detached overlay geometry for a trigger rectangle
    Place {
        /// Trigger left edge
        x: f32,
        /// Trigger top edge
        y: f32,
        /// Trigger width
        width: f32,
        /// Trigger height
        height: f32,

        /// Viewport width
        #[arg(long, default_value = "1024")]
        viewport_width: f32,

        /// Viewport height
        #[arg(long, default_value = "768")]
        viewport_height: f32,

        /// Placement (auto, top, bottom)
        #[arg(short, long, default_value = "auto")]
        placement: PlacementPreference,

        /// Backdrop layer; the panel sits one above it
        #[arg(long, default_value = "1000")]
        z_index: i32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { session } => cmd_run(&session),

        Commands::Filter {
            items,
            query,
            label_keys,
            value_key,
            search_keys,
        } => cmd_filter(&items, &query, label_keys, value_key, search_keys),

        Commands::Place {
            x,
            y,
            width,
            height,
            viewport_width,
            viewport_height,
            placement,
            z_index,
        } => cmd_place(
            Rect::new(x, y, width, height),
            Size::new(viewport_width, viewport_height),
            placement,
            z_index,
        ),
    }
}

fn cmd_run(source: &str) -> Result<()> {
    let path = PathBuf::from(source);
    let config = SessionConfig::load(&path)?;
    let items = config.load_items()?;

    info!("Replaying {} ({} records)", path.display(), items.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    session::replay(&config, items, &mut out)?;
    out.flush().context("Failed to write output")?;
    Ok(())
}

fn cmd_filter(
    source: &str,
    query: &str,
    label_keys: Vec<String>,
    value_key: String,
    search_keys: Vec<String>,
) -> Result<()> {
    let items = config::load_items(&PathBuf::from(source))?;
    let accessor = session::accessor(&ItemsConfig {
        path: source.to_string(),
        label_keys: (!label_keys.is_empty()).then_some(label_keys),
        value_key: Some(value_key),
        search_keys,
    });

    let matches = filtered(&items, query, &accessor);
    info!("{} of {} records match {:?}", matches.len(), items.len(), query);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for index in matches {
        let item = &items[index];
        let value = accessor
            .value(item)
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        writeln!(out, "{index}\t{value}\t{}", accessor.label(item))?;
    }
    Ok(())
}

fn cmd_place(anchor: Rect, viewport: Size, placement: PlacementPreference, z: i32) -> Result<()> {
    let (resolved, geometry) = compute_geometry(anchor, viewport, placement, z);

    info!(
        "Space above {} / below {}",
        anchor.top(),
        viewport.height - anchor.bottom()
    );

    println!("placement:  {resolved:?}");
    println!("top:        {}", geometry.top);
    println!("left:       {}", geometry.left);
    println!("width:      {}", geometry.width);
    println!("max_height: {}", geometry.max_height);
    println!("z_index:    {}", geometry.z_index);
    Ok(())
}
