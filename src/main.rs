// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BOXMARK - bounding box annotation over a folder of images.
//!
//! A cross-platform desktop application for drawing labeled boxes on every
//! image in a folder and saving one JSON result per image.

mod app;
mod ui;

use anyhow::Result;
use app::BoxmarkApp;
use boxmark::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file (defaults to ./boxmark.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder containing the images to annotate
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Folder receiving one JSON result per image
    #[arg(long)]
    result_dir: Option<PathBuf>,

    /// Label available from the start (repeatable)
    #[arg(long = "label")]
    labels: Vec<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?.with_overrides(
        args.data_dir,
        args.result_dir,
        args.labels,
    );
    log::info!(
        "Annotating {} into {}",
        config.data_dir.display(),
        config.result_dir.display()
    );

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("BOXMARK - Bounding Box Annotation"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "BOXMARK",
        options,
        Box::new(move |_cc| Ok(Box::new(BoxmarkApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
