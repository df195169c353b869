//! Conversion Rate Chart
//!
//! A GUI application for exploring an experiment's conversion rates.
//! Usage: `convchart [DATA_FILE]`

use anyhow::Context;
use eframe::egui;
use log::info;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

use convchart::app::{App, AppWrapper, ChartState};
use convchart::{ChartConfig, ChartData};

fn main() -> anyhow::Result<()> {
    let default_level = if cfg!(feature = "dev") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = ChartConfig::load().context("loading configuration")?;
    let data_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_path.clone());
    let data = ChartData::from_path(&data_path)
        .with_context(|| format!("loading {}", data_path.display()))?;
    info!(
        "loaded {} records for {} variations from {}",
        data.data.len(),
        data.variations.len(),
        data_path.display()
    );
    let chart = ChartState::new(data)?;

    // Initialize the Tokio runtime
    let rt = Runtime::new()?;
    rt.block_on(async {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("Conversion Rate"),
            ..Default::default()
        };

        eframe::run_native(
            "Conversion Rate",
            options,
            Box::new(|cc| {
                let fonts = egui::FontDefinitions::default();
                cc.egui_ctx.set_fonts(fonts);

                let app = Arc::new(Mutex::new(App::new(chart, config)));
                Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)
            }),
        )
        .map_err(|e| anyhow::anyhow!("running application: {}", e))
    })
}
