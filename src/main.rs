#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // Windows release: hide console window
use scan_dash::{Cli, run_app};

#[cfg(not(target_arch = "wasm32"))]
use {
    anyhow::{Context as _, bail},
    clap::Parser,
    eframe::NativeOptions,
    std::panic,
};

#[cfg(target_arch = "wasm32")]
use {
    scan_dash::{PageLocation, ServerOrigin},
    wasm_bindgen::{JsCast, prelude::*},
};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn _keep_alive() {}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
pub fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let _ = fern::Dispatch::new()
        .level(global_level)
        .level_for("scan_dash", my_code_level)
        .chain(fern::Output::call(|record| {
            let msg = record.args().to_string();
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg.into()),
                log::Level::Warn => web_sys::console::warn_1(&msg.into()),
                log::Level::Info => web_sys::console::info_1(&msg.into()),
                log::Level::Debug | log::Level::Trace => web_sys::console::log_1(&msg.into()),
            }
        }))
        .apply();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    init_log();

    let window = web_sys::window().ok_or("no global `window` exists")?;
    let document = window.document().ok_or("should have a document on window")?;
    let canvas = document
        .get_element_by_id("the_canvas_id")
        .ok_or("Failed to find canvas with id 'the_canvas_id'")?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| "the_canvas_id was not a valid HtmlCanvasElement")?;

    // The page location decides where the scan server lives.
    let location = PageLocation::from_window().unwrap_or_else(PageLocation::local);
    let args = Cli {
        server: Some(ServerOrigin::from_location(&location).to_string()),
        coin_list: None,
    };

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(run_app(cc, args)))),
        )
        .await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("scan_dash"), my_code_level)
        .init();

    let args = Cli::parse();
    if let Some(path) = &args.coin_list {
        if !path.is_file() {
            bail!("--coin-list {} is not a readable file", path.display());
        }
    }

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Kripto Tarayıcı")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Kripto Tarayıcı",
        options,
        Box::new(move |cc| Ok(Box::new(run_app(cc, args)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
    .context("GUI event loop failed")
}
