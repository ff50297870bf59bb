use {
    eframe::{
        Frame,
        egui::{Context, DroppedFile, ViewportCommand, Visuals},
    },
    std::sync::mpsc::{self, Receiver, Sender},
};

use crate::{
    Cli,
    app::Dashboard,
    config::DF,
    data::{
        EventSink, FilterPayload, PageLocation, ServerOrigin, TransportEvent, default_transport,
        protocol::FilterResponse, submit_filter,
    },
    error::{ImportError, ScanError},
    ui::UI_CONFIG,
    utils::AppInstant,
};

#[cfg(not(target_arch = "wasm32"))]
use {std::thread, tokio::runtime::Runtime};

#[cfg(target_arch = "wasm32")]
use {
    std::{cell::Cell, rc::Rc},
    wasm_bindgen::{JsCast, closure::Closure},
};

type ScanOutcome = Result<FilterResponse, ScanError>;

pub struct App {
    pub(crate) dashboard: Dashboard,
    transport_rx: Receiver<TransportEvent>,
    scan_tx: Sender<ScanOutcome>,
    scan_rx: Receiver<ScanOutcome>,
    http: reqwest::Client,
    /// Native close was intercepted; the confirmation dialog is up.
    pub(crate) confirm_close: bool,
    allow_close: bool,
    #[cfg(target_arch = "wasm32")]
    unload_guard: Rc<Cell<bool>>,
    #[cfg(target_arch = "wasm32")]
    _unload_listener: Option<Closure<dyn FnMut(web_sys::BeforeUnloadEvent)>>,
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let origin = args
            .server
            .as_deref()
            .map(ServerOrigin::from_url)
            .unwrap_or_else(|| ServerOrigin::from_location(&PageLocation::local()));

        let (transport_tx, transport_rx) = mpsc::channel();
        let (scan_tx, scan_rx) = mpsc::channel();
        let sink = EventSink::new(transport_tx, Some(cc.egui_ctx.clone()));

        let now = AppInstant::now();
        let mut dashboard = Dashboard::new(origin, default_transport(), sink);
        dashboard.start(now);

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &args.coin_list {
            let name = file_name_of(path);
            dashboard.load_coin_list(&name, read_text_file(path, &name), now);
        }

        #[cfg(target_arch = "wasm32")]
        let unload_guard = Rc::new(Cell::new(false));
        #[cfg(target_arch = "wasm32")]
        let _unload_listener = install_unload_guard(unload_guard.clone());

        Self {
            dashboard,
            transport_rx,
            scan_tx,
            scan_rx,
            http: reqwest::Client::new(),
            confirm_close: false,
            allow_close: false,
            #[cfg(target_arch = "wasm32")]
            unload_guard,
            #[cfg(target_arch = "wasm32")]
            _unload_listener,
        }
    }

    /// Validates the form and fires `POST /filter` in the background.
    pub(crate) fn start_scan(&mut self, ctx: &Context) {
        let Some(payload) = self.dashboard.submit_scan(AppInstant::now()) else {
            return;
        };
        self.spawn_filter_request(ctx, payload);
    }

    fn spawn_filter_request(&self, ctx: &Context, payload: FilterPayload) {
        let client = self.http.clone();
        let origin = self.dashboard.origin().clone();
        let tx = self.scan_tx.clone();
        let ctx = ctx.clone();

        #[cfg(not(target_arch = "wasm32"))]
        thread::spawn(move || {
            let outcome = match Runtime::new() {
                Ok(rt) => rt.block_on(submit_filter(&client, &origin, &payload)),
                Err(e) => Err(ScanError::Request(e.to_string())),
            };
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = submit_filter(&client, &origin, &payload).await;
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    fn pump_events(&mut self, now: AppInstant) {
        while let Ok(event) = self.transport_rx.try_recv() {
            self.dashboard.handle_transport_event(event, now);
        }
        while let Ok(outcome) = self.scan_rx.try_recv() {
            self.dashboard.on_scan_response(outcome, now);
        }
        self.dashboard.tick(now);
    }

    fn handle_dropped_files(&mut self, ctx: &Context, now: AppInstant) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only one list is active at a time; the last file wins.
        if let Some(file) = dropped.last() {
            let (name, content) = read_dropped(file);
            self.dashboard.load_coin_list(&name, content, now);
        }
    }

    /// Holds the window open while an auto-scan runs, until the user confirms.
    fn guard_close(&mut self, ctx: &Context) {
        #[cfg(target_arch = "wasm32")]
        self.unload_guard.set(self.dashboard.should_block_close());

        let close_requested = ctx.input(|i| i.viewport().close_requested());
        if close_requested && !self.allow_close && self.dashboard.should_block_close() {
            if DF.log_auto_scan {
                log::info!("Close blocked: auto-scan running");
            }
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
            self.confirm_close = true;
        }
    }

    pub(crate) fn confirm_exit(&mut self, ctx: &Context) {
        self.confirm_close = false;
        self.allow_close = true;
        self.dashboard.shutdown();
        ctx.send_viewport_cmd(ViewportCommand::Close);
    }

    fn schedule_repaint(&self, ctx: &Context, now: AppInstant) {
        if let Some(deadline) = self.dashboard.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);
        let now = AppInstant::now();

        self.pump_events(now);
        self.handle_dropped_files(ctx, now);
        self.guard_close(ctx);

        self.render_top_panel(ctx);
        self.render_status_panel(ctx);
        self.render_left_panel(ctx);
        self.render_central_panel(ctx);
        self.render_close_dialog(ctx);

        self.schedule_repaint(ctx, now);
    }
}

fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    ctx.set_visuals(visuals);
    ctx.style_mut(|s| s.interaction.selectable_labels = false);
}

fn read_dropped(file: &DroppedFile) -> (String, Result<String, ImportError>) {
    let name = if file.name.is_empty() {
        file.path
            .as_deref()
            .map(file_name_of)
            .unwrap_or_default()
    } else {
        file.name.clone()
    };

    if let Some(bytes) = &file.bytes {
        let content = decode_text(bytes.to_vec(), &name);
        return (name, content);
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        let content = read_text_file(path, &name);
        return (name, content);
    }

    let content = Err(ImportError::Unreadable {
        name: name.clone(),
        reason: "no file contents".to_string(),
    });
    (name, content)
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn read_text_file(path: &std::path::Path, name: &str) -> Result<String, ImportError> {
    let bytes = std::fs::read(path).map_err(|e| ImportError::Unreadable {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    decode_text(bytes, name)
}

fn decode_text(bytes: Vec<u8>, name: &str) -> Result<String, ImportError> {
    String::from_utf8(bytes).map_err(|_| ImportError::NotText(name.to_string()))
}

/// Browser-side close guard: `beforeunload` prompts while the flag is set.
#[cfg(target_arch = "wasm32")]
fn install_unload_guard(
    active: Rc<Cell<bool>>,
) -> Option<Closure<dyn FnMut(web_sys::BeforeUnloadEvent)>> {
    let window = web_sys::window()?;
    let listener = Closure::<dyn FnMut(web_sys::BeforeUnloadEvent)>::new(
        move |event: web_sys::BeforeUnloadEvent| {
            if active.get() {
                event.prevent_default();
                event.set_return_value("auto-scan running");
            }
        },
    );
    if let Err(err) = window
        .add_event_listener_with_callback("beforeunload", listener.as_ref().unchecked_ref())
    {
        log::warn!("Could not install beforeunload guard: {:?}", err);
        return None;
    }
    Some(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_utf8_upload_is_rejected() {
        let err = decode_text(vec![0xff, 0xfe, 0x00], "list.txt").unwrap_err();
        assert!(matches!(err, ImportError::NotText(ref n) if n == "list.txt"));
        assert_eq!(decode_text(b"BTCUSDT".to_vec(), "a").unwrap(), "BTCUSDT");
    }

    #[test]
    fn dropped_bytes_are_decoded_with_their_name() {
        let file = DroppedFile {
            name: "watch.txt".to_string(),
            bytes: Some(std::sync::Arc::from(&b"ETHUSDT,SOLUSDT"[..])),
            ..Default::default()
        };
        let (name, content) = read_dropped(&file);
        assert_eq!(name, "watch.txt");
        assert_eq!(content.unwrap(), "ETHUSDT,SOLUSDT");
    }

    #[test]
    fn missing_native_file_is_unreadable() {
        let path = std::path::Path::new("/definitely/not/here/coins.txt");
        let err = read_text_file(path, "coins.txt").unwrap_err();
        assert!(matches!(err, ImportError::Unreadable { .. }));
    }
}
