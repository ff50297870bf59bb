// src/app/state.rs

use {
    crate::{
        app::results::{ConsoleLog, ResultsBoard},
        config::SCAN,
        data::FilterPayload,
        domain::{CoinList, FilterForm, FilterId, Timeframe, TimeframeSelection},
        utils::{AppInstant, ms},
    },
    chrono::{DateTime, Local},
    strum::IntoEnumIterator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message over the results area. Never replaces their content.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub expires_at: AppInstant,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScanState {
    /// A one-shot scan is running; the filter button is disabled.
    pub(crate) in_flight: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AutoScanState {
    pub(crate) active: bool,
    pub(crate) last_heartbeat: Option<AppInstant>,
    pub(crate) last_heartbeat_at: Option<DateTime<Local>>,
    /// The next `auto_scan_started` begins a fresh console.
    pub(crate) fresh_console: bool,
    pub(crate) last_toggle: Option<AppInstant>,
    /// A toggle requested while offline, replayed on the next connect.
    pub(crate) pending_toggle: bool,
}

impl AutoScanState {
    /// Debounce for the toggle button. Rejected clicks don't reset the window.
    pub(crate) fn accept_click(&mut self, now: AppInstant) -> bool {
        if let Some(last) = self.last_toggle {
            if now.duration_since(last) < ms(SCAN.toggle_debounce_ms) {
                return false;
            }
        }
        self.last_toggle = Some(now);
        true
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.last_heartbeat = None;
    }
}

/// Everything the dashboard shows and the handlers mutate.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub(crate) form: FilterForm,
    pub(crate) timeframes: TimeframeSelection,
    pub(crate) coin_list: Option<CoinList>,
    pub(crate) closing_scan: bool,
    pub(crate) scan: ScanState,
    pub(crate) auto_scan: AutoScanState,
    pub(crate) results: ResultsBoard,
    pub(crate) console: ConsoleLog,
    pub(crate) banner: Option<Banner>,
    /// One connection-problem banner per outage.
    pub(crate) outage_reported: bool,
    pub(crate) show_manual_reconnect: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            form: FilterForm::default(),
            timeframes: TimeframeSelection::default(),
            coin_list: None,
            closing_scan: false,
            scan: ScanState::default(),
            auto_scan: AutoScanState {
                fresh_console: true,
                ..Default::default()
            },
            results: ResultsBoard::default(),
            console: ConsoleLog::default(),
            banner: None,
            outage_reported: false,
            show_manual_reconnect: false,
        }
    }
}

impl DashboardState {
    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    pub fn timeframes(&self) -> &TimeframeSelection {
        &self.timeframes
    }

    pub fn coin_list(&self) -> Option<&CoinList> {
        self.coin_list.as_ref()
    }

    pub fn closing_scan(&self) -> bool {
        self.closing_scan
    }

    pub fn scan_in_flight(&self) -> bool {
        self.scan.in_flight
    }

    pub fn auto_scan_active(&self) -> bool {
        self.auto_scan.active
    }

    pub fn auto_toggle_pending(&self) -> bool {
        self.auto_scan.pending_toggle
    }

    pub fn last_heartbeat_at(&self) -> Option<DateTime<Local>> {
        self.auto_scan.last_heartbeat_at
    }

    pub fn results(&self) -> &ResultsBoard {
        &self.results
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn show_manual_reconnect(&self) -> bool {
        self.show_manual_reconnect
    }

    pub(crate) fn show_banner(&mut self, kind: BannerKind, text: impl Into<String>, now: AppInstant) {
        let text = text.into();
        match kind {
            BannerKind::Error => log::error!("{}", text),
            BannerKind::Warning => log::warn!("{}", text),
            BannerKind::Info | BannerKind::Success => log::info!("{}", text),
        }
        self.banner = Some(Banner {
            kind,
            text,
            expires_at: now + ms(SCAN.banner_ttl_ms),
        });
    }

    pub(crate) fn expire_banner(&mut self, now: AppInstant) {
        if self.banner.as_ref().is_some_and(|b| now >= b.expires_at) {
            self.banner = None;
        }
    }

    /// Snapshot of the form for the server.
    pub(crate) fn build_payload(&self, times: Vec<Timeframe>, closing_scan: Option<bool>) -> FilterPayload {
        FilterPayload {
            rsi1: self.form.payload_value(FilterId::Rsi1),
            rsi2: self.form.payload_value(FilterId::Rsi2),
            comparison: self.form.comparison(),
            hacim: self.form.payload_value(FilterId::Hacim),
            volume: self.form.payload_value(FilterId::Volume),
            artis: self.form.payload_value(FilterId::Artis),
            times,
            closing_scan,
            coin_list: self.coin_list.as_ref().map(|list| list.symbols.clone()),
            filter_states: self.form.states(),
        }
    }

    /// Loads the criteria of a server-side session into the form.
    pub(crate) fn restore_from(&mut self, params: &FilterPayload) {
        for id in FilterId::iter() {
            let value = match id {
                FilterId::Rsi1 => params.rsi1.as_deref(),
                FilterId::Rsi2 => params.rsi2.as_deref(),
                FilterId::Hacim => params.hacim.as_deref(),
                FilterId::Volume => params.volume.as_deref(),
                FilterId::Artis => params.artis.as_deref(),
            };
            let parsed = value.and_then(|v| v.trim().parse::<f64>().ok());
            let enabled = params
                .filter_states
                .get(&id)
                .copied()
                .unwrap_or(parsed.is_some());
            if let Some(v) = parsed {
                self.form.restore_value(id, v);
            }
            self.form.set_enabled(id, enabled);
        }
        self.form.restore_comparison(params.comparison);
        self.timeframes.replace_with(params.times.iter().copied());
        self.coin_list = params
            .coin_list
            .as_ref()
            .map(|symbols| CoinList::from_symbols(symbols.clone()));
    }
}
