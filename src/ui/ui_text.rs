use std::sync::LazyLock;

// Glyphs from egui's bundled emoji font.
pub const ICON_CHECK: &str = "✅";
pub const ICON_WARNING: &str = "⚠";
pub const ICON_CROSS: &str = "❌";
pub const ICON_PLUG: &str = "🔌";
pub const ICON_HEART: &str = "♥";
pub const ICON_FILE: &str = "📄";
pub const ICON_TRASH: &str = "🗑";

/// Every user-visible string. The server speaks Turkish, so does the UI.
pub struct UiText {
    // Window
    pub app_title: String,
    pub heading_filters: String,
    pub heading_timeframes: String,
    pub heading_coin_list: String,
    pub heading_results: String,
    pub heading_console: String,

    // Filter rows
    pub label_rsi1: String,
    pub label_rsi2: String,
    pub label_hacim: String,
    pub label_volume: String,
    pub label_artis: String,
    pub label_closing_scan: String,
    pub toggle_on: String,
    pub toggle_off: String,
    pub hover_filter_row: String,
    pub hover_coarse_step: String,

    // Buttons
    pub button_filter: String,
    pub button_scanning: String,
    pub button_auto_scan: String,
    pub button_stop_auto_scan: String,
    pub button_auto_scan_queued: String,
    pub button_clear_results: String,
    pub button_reconnect: String,
    pub button_remove_list: String,

    // Coin list
    pub no_list_selected: String,
    pub drop_hint: String,
    pub restored_list: String,

    // Status bar
    pub status_connected: String,
    pub status_connecting: String,
    pub status_reconnecting: String,
    pub status_waiting: String,
    pub status_failed: String,
    pub status_closed_by_server: String,
    pub status_idle: String,
    pub status_last_heartbeat: String,
    pub status_auto_on: String,

    // Banners
    pub msg_connected: String,
    pub msg_reconnected: String,
    pub msg_server_disconnected: String,
    pub msg_disconnected_retrying: String,
    pub msg_reconnect_failed: String,
    pub msg_need_timeframe: String,
    pub msg_scan_failed: String,
    pub msg_auto_start_failed: String,
    pub msg_file_read_error: String,

    // Console
    pub console_auto_starting: String,
    pub console_auto_stopped: String,
    pub console_resumed: String,
    pub console_reconnected: String,
    pub console_gave_up: String,

    // Close guard
    pub close_title: String,
    pub close_body: String,
    pub close_confirm: String,
    pub close_cancel: String,
}

impl UiText {
    pub fn msg_connect_error(&self, attempt: u32, max: u32) -> String {
        format!("Bağlantı hatası ({}/{}). Yeniden deneniyor...", attempt, max)
    }

    pub fn msg_scan_rejected(&self, reason: &str) -> String {
        format!("Tarama sırasında bir hata oluştu: {}", reason)
    }

    pub fn msg_scan_completed(&self, total_matches: u64) -> String {
        format!("Tarama tamamlandı! {} eşleşme bulundu.", total_matches)
    }

    pub fn msg_coins_loaded(&self, count: usize) -> String {
        format!("{} coin başarıyla yüklendi.", count)
    }

    pub fn coin_count(&self, count: usize) -> String {
        format!("{} coin yüklendi", count)
    }

    pub fn console_disconnected(&self, reason: &str) -> String {
        format!(
            "{} Bağlantı kesildi ({}). Yeniden bağlanmaya çalışılıyor...",
            ICON_WARNING, reason
        )
    }

    pub fn console_reconnect_error(&self, message: &str) -> String {
        format!("{} Yeniden bağlantı hatası: {}", ICON_WARNING, message)
    }

    pub fn console_error(&self, error: &str) -> String {
        format!("HATA: {}", error)
    }

    pub fn status_attempt(&self, attempt: u32, max: u32) -> String {
        format!("deneme {}/{}", attempt, max)
    }

    pub fn timeframe_label(&self, label: &str) -> String {
        format!("{} dk", label)
    }

    pub fn timeframe_heading(&self, label: &str) -> String {
        format!("{} dk Sonuçları", label)
    }
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Kripto Tarayıcı".to_string(),
    heading_filters: "Filtreler".to_string(),
    heading_timeframes: "Zaman Aralıkları".to_string(),
    heading_coin_list: "Coin Listesi".to_string(),
    heading_results: "Sonuçlar".to_string(),
    heading_console: "Otomatik Tarama".to_string(),

    label_rsi1: "RSI (1)".to_string(),
    label_rsi2: "RSI (2)".to_string(),
    label_hacim: "Göreceli Hacim".to_string(),
    label_volume: "Hacim (USDT)".to_string(),
    label_artis: "Yüzde Değişim".to_string(),
    label_closing_scan: "Kapanış Taraması".to_string(),
    toggle_on: "Aktif".to_string(),
    toggle_off: "Pasif".to_string(),
    hover_filter_row: "Filtreyi açmak veya kapatmak için tıklayın".to_string(),
    hover_coarse_step: "Shift: 10 kat adım".to_string(),

    button_filter: "FILTRELE".to_string(),
    button_scanning: "TARANIYOR...".to_string(),
    button_auto_scan: "OTOMATİK TARAMA".to_string(),
    button_stop_auto_scan: "TARAMAYI DURDUR".to_string(),
    button_auto_scan_queued: "BAĞLANIYOR...".to_string(),
    button_clear_results: format!("{} Sonuçları Temizle", ICON_TRASH),
    button_reconnect: format!("{} Yeniden Bağlan", ICON_PLUG),
    button_remove_list: "Listeyi Kaldır".to_string(),

    no_list_selected: "Liste seçilmedi".to_string(),
    drop_hint: format!("{} .txt dosyasını pencereye sürükleyin", ICON_FILE),
    restored_list: "Sunucu oturumundan alınan liste".to_string(),

    status_connected: "Bağlı".to_string(),
    status_connecting: "Bağlanıyor".to_string(),
    status_reconnecting: "Yeniden bağlanıyor".to_string(),
    status_waiting: "Yeniden denenecek".to_string(),
    status_failed: "Bağlantı kurulamadı".to_string(),
    status_closed_by_server: "Sunucu bağlantıyı kapattı".to_string(),
    status_idle: "Bağlı değil".to_string(),
    status_last_heartbeat: format!("{} Son sinyal", ICON_HEART),
    status_auto_on: "Otomatik tarama açık".to_string(),

    msg_connected: "Sunucuya bağlanıldı".to_string(),
    msg_reconnected: "Bağlantı yeniden kuruldu".to_string(),
    msg_server_disconnected: "Sunucu tarafından bağlantı kesildi.".to_string(),
    msg_disconnected_retrying: "Bağlantı kesildi. Yeniden bağlanmaya çalışılıyor...".to_string(),
    msg_reconnect_failed: "Sunucuya bağlantı kurulamadı. Sunucu durumunu kontrol edin."
        .to_string(),
    msg_need_timeframe: "Lütfen en az bir zaman aralığı seçin!".to_string(),
    msg_scan_failed: "Tarama sırasında bir hata oluştu! Lütfen tekrar deneyin.".to_string(),
    msg_auto_start_failed: "Otomatik tarama başlatılamadı. Bağlantı kontrol ediliyor..."
        .to_string(),
    msg_file_read_error: "Dosya okuma hatası. Lütfen tekrar deneyin.".to_string(),

    console_auto_starting: "Otomatik tarama başlatılıyor...".to_string(),
    console_auto_stopped: "Otomatik tarama durduruldu.".to_string(),
    console_resumed: format!(
        "{} Bağlantı yeniden kuruldu. Otomatik tarama devam ediyor...",
        ICON_CHECK
    ),
    console_reconnected: format!(
        "{} Bağlantı başarıyla yeniden kuruldu. Otomatik tarama devam ediyor.",
        ICON_CHECK
    ),
    console_gave_up: format!("{} Bağlantı kurulamadı. Otomatik tarama durdu.", ICON_CROSS),

    close_title: "Çıkış".to_string(),
    close_body: "Otomatik tarama devam ediyor. Çıkmak istediğinize emin misiniz?".to_string(),
    close_confirm: "Çık".to_string(),
    close_cancel: "Vazgeç".to_string(),
});
