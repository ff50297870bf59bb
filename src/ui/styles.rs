use {
    crate::{
        app::BannerKind,
        data::ConnectionPhase,
        ui::{UI_CONFIG, UI_TEXT},
    },
    eframe::egui::{
        Color32, CornerRadius, FontId, Response, RichText, Sense, Stroke, StrokeKind, Ui, Vec2,
        WidgetInfo, WidgetType,
    },
};

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub trait BannerColor {
    fn color(&self) -> Color32;
}

impl BannerColor for BannerKind {
    fn color(&self) -> Color32 {
        match self {
            Self::Info => UI_CONFIG.colors.info,
            Self::Success => UI_CONFIG.colors.success,
            Self::Warning => UI_CONFIG.colors.warning,
            Self::Error => UI_CONFIG.colors.error,
        }
    }
}

/// Colour and label for the status bar's connection indicator.
pub(crate) fn connection_badge(phase: ConnectionPhase) -> (Color32, &'static str) {
    match phase {
        ConnectionPhase::Connected => (UI_CONFIG.colors.success, UI_TEXT.status_connected.as_str()),
        ConnectionPhase::Connecting {
            reconnecting: false,
            ..
        } => (UI_CONFIG.colors.info, UI_TEXT.status_connecting.as_str()),
        ConnectionPhase::Connecting {
            reconnecting: true, ..
        } => (UI_CONFIG.colors.warning, UI_TEXT.status_reconnecting.as_str()),
        ConnectionPhase::Waiting { .. } => (UI_CONFIG.colors.warning, UI_TEXT.status_waiting.as_str()),
        ConnectionPhase::Failed => (UI_CONFIG.colors.error, UI_TEXT.status_failed.as_str()),
        ConnectionPhase::ClosedByServer => {
            (UI_CONFIG.colors.error, UI_TEXT.status_closed_by_server.as_str())
        }
        ConnectionPhase::Idle => (UI_CONFIG.colors.text_subdued, UI_TEXT.status_idle.as_str()),
    }
}

pub(crate) trait UiStyleExt {
    /// Interactive label acting as button: transparent when idle, gray bg on hover, blue bg when selected.
    fn interactive_label(
        &mut self,
        text: &str,
        is_selected: bool,
        idle_color: Color32,
        font_id: FontId,
    ) -> Response;

    /// Aktif/Pasif pill.
    fn toggle_chip(&mut self, on: bool) -> Response;
    fn label_subdued(&mut self, text: impl Into<String>);
    fn metric(&mut self, label: &str, value: &str, color: Color32);
    fn label_subheader(&mut self, text: impl Into<String>);
    fn button_text_primary(&self, text: impl Into<String>) -> RichText;
    fn button_text_secondary(&self, text: impl Into<String>) -> RichText;
}

impl UiStyleExt for Ui {
    fn interactive_label(
        &mut self,
        text: &str,
        is_selected: bool,
        idle_color: Color32,
        font_id: FontId,
    ) -> Response {
        let padding = Vec2::new(4.0, 4.0);
        let galley = self
            .painter()
            .layout_no_wrap(text.to_string(), font_id, idle_color);
        let desired_size = galley.size() + padding * 2.0;
        let (rect, response) = self.allocate_exact_size(desired_size, Sense::click());
        response.widget_info(|| WidgetInfo::selected(WidgetType::Button, true, is_selected, text));

        if self.is_rect_visible(rect) {
            let visuals = self.style().visuals.clone();
            let (bg_fill, text_color) = if is_selected {
                (visuals.selection.bg_fill, Color32::WHITE)
            } else if response.hovered() || response.has_focus() {
                (visuals.widgets.hovered.bg_fill, Color32::YELLOW)
            } else {
                (Color32::TRANSPARENT, idle_color)
            };

            if is_selected || response.hovered() {
                self.painter().rect(
                    rect,
                    CornerRadius::same(4),
                    bg_fill,
                    Stroke::NONE,
                    StrokeKind::Inside,
                );
            }
            let text_pos = rect.left_top() + padding;
            self.painter().galley(text_pos, galley, text_color);
        }
        response
    }

    fn toggle_chip(&mut self, on: bool) -> Response {
        let (text, color) = if on {
            (&UI_TEXT.toggle_on, UI_CONFIG.colors.active)
        } else {
            (&UI_TEXT.toggle_off, UI_CONFIG.colors.inactive)
        };
        self.interactive_label(text, on, color, FontId::proportional(12.0))
    }

    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.text_subdued));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(colored_subsection_heading(text));
    }

    fn button_text_primary(&self, text: impl Into<String>) -> RichText {
        RichText::new(text).strong().color(Color32::WHITE)
    }

    fn button_text_secondary(&self, text: impl Into<String>) -> RichText {
        RichText::new(text).strong().color(Color32::WHITE).small()
    }
}
