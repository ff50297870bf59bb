use eframe::egui::{Color32, CornerRadius, Frame, Margin, Stroke};

pub use crate::ui::ui_text::UI_TEXT;

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub text_subdued: Color32,
    pub active: Color32,
    pub inactive: Color32,
    pub stop: Color32,
    pub info: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub console_bg: Color32,
    pub console_text: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub left_panel_width: f32,
    pub console_height: f32,
    pub table_height: f32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::YELLOW,
        subsection_heading: Color32::ORANGE,
        central_panel: Color32::from_rgb(30, 30, 34),
        side_panel: Color32::from_rgb(25, 25, 25),
        text_subdued: Color32::from_rgb(120, 120, 120),
        active: Color32::from_rgb(76, 175, 80),
        inactive: Color32::from_rgb(90, 90, 90),
        stop: Color32::from_rgb(255, 77, 77),
        info: Color32::from_rgb(33, 150, 243),
        success: Color32::from_rgb(76, 175, 80),
        warning: Color32::from_rgb(255, 152, 0),
        error: Color32::from_rgb(244, 67, 54),
        console_bg: Color32::from_rgb(12, 12, 12),
        console_text: Color32::from_rgb(0, 220, 120),
    },
    left_panel_width: 320.0,
    console_height: 220.0,
    table_height: 260.0,
};

impl UiConfig {
    /// Frame for Left/Right panels (Standard padding)
    pub fn side_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    pub fn top_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    /// Frame for Bottom Status bar (Tighter vertical padding)
    pub fn bottom_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::symmetric(8, 4),
            ..Default::default()
        }
    }

    pub fn central_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.central_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    pub fn console_frame(&self) -> Frame {
        Frame {
            fill: self.colors.console_bg,
            stroke: Stroke::new(1.0, self.colors.inactive),
            inner_margin: Margin::same(6),
            corner_radius: CornerRadius::same(4),
            ..Default::default()
        }
    }

    /// Coloured strip for transient messages.
    pub fn banner_frame(&self, color: Color32) -> Frame {
        Frame {
            fill: color.linear_multiply(0.25),
            stroke: Stroke::new(1.0, color),
            inner_margin: Margin::symmetric(10, 6),
            corner_radius: CornerRadius::same(4),
            ..Default::default()
        }
    }
}
