use {
    crate::{
        app::{App, Banner, DashboardState, ResultTable},
        domain::Timeframe,
        ui::{
            UI_CONFIG, UI_TEXT,
            styles::{BannerColor, UiStyleExt},
            ui_panels::PanelAction,
        },
    },
    eframe::egui::{
        Align, Align2, Button, CentralPanel, Color32, Context, Layout, ProgressBar, RichText, ScrollArea,
        Ui, Window,
    },
    egui_extras::{Column, TableBuilder},
};

impl App {
    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        let mut actions = Vec::new();
        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                let state = self.dashboard.state();
                if let Some(banner) = state.banner() {
                    render_banner(ui, banner);
                    ui.add_space(6.0);
                }
                ScrollArea::vertical()
                    .id_salt("results_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        render_single_results(ui, state, &mut actions);
                        render_timeframe_results(ui, state, &mut actions);
                        render_console(ui, state);
                    });
            });
        self.apply_actions(ctx, actions);
    }

    /// Native only in practice: the web build relies on `beforeunload`.
    pub(crate) fn render_close_dialog(&mut self, ctx: &Context) {
        if !self.confirm_close {
            return;
        }
        let mut confirmed = false;
        let mut cancelled = false;
        Window::new(&UI_TEXT.close_title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&UI_TEXT.close_body);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let quit = Button::new(ui.button_text_primary(&UI_TEXT.close_confirm))
                        .fill(UI_CONFIG.colors.stop);
                    confirmed = ui.add(quit).clicked();
                    cancelled = ui.button(&UI_TEXT.close_cancel).clicked();
                });
            });
        if confirmed {
            self.confirm_exit(ctx);
        } else if cancelled {
            self.confirm_close = false;
        }
    }
}

fn render_banner(ui: &mut Ui, banner: &Banner) {
    let color = banner.kind.color();
    UI_CONFIG.banner_frame(color).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(&banner.text).strong().color(Color32::WHITE));
    });
}

fn render_single_results(ui: &mut Ui, state: &DashboardState, actions: &mut Vec<PanelAction>) {
    let results = state.results();
    let progress = results.single_progress().filter(|_| state.scan_in_flight());
    if results.single_table().is_none() && progress.is_none() {
        return;
    }

    ui.horizontal(|ui| {
        ui.label_subheader(&UI_TEXT.heading_results);
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if results.single_table().is_some()
                && ui.small_button(&UI_TEXT.button_clear_results).clicked()
            {
                actions.push(PanelAction::ClearSingle);
            }
        });
    });
    if let Some(p) = progress {
        ui.add(ProgressBar::new(p.fraction()).text(p.detailed_text()));
    }
    if let Some(table) = results.single_table() {
        render_result_table(ui, "single_results", table);
    }
    ui.add_space(10.0);
}

fn render_timeframe_results(ui: &mut Ui, state: &DashboardState, actions: &mut Vec<PanelAction>) {
    let results = state.results();
    if !results.multi_area_open() {
        return;
    }

    ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
        if ui.small_button(&UI_TEXT.button_clear_results).clicked() {
            actions.push(PanelAction::ClearTimeframes);
        }
    });

    for bar in results.progress_bars() {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(UI_TEXT.timeframe_label(bar.timeframe.label()))
                    .monospace()
                    .color(UI_CONFIG.colors.label),
            );
            ui.add(
                ProgressBar::new(bar.progress.fraction())
                    .text(bar.progress.short_text())
                    .animate(!bar.progress.is_finished()),
            );
        });
    }

    for (tf, table) in results.tables() {
        ui.add_space(6.0);
        ui.label_subheader(UI_TEXT.timeframe_heading(tf.label()));
        render_result_table(ui, table_id(*tf), table);
    }
    ui.add_space(10.0);
}

fn table_id(tf: Timeframe) -> String {
    format!("results_{}", tf.minutes())
}

fn render_result_table(ui: &mut Ui, id: impl std::hash::Hash, table: &ResultTable) {
    ui.push_id(id, |ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center));
        for _ in table.columns() {
            builder = builder.column(Column::auto().at_least(90.0));
        }
        builder
            .header(20.0, |mut header| {
                for col in table.columns() {
                    header.col(|ui| {
                        ui.strong(col.header());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let cells = &table.rows()[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

fn render_console(ui: &mut Ui, state: &DashboardState) {
    let console = state.console();
    if !console.is_visible() {
        return;
    }
    ui.label_subheader(&UI_TEXT.heading_console);
    UI_CONFIG.console_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ScrollArea::vertical()
            .id_salt("console_scroll")
            .max_height(UI_CONFIG.console_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in console.lines() {
                    ui.label(
                        RichText::new(&line.text)
                            .monospace()
                            .color(UI_CONFIG.colors.console_text),
                    );
                }
            });
    });
}
