use {
    crate::{
        app::{App, DashboardState},
        data::ConnectionPhase,
        domain::{Comparison, FilterId, Timeframe},
        ui::{
            UI_CONFIG, UI_TEXT,
            styles::{UiStyleExt, connection_badge},
        },
        utils::{AppInstant, format_duration, local_clock_string, ms},
    },
    eframe::egui::{
        Align, Button, Context, Layout, Pos2, Rect, RichText, ScrollArea, Sense, SidePanel,
        TopBottomPanel, Ui, UiBuilder,
    },
    strum::IntoEnumIterator,
};

/// What the user asked for this frame. Applied after rendering, so panels
/// only ever borrow the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PanelAction {
    ToggleFilter(FilterId),
    Adjust {
        id: FilterId,
        steps: i32,
        coarse: bool,
    },
    SetComparison(FilterId, Comparison),
    ToggleTimeframe(Timeframe),
    ToggleClosingScan,
    ResetCoinList,
    Scan,
    ToggleAutoScan,
    Reconnect,
    ClearSingle,
    ClearTimeframes,
}

impl App {
    pub(crate) fn apply_actions(&mut self, ctx: &Context, actions: Vec<PanelAction>) {
        let now = AppInstant::now();
        for action in actions {
            match action {
                PanelAction::ToggleFilter(id) => self.dashboard.toggle_filter(id),
                PanelAction::Adjust { id, steps, coarse } => {
                    self.dashboard.adjust_filter(id, steps, coarse)
                }
                PanelAction::SetComparison(id, op) => self.dashboard.set_comparison(id, op),
                PanelAction::ToggleTimeframe(tf) => self.dashboard.toggle_timeframe(tf),
                PanelAction::ToggleClosingScan => self.dashboard.toggle_closing_scan(),
                PanelAction::ResetCoinList => self.dashboard.reset_coin_list(),
                PanelAction::Scan => self.start_scan(ctx),
                PanelAction::ToggleAutoScan => self.dashboard.toggle_auto_scan(now),
                PanelAction::Reconnect => self.dashboard.reconnect_manually(now),
                PanelAction::ClearSingle => self.dashboard.clear_single_results(),
                PanelAction::ClearTimeframes => self.dashboard.clear_timeframe_results(),
            }
        }
    }

    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        TopBottomPanel::top("top_panel")
            .frame(UI_CONFIG.top_panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(&UI_TEXT.app_title).strong().color(UI_CONFIG.colors.heading));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.dashboard.state().auto_scan_active() {
                            ui.label(
                                RichText::new(&UI_TEXT.status_auto_on)
                                    .strong()
                                    .color(UI_CONFIG.colors.active),
                            );
                        }
                    });
                });
            });
    }

    pub(crate) fn render_left_panel(&mut self, ctx: &Context) {
        let mut actions = Vec::new();
        SidePanel::left("filter_panel")
            .frame(UI_CONFIG.side_panel_frame())
            .exact_width(UI_CONFIG.left_panel_width)
            .resizable(false)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    let state = self.dashboard.state();
                    render_filter_section(ui, state, &mut actions);
                    ui.separator();
                    render_timeframe_section(ui, state, &mut actions);
                    ui.separator();
                    render_coin_list_section(ui, state, &mut actions);
                    ui.separator();
                    render_action_buttons(ui, state, &mut actions);
                });
            });
        self.apply_actions(ctx, actions);
    }

    pub(crate) fn render_status_panel(&mut self, ctx: &Context) {
        let mut actions = Vec::new();
        TopBottomPanel::bottom("status_panel")
            .frame(UI_CONFIG.bottom_panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let connection = self.dashboard.connection();
                    let (color, text) = connection_badge(connection.phase());
                    ui.label(RichText::new("●").color(color));
                    ui.label(RichText::new(text).small().color(color));
                    if connection.attempts() > 0 && !connection.is_connected() {
                        ui.label_subdued(
                            UI_TEXT.status_attempt(connection.attempts(), connection.max_attempts()),
                        );
                    }
                    if let ConnectionPhase::Waiting { until } = connection.phase() {
                        let left = until.saturating_duration_since(AppInstant::now());
                        ui.label_subdued(format_duration(left));
                        ctx.request_repaint_after(ms(1_000));
                    }
                    ui.separator();
                    ui.label_subdued(connection.url());

                    if let Some(at) = self.dashboard.state().last_heartbeat_at() {
                        ui.separator();
                        ui.metric(
                            &UI_TEXT.status_last_heartbeat,
                            &local_clock_string(at),
                            UI_CONFIG.colors.label,
                        );
                    }

                    if self.dashboard.state().show_manual_reconnect() {
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            let btn = Button::new(ui.button_text_secondary(&UI_TEXT.button_reconnect))
                                .fill(UI_CONFIG.colors.warning);
                            if ui.add(btn).clicked() {
                                actions.push(PanelAction::Reconnect);
                            }
                        });
                    }
                });
            });
        self.apply_actions(ctx, actions);
    }
}

fn filter_label(id: FilterId) -> &'static str {
    match id {
        FilterId::Rsi1 => UI_TEXT.label_rsi1.as_str(),
        FilterId::Rsi2 => UI_TEXT.label_rsi2.as_str(),
        FilterId::Hacim => UI_TEXT.label_hacim.as_str(),
        FilterId::Volume => UI_TEXT.label_volume.as_str(),
        FilterId::Artis => UI_TEXT.label_artis.as_str(),
    }
}

fn render_filter_section(ui: &mut Ui, state: &DashboardState, actions: &mut Vec<PanelAction>) {
    ui.label_subheader(&UI_TEXT.heading_filters);
    let coarse = ui.input(|i| i.modifiers.shift);
    for id in FilterId::iter() {
        render_filter_row(ui, state, id, coarse, actions);
    }

    // Closing scan behaves like a filter row without a value.
    let row = ui
        .scope_builder(UiBuilder::new().sense(Sense::click()), |ui| {
            ui.horizontal(|ui| {
                ui.label(&UI_TEXT.label_closing_scan);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.toggle_chip(state.closing_scan()).clicked()
                })
                .inner
            })
            .inner
        });
    if row.inner || row.response.clicked() {
        actions.push(PanelAction::ToggleClosingScan);
    }
}

/// A whole row toggles its filter; the stepper and operator buttons only
/// respond while the filter is on.
fn render_filter_row(
    ui: &mut Ui,
    state: &DashboardState,
    id: FilterId,
    coarse: bool,
    actions: &mut Vec<PanelAction>,
) {
    let form = state.form();
    let enabled = form.controls_enabled(id);

    let row = ui.scope_builder(UiBuilder::new().sense(Sense::click()), |ui| {
        let mut chip_clicked = false;
        let mut controls = Rect::NOTHING;
        ui.horizontal(|ui| {
            chip_clicked = ui.toggle_chip(form.is_enabled(id)).clicked();
            ui.label(filter_label(id));

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let stepper = ui.add_enabled_ui(enabled, |ui| {
                    if ui.small_button("+").clicked() {
                        actions.push(PanelAction::Adjust { id, steps: 1, coarse });
                    }
                    ui.label(RichText::new(form.display_value(id)).monospace().strong());
                    if ui.small_button("−").clicked() {
                        actions.push(PanelAction::Adjust { id, steps: -1, coarse });
                    }
                });
                controls = controls.union(stepper.response.rect);
                if id.has_comparison() {
                    let operators = ui.add_enabled_ui(form.comparison_enabled(id), |ui| {
                        for op in Comparison::iter() {
                            if ui
                                .selectable_label(form.comparison() == op, op.symbol())
                                .clicked()
                            {
                                actions.push(PanelAction::SetComparison(id, op));
                            }
                        }
                    });
                    controls = controls.union(operators.response.rect);
                }
            });
        });
        (chip_clicked, controls)
    });

    let hover = if enabled {
        format!("{}\n{}", UI_TEXT.hover_filter_row, UI_TEXT.hover_coarse_step)
    } else {
        UI_TEXT.hover_filter_row.clone()
    };
    let (chip_clicked, controls) = row.inner;
    let response = row.response.on_hover_text(hover);
    if chip_clicked
        || (response.clicked() && row_click_toggles(response.interact_pointer_pos(), controls))
    {
        actions.push(PanelAction::ToggleFilter(id));
    }
}

/// Disabled stepper and operator buttons sense nothing, so their clicks reach
/// the row. Those must not toggle the filter.
fn row_click_toggles(pointer: Option<Pos2>, controls: Rect) -> bool {
    pointer.is_none_or(|pos| !controls.contains(pos))
}

fn render_timeframe_section(ui: &mut Ui, state: &DashboardState, actions: &mut Vec<PanelAction>) {
    ui.label_subheader(&UI_TEXT.heading_timeframes);
    ui.horizontal_wrapped(|ui| {
        for tf in Timeframe::iter() {
            let selected = state.timeframes().contains(tf);
            if ui
                .selectable_label(selected, UI_TEXT.timeframe_label(tf.label()))
                .clicked()
            {
                actions.push(PanelAction::ToggleTimeframe(tf));
            }
        }
    });
}

fn render_coin_list_section(ui: &mut Ui, state: &DashboardState, actions: &mut Vec<PanelAction>) {
    ui.label_subheader(&UI_TEXT.heading_coin_list);
    match state.coin_list() {
        Some(list) => {
            let file = if list.has_file() {
                list.describe_file()
            } else {
                UI_TEXT.restored_list.clone()
            };
            ui.label(file);
            ui.label_subdued(UI_TEXT.coin_count(list.len()));
            if ui.small_button(&UI_TEXT.button_remove_list).clicked() {
                actions.push(PanelAction::ResetCoinList);
            }
        }
        None => {
            ui.label(&UI_TEXT.no_list_selected);
            ui.label_subdued(&UI_TEXT.drop_hint);
        }
    }
}

fn render_action_buttons(ui: &mut Ui, state: &DashboardState, actions: &mut Vec<PanelAction>) {
    let width = ui.available_width();

    let scan_text = if state.scan_in_flight() {
        &UI_TEXT.button_scanning
    } else {
        &UI_TEXT.button_filter
    };
    let scan_btn = Button::new(ui.button_text_primary(scan_text))
        .fill(UI_CONFIG.colors.info)
        .min_size([width, 32.0].into());
    if ui.add_enabled(!state.scan_in_flight(), scan_btn).clicked() {
        actions.push(PanelAction::Scan);
    }

    ui.add_space(4.0);

    let (auto_text, auto_color) = if state.auto_toggle_pending() {
        (&UI_TEXT.button_auto_scan_queued, UI_CONFIG.colors.warning)
    } else if state.auto_scan_active() {
        (&UI_TEXT.button_stop_auto_scan, UI_CONFIG.colors.stop)
    } else {
        (&UI_TEXT.button_auto_scan, UI_CONFIG.colors.active)
    };
    let auto_btn = Button::new(ui.button_text_primary(auto_text))
        .fill(auto_color)
        .min_size([width, 32.0].into());
    if ui.add(auto_btn).clicked() {
        actions.push(PanelAction::ToggleAutoScan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn clicks_over_the_controls_do_not_toggle_the_row() {
        let controls = Rect::from_min_max(pos2(200.0, 0.0), pos2(300.0, 20.0));
        assert!(!row_click_toggles(Some(pos2(250.0, 10.0)), controls));
        assert!(row_click_toggles(Some(pos2(40.0, 10.0)), controls));
        // Keyboard activation has no pointer position.
        assert!(row_click_toggles(None, controls));
        assert!(row_click_toggles(Some(pos2(250.0, 10.0)), Rect::NOTHING));
    }
}
