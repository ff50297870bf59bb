mod controller;
mod results;
mod root;
mod state;

pub use {
    controller::Dashboard,
    results::{ConsoleLine, ConsoleLog, ResultTable, ResultsBoard, TimeframeProgress},
    root::App,
    state::{Banner, BannerKind, DashboardState},
};
