//! Static bounds and defaults for the filter form.

/// Bounds, step size and display precision of one numeric filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterLimit {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Digits after the decimal point when displayed and sent.
    pub decimals: usize,
    pub default: f64,
}

pub struct FilterLimits {
    pub rsi1: FilterLimit,
    pub rsi2: FilterLimit,
    /// Relative volume multiplier.
    pub hacim: FilterLimit,
    /// Last candle volume in USDT.
    pub volume: FilterLimit,
    /// Percentage change.
    pub artis: FilterLimit,
    /// Multiplier applied to `step` by the coarse adjust buttons.
    pub coarse_factor: f64,
}

pub const FILTERS: FilterLimits = FilterLimits {
    rsi1: FilterLimit {
        min: 0.0,
        max: 100.0,
        step: 1.0,
        decimals: 0,
        default: 30.0,
    },
    rsi2: FilterLimit {
        min: 0.0,
        max: 100.0,
        step: 1.0,
        decimals: 0,
        default: 70.0,
    },
    hacim: FilterLimit {
        min: 0.1,
        max: 10.0,
        step: 0.1,
        decimals: 1,
        default: 1.5,
    },
    volume: FilterLimit {
        min: 0.0,
        max: 250_000.0,
        step: 100.0,
        decimals: 0,
        default: 1_000.0,
    },
    artis: FilterLimit {
        min: -100.0,
        max: 100.0,
        step: 0.1,
        decimals: 1,
        default: 1.0,
    },
    coarse_factor: 10.0,
};
