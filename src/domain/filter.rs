use {
    crate::config::{FILTERS, FilterLimit},
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, fmt},
    strum::IntoEnumIterator,
    strum_macros::EnumIter,
};

/// The five numeric filters the server understands. Wire names are the
/// server's own (`hacim` = relative volume, `artis` = percentage change).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterId {
    Rsi1,
    Rsi2,
    Hacim,
    Volume,
    Artis,
}

impl FilterId {
    pub fn limit(self) -> &'static FilterLimit {
        match self {
            Self::Rsi1 => &FILTERS.rsi1,
            Self::Rsi2 => &FILTERS.rsi2,
            Self::Hacim => &FILTERS.hacim,
            Self::Volume => &FILTERS.volume,
            Self::Artis => &FILTERS.artis,
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Rsi1 => "rsi1",
            Self::Rsi2 => "rsi2",
            Self::Hacim => "hacim",
            Self::Volume => "volume",
            Self::Artis => "artis",
        }
    }

    /// Only one filter owns the comparison-operator selector.
    pub const fn has_comparison(self) -> bool {
        matches!(self, Self::Rsi2)
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = "≥")]
    AtLeast,
    #[serde(rename = "≤")]
    AtMost,
}

impl Comparison {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AtLeast => "≥",
            Self::AtMost => "≤",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSetting {
    pub enabled: bool,
    pub value: f64,
}

/// `filterStates` on the wire: which filters are switched on.
pub type FilterStates = BTreeMap<FilterId, bool>;

/// Current contents of the filter form.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterForm {
    settings: BTreeMap<FilterId, FilterSetting>,
    comparison: Comparison,
}

impl Default for FilterForm {
    fn default() -> Self {
        let settings = FilterId::iter()
            .map(|id| {
                (
                    id,
                    FilterSetting {
                        enabled: false,
                        value: id.limit().default,
                    },
                )
            })
            .collect();
        Self {
            settings,
            comparison: Comparison::default(),
        }
    }
}

impl FilterForm {
    pub fn setting(&self, id: FilterId) -> FilterSetting {
        self.settings.get(&id).copied().unwrap_or(FilterSetting {
            enabled: false,
            value: id.limit().default,
        })
    }

    pub fn is_enabled(&self, id: FilterId) -> bool {
        self.setting(id).enabled
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Value-adjust and comparison controls follow the enable toggle.
    pub fn controls_enabled(&self, id: FilterId) -> bool {
        self.is_enabled(id)
    }

    pub fn comparison_enabled(&self, id: FilterId) -> bool {
        id.has_comparison() && self.is_enabled(id)
    }

    /// Flips the enable toggle; returns the new state.
    pub fn toggle(&mut self, id: FilterId) -> bool {
        let entry = self.settings.entry(id).or_insert(FilterSetting {
            enabled: false,
            value: id.limit().default,
        });
        entry.enabled = !entry.enabled;
        entry.enabled
    }

    pub fn set_enabled(&mut self, id: FilterId, enabled: bool) {
        if self.is_enabled(id) != enabled {
            self.toggle(id);
        }
    }

    /// Moves the value by `delta`, clamped to the filter's bounds and rounded to
    /// its display precision. A disabled filter ignores the call.
    pub fn adjust(&mut self, id: FilterId, delta: f64) -> bool {
        let Some(entry) = self.settings.get_mut(&id) else {
            return false;
        };
        if !entry.enabled {
            return false;
        }
        entry.value = normalize(id.limit(), entry.value + delta);
        true
    }

    /// Overwrites the value regardless of the toggle. Used when restoring a
    /// server-echoed session, never by direct user input.
    pub fn restore_value(&mut self, id: FilterId, value: f64) {
        if let Some(entry) = self.settings.get_mut(&id) {
            entry.value = normalize(id.limit(), value);
        }
    }

    /// Only `rsi2` accepts an operator, and only while it is enabled.
    pub fn set_comparison(&mut self, id: FilterId, op: Comparison) -> bool {
        if !self.comparison_enabled(id) {
            return false;
        }
        self.comparison = op;
        true
    }

    pub fn restore_comparison(&mut self, op: Comparison) {
        self.comparison = op;
    }

    /// Text shown next to the stepper, and the text sent to the server.
    pub fn display_value(&self, id: FilterId) -> String {
        format!("{:.*}", id.limit().decimals, self.setting(id).value)
    }

    /// Payload value: the displayed text when enabled, otherwise nothing.
    pub fn payload_value(&self, id: FilterId) -> Option<String> {
        self.is_enabled(id).then(|| self.display_value(id))
    }

    pub fn states(&self) -> FilterStates {
        FilterId::iter().map(|id| (id, self.is_enabled(id))).collect()
    }
}

fn normalize(limit: &FilterLimit, value: f64) -> f64 {
    let scale = 10f64.powi(limit.decimals as i32);
    let rounded = (value * scale).round() / scale;
    rounded.clamp(limit.min, limit.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_form() -> FilterForm {
        let mut form = FilterForm::default();
        for id in FilterId::iter() {
            form.toggle(id);
        }
        form
    }

    #[test]
    fn toggling_gates_value_and_comparison_controls_for_every_filter() {
        let mut form = FilterForm::default();
        for id in FilterId::iter() {
            assert!(!form.controls_enabled(id));
            assert!(!form.comparison_enabled(id));

            assert!(form.toggle(id));
            assert!(form.controls_enabled(id));
            assert_eq!(form.comparison_enabled(id), id.has_comparison());

            assert!(!form.toggle(id));
            assert!(!form.controls_enabled(id));
            assert!(!form.comparison_enabled(id));
        }
    }

    #[test]
    fn disabled_filter_ignores_adjustments_and_operator_changes() {
        let mut form = FilterForm::default();
        let before = form.clone();
        for id in FilterId::iter() {
            assert!(!form.adjust(id, id.limit().step));
        }
        assert!(!form.set_comparison(FilterId::Rsi2, Comparison::AtMost));
        assert_eq!(form, before);
    }

    #[test]
    fn comparison_only_applies_to_rsi2() {
        let mut form = enabled_form();
        assert!(!form.set_comparison(FilterId::Rsi1, Comparison::AtMost));
        assert_eq!(form.comparison(), Comparison::AtLeast);
        assert!(form.set_comparison(FilterId::Rsi2, Comparison::AtMost));
        assert_eq!(form.comparison(), Comparison::AtMost);
    }

    #[test]
    fn values_never_leave_their_bounds() {
        let mut form = enabled_form();
        for id in FilterId::iter() {
            let limit = id.limit();
            for _ in 0..5_000 {
                form.adjust(id, limit.step * 7.0);
                let v = form.setting(id).value;
                assert!(v >= limit.min && v <= limit.max, "{} went to {}", id, v);
            }
            assert_eq!(form.setting(id).value, limit.max);
            for _ in 0..5_000 {
                form.adjust(id, -limit.step * 3.0);
                let v = form.setting(id).value;
                assert!(v >= limit.min && v <= limit.max, "{} went to {}", id, v);
            }
            assert_eq!(form.setting(id).value, limit.min);
        }
    }

    #[test]
    fn decimal_filters_render_one_digit_others_integers() {
        let mut form = enabled_form();
        for _ in 0..3 {
            form.adjust(FilterId::Hacim, 0.1);
            form.adjust(FilterId::Artis, -0.1);
        }
        assert_eq!(form.display_value(FilterId::Hacim), "1.8");
        assert_eq!(form.display_value(FilterId::Artis), "0.7");
        assert_eq!(form.display_value(FilterId::Rsi1), "30");
        assert_eq!(form.display_value(FilterId::Volume), "1000");

        form.adjust(FilterId::Volume, 100.0);
        assert_eq!(form.display_value(FilterId::Volume), "1100");
    }

    #[test]
    fn payload_only_carries_enabled_filters() {
        let mut form = FilterForm::default();
        form.toggle(FilterId::Rsi2);
        assert_eq!(form.payload_value(FilterId::Rsi2), Some("70".to_string()));
        assert_eq!(form.payload_value(FilterId::Rsi1), None);
        let states = form.states();
        assert_eq!(states.len(), 5);
        assert!(states[&FilterId::Rsi2]);
        assert!(!states[&FilterId::Hacim]);
    }

    #[test]
    fn comparison_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Comparison::AtMost).unwrap(), "\"≤\"");
        let c: Comparison = serde_json::from_str("\"≥\"").unwrap();
        assert_eq!(c, Comparison::AtLeast);
    }
}
