use {
    crate::utils::{format_locale_tr, format_plain},
    serde::{Deserialize, Deserializer, Serialize},
};

/// One coin that passed every enabled filter. The server only includes the
/// indicator fields whose filter was active, so all of them are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rsi: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub relative_volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub percentage_change: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanProgress {
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub percentage: f64,
}

impl ScanProgress {
    pub fn finished() -> Self {
        Self {
            current: 0,
            total: 0,
            percentage: 100.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.percentage >= 100.0
    }

    /// 0.0..=1.0 for progress widgets.
    pub fn fraction(&self) -> f32 {
        (self.percentage / 100.0).clamp(0.0, 1.0) as f32
    }

    /// `"42.5%"`
    pub fn short_text(&self) -> String {
        format!("{}%", format_plain(self.percentage))
    }

    /// `"42.5% (17/40)"`
    pub fn detailed_text(&self) -> String {
        format!("{} ({}/{})", self.short_text(), self.current, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanCompleted {
    #[serde(default)]
    pub total_matches: u64,
    #[serde(default)]
    pub timeframe: Option<String>,
}

/// Table columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultColumn {
    Symbol,
    Rsi,
    RelativeVolume,
    Volume,
    PercentageChange,
}

impl ResultColumn {
    pub const ALL: [ResultColumn; 5] = [
        Self::Symbol,
        Self::Rsi,
        Self::RelativeVolume,
        Self::Volume,
        Self::PercentageChange,
    ];

    /// Columns for a table whose first row is `first`: symbol always, the rest
    /// only when that result carries the field.
    pub fn for_result(first: &MatchResult) -> Vec<ResultColumn> {
        Self::ALL
            .into_iter()
            .filter(|col| *col == Self::Symbol || col.raw(first).is_some())
            .collect()
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::Symbol => "Sembol",
            Self::Rsi => "RSI",
            Self::RelativeVolume => "Göreceli Hacim",
            Self::Volume => "Hacim",
            Self::PercentageChange => "Yüzde Değişim",
        }
    }

    fn raw(self, result: &MatchResult) -> Option<f64> {
        match self {
            Self::Symbol => None,
            Self::Rsi => result.rsi,
            Self::RelativeVolume => result.relative_volume,
            Self::Volume => result.volume,
            Self::PercentageChange => result.percentage_change,
        }
    }

    /// Rendered cell; `-` when the result lacks the field.
    pub fn cell(self, result: &MatchResult) -> String {
        if self == Self::Symbol {
            return result.symbol.clone();
        }
        match (self, self.raw(result)) {
            (_, None) => "-".to_string(),
            (Self::RelativeVolume, Some(v)) => format!("{}x", format_plain(v)),
            (Self::Volume, Some(v)) => format_locale_tr(v, 2),
            (Self::PercentageChange, Some(v)) => format!("{}%", format_plain(v)),
            (_, Some(v)) => format_plain(v),
        }
    }
}

/// Accepts `12.5`, `"12.5"` or `null`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    Ok(
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(NumberOrText::Number(n)) => Some(n),
            Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}
