use {
    itertools::Itertools,
    serde::{Deserialize, Serialize},
    std::fmt,
    strum::IntoEnumIterator,
    strum_macros::EnumIter,
};

/// One scan interval bucket. The server evaluates each independently and
/// suffixes its per-timeframe event names with [`Timeframe::label`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "TimeframeRepr", into = "String")]
pub enum Timeframe {
    M1,
    M3,
    M5,
    M10,
    M15,
    M30,
}

impl Timeframe {
    pub const fn minutes(self) -> u32 {
        match self {
            Self::M1 => 1,
            Self::M3 => 3,
            Self::M5 => 5,
            Self::M10 => 10,
            Self::M15 => 15,
            Self::M30 => 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::M1 => "1",
            Self::M3 => "3",
            Self::M5 => "5",
            Self::M10 => "10",
            Self::M15 => "15",
            Self::M30 => "30",
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::iter().find(|t| t.minutes() == minutes)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse::<u32>().ok().and_then(Self::from_minutes)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Timeframe> for String {
    fn from(t: Timeframe) -> Self {
        t.label().to_string()
    }
}

/// Servers echo timeframes back either as `"15"` or as `15`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeframeRepr {
    Text(String),
    Minutes(u32),
}

impl TryFrom<TimeframeRepr> for Timeframe {
    type Error = String;

    fn try_from(repr: TimeframeRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeframeRepr::Text(s) => {
                Timeframe::from_label(&s).ok_or_else(|| format!("unknown timeframe '{}'", s))
            }
            TimeframeRepr::Minutes(m) => {
                Timeframe::from_minutes(m).ok_or_else(|| format!("unknown timeframe {}", m))
            }
        }
    }
}

/// Timeframes picked by the user, kept in click order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeframeSelection {
    picked: Vec<Timeframe>,
}

impl TimeframeSelection {
    /// Flips `tf` in or out. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, tf: Timeframe) -> bool {
        if let Some(pos) = self.picked.iter().position(|t| *t == tf) {
            self.picked.remove(pos);
            false
        } else {
            self.picked.push(tf);
            true
        }
    }

    pub fn contains(&self, tf: Timeframe) -> bool {
        self.picked.contains(&tf)
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    /// Click order, as the one-shot scan sends it.
    pub fn in_click_order(&self) -> Vec<Timeframe> {
        self.picked.clone()
    }

    /// Ascending minutes, as auto-scan start sends it.
    pub fn sorted(&self) -> Vec<Timeframe> {
        self.picked
            .iter()
            .copied()
            .sorted_by_key(|t| t.minutes())
            .collect()
    }

    pub fn replace_with(&mut self, tfs: impl IntoIterator<Item = Timeframe>) {
        self.picked = tfs.into_iter().unique().collect();
    }
}
