mod coin_list;
mod filter;
mod scan_result;
mod timeframe;

pub use coin_list::{CoinList, normalize_symbol, parse_coin_list};
pub use filter::{Comparison, FilterForm, FilterId, FilterSetting, FilterStates};
pub use scan_result::{MatchResult, ResultColumn, ScanCompleted, ScanProgress};
pub use timeframe::{Timeframe, TimeframeSelection};
