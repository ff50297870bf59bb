mod number_format;
pub(crate) mod time_utils;

pub use number_format::{format_locale_tr, format_plain};
pub use time_utils::{AppInstant, format_duration, local_clock_string, ms};
