//! Typed payloads of the realtime channel and the `/filter` endpoint.

use {
    crate::{
        domain::{Comparison, FilterStates, MatchResult, ScanCompleted, ScanProgress, Timeframe},
        error::ProtocolError,
    },
    serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned},
    serde_json::Value,
    strum::IntoEnumIterator,
};

pub const MATCH_FOUND: &str = "match_found";
pub const SCAN_PROGRESS: &str = "scan_progress";
pub const SCAN_COMPLETED: &str = "scan_completed";
pub const AUTO_SCAN_STARTED: &str = "auto_scan_started";
pub const AUTO_SCAN_RESULT: &str = "auto_scan_result";
pub const AUTO_SCAN_ERROR: &str = "auto_scan_error";
pub const AUTO_SCAN_STOPPED: &str = "auto_scan_stopped";
pub const AUTO_SCAN_HEARTBEAT: &str = "auto_scan_heartbeat";

pub const START_AUTO_SCAN: &str = "start_auto_scan";
pub const STOP_AUTO_SCAN: &str = "stop_auto_scan";

/// Filter criteria as the server expects them. Numeric filters travel as the
/// text shown in the form; disabled ones are `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub rsi1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rsi2: Option<String>,
    #[serde(default)]
    pub comparison: Comparison,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hacim: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artis: Option<String>,
    #[serde(default)]
    pub times: Vec<Timeframe>,
    /// Only the one-shot scan sends this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_scan: Option<bool>,
    /// `null` means every USDT pair.
    #[serde(default)]
    pub coin_list: Option<Vec<String>>,
    #[serde(default)]
    pub filter_states: FilterStates,
}

/// Body of a `POST /filter` reply. Per-timeframe results are also part of it,
/// but they already arrived as realtime events.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl FilterResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AutoScanStarted {
    #[serde(default)]
    pub message: String,
    /// Echo of the running session's criteria, sent when a session resumes.
    #[serde(default)]
    pub params: Option<FilterPayload>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AutoScanResult {
    #[serde(default)]
    pub message: String,
    /// Opaque tag; a newer line with the same tag replaces the older one.
    #[serde(default, deserialize_with = "lenient_text")]
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AutoScanError {
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AutoScanStopped {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AutoScanHeartbeat {
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Every application-level event the server pushes.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    MatchFound(MatchResult),
    ScanProgress(ScanProgress),
    TimeframeMatch(Timeframe, MatchResult),
    TimeframeProgress(Timeframe, ScanProgress),
    TimeframeCompleted(Timeframe, ScanCompleted),
    AutoScanStarted(AutoScanStarted),
    AutoScanResult(AutoScanResult),
    AutoScanError(AutoScanError),
    AutoScanStopped(AutoScanStopped),
    AutoScanHeartbeat(AutoScanHeartbeat),
}

impl ServerEvent {
    pub fn decode(name: &str, payload: Value) -> Result<Self, ProtocolError> {
        let event = match name {
            MATCH_FOUND => Self::MatchFound(parse(name, payload)?),
            SCAN_PROGRESS => Self::ScanProgress(parse(name, payload)?),
            AUTO_SCAN_STARTED => Self::AutoScanStarted(parse(name, payload)?),
            AUTO_SCAN_RESULT => Self::AutoScanResult(parse(name, payload)?),
            AUTO_SCAN_ERROR => Self::AutoScanError(parse(name, payload)?),
            AUTO_SCAN_STOPPED => Self::AutoScanStopped(parse(name, payload)?),
            AUTO_SCAN_HEARTBEAT => Self::AutoScanHeartbeat(parse(name, payload)?),
            _ => {
                let (prefix, tf) = split_timeframe_suffix(name)
                    .ok_or_else(|| ProtocolError::UnknownEvent(name.to_string()))?;
                match prefix {
                    MATCH_FOUND => Self::TimeframeMatch(tf, parse(name, payload)?),
                    SCAN_PROGRESS => Self::TimeframeProgress(tf, parse(name, payload)?),
                    SCAN_COMPLETED => Self::TimeframeCompleted(tf, parse(name, payload)?),
                    _ => return Err(ProtocolError::UnknownEvent(name.to_string())),
                }
            }
        };
        Ok(event)
    }
}

/// Names every transport subscribes to when a session opens.
pub fn subscribed_event_names() -> Vec<String> {
    let mut names: Vec<String> = [
        MATCH_FOUND,
        SCAN_PROGRESS,
        AUTO_SCAN_STARTED,
        AUTO_SCAN_RESULT,
        AUTO_SCAN_ERROR,
        AUTO_SCAN_STOPPED,
        AUTO_SCAN_HEARTBEAT,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for tf in Timeframe::iter() {
        for prefix in [SCAN_COMPLETED, SCAN_PROGRESS, MATCH_FOUND] {
            names.push(format!("{}_{}", prefix, tf.label()));
        }
    }
    names
}

/// Commands the client sends over the realtime channel.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCommand {
    StartAutoScan(FilterPayload),
    StopAutoScan,
}

impl OutboundCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartAutoScan(_) => START_AUTO_SCAN,
            Self::StopAutoScan => STOP_AUTO_SCAN,
        }
    }

    /// `None` for argument-less commands.
    pub fn payload(&self) -> Option<Value> {
        match self {
            Self::StartAutoScan(p) => serde_json::to_value(p).ok(),
            Self::StopAutoScan => None,
        }
    }
}

fn split_timeframe_suffix(name: &str) -> Option<(&str, Timeframe)> {
    let (prefix, label) = name.rsplit_once('_')?;
    Some((prefix, Timeframe::from_label(label)?))
}

fn parse<T: DeserializeOwned>(name: &str, payload: Value) -> Result<T, ProtocolError> {
    // Some emitters send no argument at all.
    let payload = if payload.is_null() {
        Value::Object(Default::default())
    } else {
        payload
    };
    serde_json::from_value(payload).map_err(|source| ProtocolError::Payload {
        event: name.to_string(),
        source,
    })
}

/// Accepts `"30"`, `30`, `1.5` or `null`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterId;
    use serde_json::json;

    #[test]
    fn timeframe_events_decode_with_their_bucket() {
        let ev = ServerEvent::decode(
            "scan_progress_15",
            json!({"current": 10, "total": 200, "percentage": 5.0}),
        )
        .unwrap();
        assert_eq!(
            ev,
            ServerEvent::TimeframeProgress(
                Timeframe::M15,
                ScanProgress {
                    current: 10,
                    total: 200,
                    percentage: 5.0
                }
            )
        );

        let ev = ServerEvent::decode(
            "scan_completed_3",
            json!({"total_matches": 4, "timeframe": "3"}),
        )
        .unwrap();
        assert!(matches!(ev, ServerEvent::TimeframeCompleted(Timeframe::M3, ref c) if c.total_matches == 4));

        let ev = ServerEvent::decode("match_found_30", json!({"symbol": "BTCUSDT", "volume": 1.0}))
            .unwrap();
        assert!(matches!(ev, ServerEvent::TimeframeMatch(Timeframe::M30, ref r) if r.symbol == "BTCUSDT"));
    }

    #[test]
    fn plain_events_are_not_mistaken_for_timeframe_ones() {
        let ev = ServerEvent::decode("match_found", json!({"symbol": "ETHUSDT"})).unwrap();
        assert!(matches!(ev, ServerEvent::MatchFound(_)));
        let ev = ServerEvent::decode("auto_scan_heartbeat", Value::Null).unwrap();
        assert!(matches!(ev, ServerEvent::AutoScanHeartbeat(_)));
    }

    #[test]
    fn unknown_names_and_buckets_are_rejected() {
        assert!(matches!(
            ServerEvent::decode("scan_progress_7", json!({})),
            Err(ProtocolError::UnknownEvent(_))
        ));
        assert!(matches!(
            ServerEvent::decode("something_else", json!({})),
            Err(ProtocolError::UnknownEvent(_))
        ));
        assert!(matches!(
            ServerEvent::decode("match_found", json!({"rsi": 3})),
            Err(ProtocolError::Payload { .. })
        ));
    }

    #[test]
    fn every_subscribed_name_decodes() {
        let names = subscribed_event_names();
        assert_eq!(names.len(), 7 + 6 * 3);
        for name in names {
            let payload = if name.starts_with(MATCH_FOUND) {
                json!({"symbol": "BTCUSDT"})
            } else {
                json!({})
            };
            assert!(ServerEvent::decode(&name, payload).is_ok(), "{}", name);
        }
    }

    #[test]
    fn auto_scan_result_keeps_any_timeframe_tag() {
        for (tag, expected) in [
            (json!("240"), Some("240")),
            (json!("5m"), Some("5m")),
            (json!(15), Some("15")),
            (Value::Null, None),
        ] {
            let ev = ServerEvent::decode(
                AUTO_SCAN_RESULT,
                json!({"message": "4h: 2 coin", "timeframe": tag}),
            )
            .unwrap();
            match ev {
                ServerEvent::AutoScanResult(r) => {
                    assert_eq!(r.message, "4h: 2 coin");
                    assert_eq!(r.timeframe.as_deref(), expected);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn payload_uses_server_field_names() {
        let mut states = FilterStates::new();
        states.insert(FilterId::Rsi1, true);
        let payload = FilterPayload {
            rsi1: Some("30".into()),
            times: vec![Timeframe::M5, Timeframe::M1],
            closing_scan: Some(false),
            filter_states: states,
            ..Default::default()
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["rsi1"], "30");
        assert_eq!(v["rsi2"], Value::Null);
        assert_eq!(v["comparison"], "≥");
        assert_eq!(v["times"], json!(["5", "1"]));
        assert_eq!(v["closingScan"], false);
        assert_eq!(v["coinList"], Value::Null);
        assert_eq!(v["filterStates"]["rsi1"], true);

        let auto = FilterPayload {
            closing_scan: None,
            ..payload
        };
        let v = serde_json::to_value(&auto).unwrap();
        assert!(v.get("closingScan").is_none());
    }

    #[test]
    fn echoed_params_accept_numbers_for_values() {
        let started: AutoScanStarted = serde_json::from_value(json!({
            "message": "Otomatik tarama devam ediyor",
            "params": {"rsi1": 25, "hacim": "2.0", "times": [1, "5"], "comparison": "≤"}
        }))
        .unwrap();
        let params = started.params.unwrap();
        assert_eq!(params.rsi1.as_deref(), Some("25"));
        assert_eq!(params.hacim.as_deref(), Some("2.0"));
        assert_eq!(params.times, vec![Timeframe::M1, Timeframe::M5]);
        assert_eq!(params.comparison, Comparison::AtMost);
    }

    #[test]
    fn stop_command_has_no_argument() {
        assert_eq!(OutboundCommand::StopAutoScan.name(), "stop_auto_scan");
        assert!(OutboundCommand::StopAutoScan.payload().is_none());
    }
}
