//! What the results area shows: the single-stream table, one table and
//! progress bar per timeframe, and the console log.

use {
    crate::{
        config::{DF, SCAN},
        domain::{MatchResult, ResultColumn, ScanProgress, Timeframe},
        utils::{AppInstant, ms},
    },
    std::collections::{BTreeSet, VecDeque},
};

/// A table whose columns were fixed by its first row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    columns: Vec<ResultColumn>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new(first: &MatchResult) -> Self {
        Self {
            columns: ResultColumn::for_result(first),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, result: &MatchResult) {
        let row = self.columns.iter().map(|c| c.cell(result)).collect();
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[ResultColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeProgress {
    pub timeframe: Timeframe,
    pub progress: ScanProgress,
    /// Set once the bar hit 100%.
    pub remove_at: Option<AppInstant>,
}

#[derive(Debug, Clone, Default)]
pub struct ResultsBoard {
    single_table: Option<ResultTable>,
    single_progress: Option<ScanProgress>,
    /// Timeframes whose per-timeframe events are rendered. Grows with every
    /// one-shot scan and is never narrowed.
    listening: BTreeSet<Timeframe>,
    /// In creation order.
    tables: Vec<(Timeframe, ResultTable)>,
    /// Newest bar first.
    progress: Vec<TimeframeProgress>,
    multi_area_open: bool,
}

impl ResultsBoard {
    pub fn single_table(&self) -> Option<&ResultTable> {
        self.single_table.as_ref()
    }

    pub fn single_progress(&self) -> Option<&ScanProgress> {
        self.single_progress.as_ref()
    }

    pub fn tables(&self) -> &[(Timeframe, ResultTable)] {
        &self.tables
    }

    pub fn table(&self, tf: Timeframe) -> Option<&ResultTable> {
        self.tables.iter().find(|(t, _)| *t == tf).map(|(_, table)| table)
    }

    pub fn progress_bars(&self) -> &[TimeframeProgress] {
        &self.progress
    }

    pub fn progress_for(&self, tf: Timeframe) -> Option<&TimeframeProgress> {
        self.progress.iter().find(|p| p.timeframe == tf)
    }

    pub fn is_listening(&self, tf: Timeframe) -> bool {
        self.listening.contains(&tf)
    }

    /// Whether the multi-timeframe area (and its clear button) is shown.
    pub fn multi_area_open(&self) -> bool {
        self.multi_area_open
    }

    pub fn add_single_match(&mut self, result: &MatchResult) {
        self.single_table
            .get_or_insert_with(|| ResultTable::new(result))
            .push(result);
    }

    pub fn set_single_progress(&mut self, progress: ScanProgress) {
        self.single_progress = Some(progress);
    }

    /// Empties the per-timeframe area for a new scan and starts rendering
    /// events for `times`.
    pub fn begin_multi_scan(&mut self, times: &[Timeframe]) {
        self.tables.clear();
        self.progress.clear();
        self.listening.extend(times.iter().copied());
        self.multi_area_open = true;
        self.single_progress = Some(ScanProgress::default());
    }

    /// Appends to the timeframe's table, creating it from this result's keys
    /// on first use. Returns `false` for timeframes nobody scanned.
    pub fn add_timeframe_match(&mut self, tf: Timeframe, result: &MatchResult) -> bool {
        if !self.is_listening(tf) {
            return false;
        }
        match self.tables.iter_mut().find(|(t, _)| *t == tf) {
            Some((_, table)) => table.push(result),
            None => {
                let mut table = ResultTable::new(result);
                table.push(result);
                self.tables.push((tf, table));
            }
        }
        if DF.log_results {
            log::info!("[{} dk] match {}", tf, result.symbol);
        }
        true
    }

    pub fn update_timeframe_progress(
        &mut self,
        tf: Timeframe,
        progress: ScanProgress,
        now: AppInstant,
    ) -> bool {
        if !self.is_listening(tf) {
            return false;
        }
        let idx = match self.progress.iter().position(|p| p.timeframe == tf) {
            Some(idx) => idx,
            None => {
                self.progress.insert(
                    0,
                    TimeframeProgress {
                        timeframe: tf,
                        progress: ScanProgress::default(),
                        remove_at: None,
                    },
                );
                0
            }
        };
        let bar = &mut self.progress[idx];
        bar.progress = progress;
        if !progress.is_finished() {
            // A new round started before the finished bar was removed.
            bar.remove_at = None;
        } else if bar.remove_at.is_none() {
            bar.remove_at = Some(now + ms(SCAN.progress_linger_ms));
        }
        true
    }

    pub fn clear_single(&mut self) {
        self.single_table = None;
        self.single_progress = None;
    }

    pub fn clear_multi(&mut self) {
        self.tables.clear();
        self.progress.clear();
        self.multi_area_open = false;
    }

    /// Drops finished progress bars whose linger time ran out.
    pub fn expire(&mut self, now: AppInstant) {
        self.progress
            .retain(|p| p.remove_at.is_none_or(|at| now < at));
    }

    pub fn next_deadline(&self) -> Option<AppInstant> {
        self.progress.iter().filter_map(|p| p.remove_at).min()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleLine {
    pub text: String,
    pub tag: Option<String>,
}

/// Scrolling log of auto-scan output.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    lines: VecDeque<ConsoleLine>,
    visible: bool,
    max_lines: usize,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self {
            lines: VecDeque::new(),
            visible: false,
            max_lines: SCAN.console_max_lines,
        }
    }
}

impl ConsoleLog {
    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Appends a line and reveals the console. A tagged line replaces the
    /// previous line carrying the same tag.
    pub fn append(&mut self, text: impl Into<String>, tag: Option<String>) {
        self.visible = true;
        if let Some(tag) = &tag {
            self.lines.retain(|l| l.tag.as_ref() != Some(tag));
        }
        self.lines.push_back(ConsoleLine {
            text: text.into(),
            tag,
        });
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn reset_with(&mut self, text: impl Into<String>) {
        self.clear();
        self.append(text, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(v: serde_json::Value) -> MatchResult {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn table_is_created_lazily_from_first_result() {
        let mut board = ResultsBoard::default();
        assert!(board.single_table().is_none());
        board.add_single_match(&result(json!({"symbol": "BTCUSDT", "rsi": 25.5})));
        board.add_single_match(&result(json!({"symbol": "ETHUSDT", "rsi": 28, "volume": 10})));

        let table = board.single_table().unwrap();
        assert_eq!(table.columns(), [ResultColumn::Symbol, ResultColumn::Rsi]);
        assert_eq!(table.rows()[1], vec!["ETHUSDT".to_string(), "28".to_string()]);
    }

    #[test]
    fn timeframe_tables_are_independent_and_gated_by_listening() {
        let mut board = ResultsBoard::default();
        let r = result(json!({"symbol": "BTCUSDT", "volume": 1500.0}));
        assert!(!board.add_timeframe_match(Timeframe::M5, &r));

        board.begin_multi_scan(&[Timeframe::M5, Timeframe::M15]);
        assert!(board.add_timeframe_match(Timeframe::M15, &r));
        assert!(board.add_timeframe_match(Timeframe::M5, &r));
        assert!(board.add_timeframe_match(Timeframe::M5, &r));
        assert!(!board.add_timeframe_match(Timeframe::M1, &r));

        assert_eq!(board.table(Timeframe::M5).unwrap().len(), 2);
        assert_eq!(board.table(Timeframe::M15).unwrap().len(), 1);
        assert_eq!(board.tables()[0].0, Timeframe::M15);
    }

    #[test]
    fn finished_progress_bar_lingers_two_seconds() {
        let mut board = ResultsBoard::default();
        let now = AppInstant::now();
        board.begin_multi_scan(&[Timeframe::M1, Timeframe::M3]);
        board.update_timeframe_progress(
            Timeframe::M1,
            ScanProgress {
                current: 5,
                total: 10,
                percentage: 50.0,
            },
            now,
        );
        board.update_timeframe_progress(Timeframe::M3, ScanProgress::finished(), now);
        // Newest first.
        assert_eq!(board.progress_bars()[0].timeframe, Timeframe::M3);

        board.expire(now + ms(1_999));
        assert!(board.progress_for(Timeframe::M3).is_some());
        assert_eq!(board.next_deadline(), Some(now + ms(2_000)));

        board.expire(now + ms(2_000));
        assert!(board.progress_for(Timeframe::M3).is_none());
        assert!(board.progress_for(Timeframe::M1).is_some());
    }

    #[test]
    fn next_round_keeps_a_bar_that_was_about_to_expire() {
        let mut board = ResultsBoard::default();
        let now = AppInstant::now();
        board.begin_multi_scan(&[Timeframe::M5]);
        board.update_timeframe_progress(Timeframe::M5, ScanProgress::finished(), now);

        let restarted = ScanProgress {
            current: 1,
            total: 50,
            percentage: 2.0,
        };
        board.update_timeframe_progress(Timeframe::M5, restarted, now + ms(500));
        assert_eq!(board.next_deadline(), None);

        board.expire(now + ms(5_000));
        let bar = board.progress_for(Timeframe::M5).unwrap();
        assert_eq!(bar.progress, restarted);
        assert_eq!(bar.remove_at, None);

        // Finishing again starts a fresh linger.
        board.update_timeframe_progress(Timeframe::M5, ScanProgress::finished(), now + ms(6_000));
        assert_eq!(board.next_deadline(), Some(now + ms(8_000)));
    }

    #[test]
    fn new_scan_resets_the_multi_area_but_keeps_old_listeners() {
        let mut board = ResultsBoard::default();
        let r = result(json!({"symbol": "BTCUSDT"}));
        board.begin_multi_scan(&[Timeframe::M5]);
        board.add_timeframe_match(Timeframe::M5, &r);
        board.begin_multi_scan(&[Timeframe::M1]);
        assert!(board.tables().is_empty());
        assert!(board.is_listening(Timeframe::M5));
        assert!(board.is_listening(Timeframe::M1));

        board.clear_multi();
        assert!(!board.multi_area_open());
    }

    #[test]
    fn console_replaces_lines_of_the_same_timeframe() {
        let mut console = ConsoleLog::default();
        assert!(!console.is_visible());
        console.append("start", None);
        console.append("5m: 3 coins", Some("5".into()));
        console.append("15m: 1 coin", Some("15".into()));
        console.append("4h: 2 coins", Some("240".into()));
        console.append("5m: 4 coins", Some("5".into()));
        console.append("4h: 0 coins", Some("240".into()));

        let texts: Vec<_> = console.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["start", "15m: 1 coin", "5m: 4 coins", "4h: 0 coins"]);
        assert!(console.is_visible());
    }

    #[test]
    fn console_is_bounded() {
        let mut console = ConsoleLog::default();
        for i in 0..(SCAN.console_max_lines + 10) {
            console.append(format!("line {}", i), None);
        }
        assert_eq!(console.len(), SCAN.console_max_lines);
        assert_eq!(console.lines().next().unwrap().text, "line 10");
    }
}
