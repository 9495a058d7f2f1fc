//! The standings board: class-filtered order with gap and interval columns.
//!
//! Gaps come from accumulated race time in the results block, which lags the
//! track by up to a lap. The lap-difference correction below decides between
//! showing seconds and showing laps down when a car sits close to a lap
//! boundary of the leader.

use tracing::debug;

use super::context::SessionContext;
use super::format::{lap_time, laps_down};
use super::registry::{DriverRecord, DriverRegistry};
use crate::SessionInfo;
use crate::config::StandingsSettings;
use crate::types::{SessionState, TelemetrySnapshot};

/// Name abbreviations always end in `, X`.
const ABBREV_SUFFIX_LEN: usize = 3;

/// Which block orders the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    /// Live results, by class position
    Results,
    /// Qualifying results, by qualifying position
    Qualifying,
}

impl Ranking {
    /// Results in races and qualifying sessions, or when no qualifying block
    /// exists; qualifying order otherwise (practice after qualifying).
    pub fn select(race: bool, context: &SessionContext, session: &SessionInfo) -> Self {
        if race || context.is_qualifying() || session.qualify_results_info.is_none() {
            Ranking::Results
        } else {
            Ranking::Qualifying
        }
    }
}

/// Gap or interval text for one pair of cars.
///
/// `raw` is the accumulated time difference, `lap_diff` how many more laps the
/// reference car has completed, `laps_complete` the laps of the car itself and
/// `reference_lap` the leader's last lap time.
pub fn gap_label(
    raw: f64,
    lap_diff: i32,
    laps_complete: i32,
    reference_lap: Option<f64>,
    before_checkered: bool,
) -> String {
    let mut label = String::new();
    if raw >= 0.0 && laps_complete != 0 {
        if lap_diff <= 0 || (lap_diff == 1 && reference_lap.is_none_or(|lap| raw < lap)) {
            label = format!("{raw:.1}");
        } else if before_checkered
            && lap_diff > 0
            && reference_lap.is_some_and(|lap| (raw / lap).ceil() == f64::from(lap_diff))
        {
            label = laps_down(lap_diff - 1);
        } else if lap_diff > 0 {
            label = laps_down(lap_diff);
        }
    }
    if label.is_empty() && lap_diff > 1 {
        label = laps_down(lap_diff);
    }
    label
}

/// Keep at most `max_rows` rows with the viewed row visible.
///
/// Past the head segment the board becomes: head, one separator, then
/// `window` rows around the viewed row. The head shrinks by the window rows
/// that would fall past the end of the list.
pub fn window_rows(
    mut rows: Vec<String>,
    viewed: Option<usize>,
    max_rows: usize,
    window: usize,
    separator: String,
) -> Vec<String> {
    if rows.len() <= max_rows {
        return rows;
    }
    let half = window / 2;
    let Some(viewed) = viewed.filter(|&i| i >= max_rows.saturating_sub(half)) else {
        rows.truncate(max_rows);
        return rows;
    };

    let window_start = viewed.saturating_sub(half);
    let window_end = (viewed + window.div_ceil(2)).min(rows.len());
    let overflow = (viewed + window.div_ceil(2)).saturating_sub(rows.len());
    let head_len = (max_rows + overflow).saturating_sub(1 + window).min(window_start);

    let mut board = Vec::with_capacity(max_rows);
    board.extend(rows[..head_len].iter().cloned());
    board.push(separator);
    board.extend(rows.drain(window_start..window_end));
    board
}

/// Render the standings board.
pub fn render(
    registry: &DriverRegistry,
    context: &SessionContext,
    session: &SessionInfo,
    snapshot: &TelemetrySnapshot,
    layout: &StandingsSettings,
) -> String {
    let race = context.is_race() && snapshot.session_state >= SessionState::Racing;
    let ranking = Ranking::select(race, context, session);
    let cam = snapshot.cam_car_idx;

    let class_id = registry.get(cam).map(|record| record.driver.car_class_id);
    let mut entries: Vec<&DriverRecord> = registry
        .iter()
        .filter(|record| class_id.is_none_or(|class| record.driver.car_class_id == class))
        .filter(|record| match ranking {
            Ranking::Results => record.position.is_some(),
            Ranking::Qualifying => record.qualifying.is_some(),
        })
        .collect();
    match ranking {
        Ranking::Results => entries.sort_by_key(|record| record.class_position),
        Ranking::Qualifying => {
            entries.sort_by_key(|record| record.qualifying.as_ref().map_or(i32::MAX, |q| q.position))
        }
    }
    if entries.is_empty() {
        return String::new();
    }

    let timings: Vec<String> = match ranking {
        Ranking::Results if race => race_timings(&entries, snapshot),
        Ranking::Results => entries
            .iter()
            .map(|record| {
                record.position.as_ref().and_then(|p| p.fastest_lap_time()).map(lap_time).unwrap_or_default()
            })
            .collect(),
        Ranking::Qualifying => entries
            .iter()
            .map(|record| {
                record.qualifying.as_ref().and_then(|q| q.qualifying_time()).map(lap_time).unwrap_or_default()
            })
            .collect(),
    };

    let name_width = entries
        .iter()
        .map(|record| record.driver.display_abbrev().chars().count())
        .max()
        .unwrap_or(0)
        .saturating_sub(ABBREV_SUFFIX_LEN);
    let header = if race {
        format!("{:>4} {:>3} {} {:>5} {:>5}", "Pos", "#", " ".repeat(name_width), "Gap", "Int")
    } else {
        format!("{:>4} {:>3} {} {:>8}", "Pos", "#", " ".repeat(name_width), "Lap Time")
    };

    let mut viewed = None;
    let rows: Vec<String> = entries
        .iter()
        .zip(&timings)
        .enumerate()
        .map(|(i, (record, timing))| {
            let marker = if record.car_idx == cam {
                viewed = Some(i);
                layout.right_arrow.as_str()
            } else {
                ""
            };
            let pos = match ranking {
                Ranking::Results => i64::from(record.class_position),
                Ranking::Qualifying => record.qualifying.as_ref().map_or(0, |q| i64::from(q.position) + 1),
            };
            let abbrev = record.driver.display_abbrev();
            let name = abbrev.rsplit_once(',').map_or(abbrev, |(surname, _)| surname);
            format!(
                "{marker:1}{pos:3} {number:>3} {name:<name_width$} {timing}",
                number = record.driver.car_number.as_deref().unwrap_or(""),
            )
        })
        .collect();

    let total = rows.len();
    let separator = layout.horizontal_bar.repeat(header.chars().count());
    let board = window_rows(rows, viewed, layout.max, layout.window, separator);
    debug!(rows = total, shown = board.len(), ?ranking, race, "Standings rendered");

    let mut text = header;
    for row in board {
        text.push('\n');
        text.push_str(&row);
    }
    text
}

/// Gap and interval columns for a results-ordered race board.
fn race_timings(entries: &[&DriverRecord], snapshot: &TelemetrySnapshot) -> Vec<String> {
    let before_checkered = snapshot.session_state < SessionState::Checkered;
    let Some(leader) = entries.first().and_then(|record| record.position.as_ref()) else {
        return Vec::new();
    };
    let reference_lap = leader.last_lap();

    let mut timings = Vec::with_capacity(entries.len());
    for (i, record) in entries.iter().enumerate() {
        let Some(me) = record.position.as_ref() else {
            timings.push(String::new());
            continue;
        };
        let in_pit = snapshot.on_pit_road(me.car_idx);
        if i == 0 {
            let laps = if in_pit { "PIT".to_string() } else { me.laps_complete.to_string() };
            timings.push(format!("{:>5} {:>5}", "LAP", laps));
            continue;
        }

        let ahead = entries[i - 1].position.as_ref().unwrap_or(leader);
        let gap = gap_label(
            me.time - leader.time,
            leader.laps_complete - me.laps_complete,
            me.laps_complete,
            reference_lap,
            before_checkered,
        );
        let interval = if in_pit {
            "PIT".to_string()
        } else {
            gap_label(
                me.time - ahead.time,
                ahead.laps_complete - me.laps_complete,
                me.laps_complete,
                reference_lap,
                before_checkered,
            )
        };
        timings.push(format!("{gap:>5} {interval:>5}"));
    }
    timings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SessionBuilder, SnapshotBuilder, entry};

    fn rows(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("row {i}")).collect()
    }

    #[test]
    fn same_lap_gap_is_seconds() {
        assert_eq!(gap_label(95.3 - 90.0, 0, 3, Some(70.0), true), "5.3");
        assert_eq!(gap_label(0.04, 0, 1, None, true), "0.0");
    }

    #[test]
    fn lap_boundary_regression() {
        // 105 s behind with one lap fewer, leader laps in 70 s: ceil(1.5) = 2
        // does not match the lap difference, so the car is a lap down.
        assert_eq!(gap_label(105.0, 1, 3, Some(70.0), true), "   1L");
    }

    #[test]
    fn catching_up_to_the_apparent_lap_difference() {
        // two laps fewer but within two leader laps: only one lap down
        assert_eq!(gap_label(120.0, 2, 5, Some(70.0), true), "   1L");
        // after the checkered flag the raw lap difference stands
        assert_eq!(gap_label(120.0, 2, 5, Some(70.0), false), "   2L");
    }

    #[test]
    fn about_to_be_lapped_shows_seconds() {
        assert_eq!(gap_label(65.0, 1, 3, Some(70.0), true), "65.0");
        assert_eq!(gap_label(85.0, 1, 3, None, true), "85.0");
    }

    #[test]
    fn large_deficits_are_never_blank() {
        assert_eq!(gap_label(-4.0, 3, 3, Some(70.0), true), "   3L");
        assert_eq!(gap_label(400.0, 4, 0, Some(70.0), true), "   4L");
        assert_eq!(gap_label(-4.0, 1, 3, Some(70.0), true), "");
        assert_eq!(gap_label(10.0, 0, 0, Some(70.0), true), "");
    }

    #[test]
    fn window_keeps_small_boards_whole() {
        assert_eq!(window_rows(rows(10), Some(9), 15, 6, "-".into()), rows(10));
    }

    #[test]
    fn window_truncates_when_viewed_is_near_the_top() {
        let board = window_rows(rows(20), Some(10), 15, 6, "-".into());
        assert_eq!(board, rows(15));
        let board = window_rows(rows(20), None, 15, 6, "-".into());
        assert_eq!(board.len(), 15);
    }

    #[test]
    fn window_centres_on_the_viewed_row() {
        let board = window_rows(rows(30), Some(20), 15, 6, "-".into());
        assert_eq!(board.len(), 15);
        assert_eq!(&board[..8], &rows(8)[..]);
        assert_eq!(board[8], "-");
        assert_eq!(board[9], "row 17");
        assert_eq!(board[14], "row 22");
        assert!(board.contains(&"row 20".to_string()));
    }

    #[test]
    fn window_at_the_end_lengthens_the_head() {
        let board = window_rows(rows(20), Some(19), 15, 6, "-".into());
        assert_eq!(board.len(), 15);
        assert_eq!(board[10], "-");
        assert_eq!(board.last().map(String::as_str), Some("row 19"));
        assert_eq!(board[11], "row 16");
    }

    #[test]
    fn window_bounds_hold_for_every_position() {
        for len in 16..40 {
            for viewed in 0..len {
                let board = window_rows(rows(len), Some(viewed), 15, 6, "-".into());
                assert!(board.len() <= 15, "len {len} viewed {viewed}");
                assert!(board.contains(&format!("row {viewed}")), "len {len} viewed {viewed}");
            }
        }
    }

    fn race_field() -> crate::SessionInfo {
        race_field_builder().build()
    }

    fn race_field_builder() -> SessionBuilder {
        SessionBuilder::race()
            .driver(entry(0, "Ana Lopes", 11))
            .driver(entry(1, "Ben Okafor", 11))
            .driver(entry(2, "Chloe Martin", 11))
            .driver(entry(3, "Dev Patel", 22))
            .result_with_laps(0, 0, 270.0, 3, 90.0)
            .result_with_laps(1, 1, 275.3, 3, 90.5)
            .result_with_laps(2, 2, 290.0, 2, 95.0)
            .result_with_laps(3, 0, 280.0, 3, 92.0)
    }

    fn board(session: &crate::SessionInfo, snapshot: &TelemetrySnapshot) -> Vec<String> {
        let mut registry = DriverRegistry::new();
        registry.merge(session, snapshot.session_num);
        let context = SessionContext::derive(session, snapshot.session_num, &Default::default())
            .unwrap()
            .unwrap();
        let text = render(&registry, &context, session, snapshot, &StandingsSettings::default());
        text.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn race_board_with_gaps_and_intervals() {
        let session = race_field();
        let mut snapshot = SnapshotBuilder::new(4).race_session(2).camera(1).build();
        snapshot.car_idx_on_pit_road[2] = true;
        let lines = board(&session, &snapshot);

        // "Okafor, B" is the longest abbreviation: 9 - 3 = 6
        assert_eq!(lines[0], format!("{:>4} {:>3} {} {:>5} {:>5}", "Pos", "#", " ".repeat(6), "Gap", "Int"));
        assert_eq!(lines.len(), 4, "other class filtered out: {lines:?}");
        assert_eq!(lines[1], format!(" {:>3} {:>3} {:<6} {:>5} {:>5}", 1, "1", "Lopes", "LAP", 3));
        assert_eq!(lines[2], format!("►{:>3} {:>3} {:<6} {:>5} {:>5}", 2, "2", "Okafor", "5.3", "5.3"));
        assert_eq!(lines[3], format!(" {:>3} {:>3} {:<6} {:>5} {:>5}", 3, "3", "Martin", "20.0", "PIT"));
    }

    #[test]
    fn pre_race_board_shows_lap_times() {
        let session = race_field();
        let snapshot = SnapshotBuilder::new(4).session(2, SessionState::ParadeLaps).camera(3).build();
        let lines = board(&session, &snapshot);
        assert!(lines[0].ends_with("Lap Time"));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("►  1"));
        assert!(lines[1].ends_with("1:32.000"));
    }

    #[test]
    fn practice_after_qualifying_uses_qualifying_order() {
        let session = SessionBuilder::practice()
            .driver(entry(0, "Ana Lopes", 11))
            .driver(entry(1, "Ben Okafor", 11))
            .driver(entry(2, "Chloe Martin", 11))
            .qualifying(2, 0, 88.25)
            .qualifying(0, 1, 0.0)
            .build();
        let snapshot = SnapshotBuilder::new(3).session(0, SessionState::Racing).camera(9).build();
        let lines = board(&session, &snapshot);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Martin") && lines[1].ends_with("1:28.250"));
        assert!(lines[2].contains("Lopes"));
        assert!(lines[2].trim_end().ends_with("Lopes"));
        assert!(lines[2].starts_with("   2"));
    }

    /// Qualifying order reversed against the live results of `race_field`.
    fn with_grid(builder: SessionBuilder) -> crate::SessionInfo {
        builder.qualifying(2, 0, 88.25).qualifying(1, 1, 89.0).qualifying(0, 2, 89.5).build()
    }

    #[test]
    fn qualifying_session_orders_by_live_results() {
        let session = with_grid(
            SessionBuilder::lone_qualify()
                .driver(entry(0, "Ana Lopes", 11))
                .driver(entry(1, "Ben Okafor", 11))
                .result_with_laps(0, 0, 0.0, 1, 91.0)
                .result_with_laps(1, 1, 0.0, 1, 91.5),
        );
        let snapshot = SnapshotBuilder::new(3).session(1, SessionState::Racing).camera(1).build();
        let lines = board(&session, &snapshot);
        assert!(lines[0].ends_with("Lap Time"));
        assert_eq!(lines.len(), 3, "{lines:?}");
        assert!(lines[1].starts_with("   1") && lines[1].contains("Lopes") && lines[1].ends_with("1:31.000"));
        assert!(lines[2].starts_with("►  2") && lines[2].contains("Okafor") && lines[2].ends_with("1:31.500"));
    }

    #[test]
    fn grid_before_the_green_flag_follows_qualifying() {
        let session = with_grid(race_field_builder());
        let snapshot = SnapshotBuilder::new(4).session(2, SessionState::ParadeLaps).camera(0).build();
        let lines = board(&session, &snapshot);
        assert!(lines[0].ends_with("Lap Time"));
        assert_eq!(lines.len(), 4, "{lines:?}");
        assert!(lines[1].starts_with("   1") && lines[1].contains("Martin") && lines[1].ends_with("1:28.250"));
        assert!(lines[2].starts_with("   2") && lines[2].contains("Okafor") && lines[2].ends_with("1:29.000"));
        assert!(lines[3].starts_with("►  3") && lines[3].contains("Lopes") && lines[3].ends_with("1:29.500"));
    }

    #[test]
    fn green_flag_switches_the_grid_to_live_results() {
        let session = with_grid(race_field_builder());
        let snapshot = SnapshotBuilder::new(4).race_session(2).camera(1).build();
        let lines = board(&session, &snapshot);
        assert!(lines[0].ends_with("  Gap   Int"));
        assert_eq!(lines.len(), 4, "{lines:?}");
        assert_eq!(lines[1], format!(" {:>3} {:>3} {:<6} {:>5} {:>5}", 1, "1", "Lopes", "LAP", 3));
        assert_eq!(lines[2], format!("►{:>3} {:>3} {:<6} {:>5} {:>5}", 2, "2", "Okafor", "5.3", "5.3"));
        assert_eq!(lines[3], format!(" {:>3} {:>3} {:<6} {:>5} {:>5}", 3, "3", "Martin", "20.0", "14.7"));
    }

    #[test]
    fn empty_board_renders_nothing() {
        let session = SessionBuilder::race().driver(entry(0, "Ana Lopes", 11)).build();
        let snapshot = SnapshotBuilder::new(1).race_session(2).camera(0).build();
        assert_eq!(board(&session, &snapshot), vec![String::new()]);
    }
}
