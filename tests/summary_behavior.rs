//! Behavior-driven tests for summaries and rendered alerts.
//!
//! These tests run the worked examples end to end: rows on disk, window
//! selection, statistics and the rendered message.

use aurum_core::{
    compose, DailyRecord, Direction, MessageFormatter, ReportSettings, SeriesStore, Summarizer,
    SummaryError, Trend, Window, WindowPolicy,
};
use aurum_store::CsvSeries;
use aurum_tests::date;

fn full(value: &str, open: f64, high: f64, low: f64, close: f64) -> DailyRecord {
    DailyRecord::new(date(value), Some(open), Some(high), Some(low), Some(close))
}

fn series_with(dir: &tempfile::TempDir, records: &[DailyRecord]) -> CsvSeries {
    let mut series = CsvSeries::new(dir.path().join("gold_ohlc_per_gram.csv"));
    for record in records {
        series.append(record).expect("append");
    }
    series
}

// =============================================================================
// Summary: Weekly
// =============================================================================

#[test]
fn when_two_days_close_lower_then_the_week_is_a_downtrend() {
    // Given: Monday 300/306/299/305 and Tuesday 305/307/297/298
    let dir = tempfile::tempdir().expect("tempdir");
    let series = series_with(
        &dir,
        &[
            full("2024-01-01", 300.0, 306.0, 299.0, 305.0),
            full("2024-01-02", 305.0, 307.0, 297.0, 298.0),
        ],
    );

    // When: The weekly summary is computed
    let window =
        aurum_core::select_window(&series, WindowPolicy::TrailingDays(7), date("2024-01-03"))
            .expect("window");
    let summary = Summarizer::default()
        .summarize_week(&window)
        .expect("summary");

    // Then: The statistics match the worked example
    assert_eq!(summary.trend, Trend::Downtrend);
    assert!((summary.percent_change + 0.666_666_7).abs() < 1e-6);
    assert_eq!(summary.highest.date, date("2024-01-02"));
    assert_eq!(summary.highest.price, 307.0);
    assert_eq!(summary.lowest.date, date("2024-01-02"));
    assert_eq!(summary.lowest.price, 297.0);
    assert_eq!((summary.up_days, summary.down_days), (1, 1));
}

#[test]
fn when_the_window_holds_one_day_then_the_week_reports_insufficient_data() {
    // Given: A single stored day
    let window = Window::from_bars(vec![full("2024-01-02", 1.0, 2.0, 0.5, 1.5)
        .complete()
        .expect("complete")]);

    // When: The weekly summary is computed and rendered
    let result = Summarizer::default().summarize_week(&window);

    // Then: It is insufficient and the notice text is fixed
    assert_eq!(result, Err(SummaryError::InsufficientData { found: 1 }));
    assert_eq!(
        MessageFormatter::default().insufficient_week(),
        "Not enough data for the week."
    );
}

// =============================================================================
// Summary: Live Comparison
// =============================================================================

#[test]
fn when_the_live_price_is_above_the_last_close_then_direction_is_up() {
    // Given: A stored close of 300 on Tuesday and an older close
    let dir = tempfile::tempdir().expect("tempdir");
    let series = series_with(
        &dir,
        &[
            full("2024-01-02", 295.0, 301.0, 294.0, 300.0),
            full("2023-12-29", 280.0, 290.0, 279.0, 285.0),
        ],
    );

    // When: A live price of 310 is compared
    let records = series.records().expect("records");
    let comparison = Summarizer::default()
        .summarize_day_vs_yesterday(310.0, &records)
        .expect("comparison");

    // Then: The baseline is the latest dated close
    assert_eq!(comparison.previous_date, date("2024-01-02"));
    assert!((comparison.change - 10.0).abs() < 1e-9);
    assert!((comparison.percent_change - 3.333_333_3).abs() < 1e-6);
    assert_eq!(comparison.direction, Direction::Up);
}

#[test]
fn when_the_latest_row_has_no_close_then_the_previous_close_is_used() {
    // Given: The newest row lacks a close
    let records = vec![
        full("2024-01-01", 1.0, 2.0, 0.5, 100.0),
        DailyRecord::new(date("2024-01-02"), Some(1.0), Some(2.0), Some(0.5), None),
    ];

    // When: A live price equal to the previous close is compared
    let comparison = Summarizer::default()
        .summarize_day_vs_yesterday(100.0, &records)
        .expect("comparison");

    // Then: The comparison falls back to the last usable close and is flat
    assert_eq!(comparison.previous_date, date("2024-01-01"));
    assert_eq!(comparison.direction, Direction::Flat);
}

// =============================================================================
// Summary: Report Assembly
// =============================================================================

#[test]
fn when_a_report_is_composed_then_each_message_is_rendered() {
    // Given: Two days on disk and a live price
    let dir = tempfile::tempdir().expect("tempdir");
    let series = series_with(
        &dir,
        &[
            full("2024-01-01", 300.0, 306.0, 299.0, 305.0),
            full("2024-01-02", 305.0, 307.0, 297.0, 298.0),
        ],
    );
    let settings = ReportSettings {
        window: WindowPolicy::SinceMostRecentMonday,
        summarizer: Summarizer::new(false),
        formatter: MessageFormatter::new("Gold", "MYR"),
    };

    // When: The report is composed on Wednesday
    let report = compose(&series, &settings, date("2024-01-03"), Some(310.0)).expect("report");

    // Then: Weekly, daily and live messages are all present
    assert!(report.weekly.contains("📉 Downtrend"));
    assert!(!report.weekly.contains("Avg Close"));
    assert!(report.day.contains("🔴 Bearish Day"));
    let live = report.live.expect("live message");
    assert!(live.contains("Change: +12.00 (+4.03%)"));
    assert!(live.contains("🟢 Up"));
}

#[test]
fn when_the_series_is_empty_then_every_message_is_a_notice() {
    // Given: No series file
    let dir = tempfile::tempdir().expect("tempdir");
    let series = CsvSeries::new(dir.path().join("series.csv"));

    // When: The report is composed with a live price
    let report = compose(&series, &ReportSettings::default(), date("2024-01-03"), Some(1.0))
        .expect("report");

    // Then: Each message degrades to its notice
    assert_eq!(report.weekly, "Not enough data for the week.");
    assert_eq!(report.day, "No data for today.");
    assert_eq!(
        report.live.as_deref(),
        Some("No stored prices to compare against.")
    );
}
