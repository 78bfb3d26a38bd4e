//! Output writers and human-readable summary for an analysis report

use crate::structs::{
    AggregateRow, AnalysisReport, Correlation, DayType, Relationship, RentalRecord, Result,
    ScatterPoint, Season, SelectionState, Weather,
};
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;

const X_LABEL: &str = "temperature";
const Y_LABEL: &str = "total rentals";

const RECORD_HEADER: [&str; 11] = [
    "date",
    "weekday",
    "season",
    "year",
    "month",
    "holiday",
    "working_day",
    "weather",
    "temperature",
    "count",
    "day_type",
];

/// `<category>: <count> rentals (<percent>%)`
#[must_use]
pub fn summary_line<K: Display>(row: &AggregateRow<K>) -> String {
    format!(
        "{}: {:.0} rentals ({:.1}%)",
        row.key, row.value, row.percentage
    )
}

/// Like `summary_line`, for groups holding a per-day average
#[must_use]
pub fn mean_line<K: Display>(row: &AggregateRow<K>) -> String {
    format!(
        "{}: {:.1} rentals/day over {} days",
        row.key, row.value, row.records
    )
}

/// Sentence shown when the selection left nothing to analyze
#[must_use]
pub fn nothing_selected_message(fields: &[String]) -> String {
    format!(
        "Please select at least one category ({}).",
        fields.join(", ")
    )
}

fn correlation_text(coefficient: Correlation) -> String {
    match coefficient {
        Correlation::Defined(r) => format!("{r:.2}"),
        Correlation::Undefined => "undefined".to_string(),
    }
}

/// Closing remarks drawn from the day-type split, the correlation, and the busiest season
#[must_use]
pub fn conclusions(report: &AnalysisReport) -> Vec<String> {
    let mut lines = Vec::new();

    let busiest = report
        .day_types
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value));
    if let Some(top) = busiest {
        let tied = report
            .day_types
            .iter()
            .filter(|r| r.value.total_cmp(&top.value).is_eq())
            .count();
        if report.day_types.len() < 2 {
            lines.push(format!("Only {} days are selected.", top.key));
        } else if tied > 1 {
            lines.push("Working and non-working days see the same number of rentals.".to_string());
        } else {
            lines.push(format!(
                "Most rentals fall on {} days ({:.1}% of the total).",
                top.key, top.percentage
            ));
        }
    }

    lines.push(
        match report.correlation.relationship {
            Relationship::Positive => "Rentals tend to rise as the temperature rises.",
            Relationship::Negative => "Rentals tend to fall as the temperature rises.",
            Relationship::None => "Temperature alone does not explain the number of rentals.",
        }
        .to_string(),
    );

    if let Some(peak) = report
        .seasons
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value))
    {
        lines.push(format!(
            "The {} season has the highest average ({:.1} rentals/day).",
            peak.key, peak.value
        ));
    }

    lines
}

/// Build the narrative `summary.txt` content
#[must_use]
pub fn build_summary(source: &str, report: &AnalysisReport) -> String {
    use std::fmt::Write as _;

    let mut s = String::from("Daily Bike Rental Analysis\n");
    let _ = writeln!(s, "Source: {source}");
    let _ = writeln!(
        s,
        "Records: {} loaded, {} selected",
        report.total_records,
        report.selected.len()
    );

    if let SelectionState::NothingSelected(fields) = &report.state {
        let _ = writeln!(s, "\n{}", nothing_selected_message(fields));
        return s;
    }

    s.push_str("\nRentals on working vs. non-working days\n");
    for row in &report.day_types {
        let _ = writeln!(s, "- {}", summary_line(row));
    }

    s.push_str("\nTemperature vs. rentals\n");
    let _ = writeln!(
        s,
        "Correlation: {}",
        correlation_text(report.correlation.coefficient)
    );
    let _ = writeln!(
        s,
        "{}",
        report.correlation.relationship.describe(X_LABEL, Y_LABEL)
    );

    s.push_str("\nAverage rentals by season\n");
    for row in &report.seasons {
        let _ = writeln!(s, "- {}", mean_line(row));
    }

    s.push_str("\nAverage rentals by weather\n");
    for row in &report.weather {
        let _ = writeln!(s, "- {}", mean_line(row));
    }

    s.push_str("\nConclusions\n");
    for line in conclusions(report) {
        let _ = writeln!(s, "- {line}");
    }

    s
}

/// Lines echoed to stdout after a run
#[must_use]
pub fn console_lines(report: &AnalysisReport) -> Vec<String> {
    if let SelectionState::NothingSelected(fields) = &report.state {
        return vec![nothing_selected_message(fields)];
    }

    let mut lines: Vec<String> = report.day_types.iter().map(summary_line).collect();
    lines.push(format!(
        "Correlation ({X_LABEL} vs {Y_LABEL}): {}",
        correlation_text(report.correlation.coefficient)
    ));
    lines.push(report.correlation.relationship.describe(X_LABEL, Y_LABEL));
    lines
}

/// Write `summary.txt`
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_summary(output_dir: &Path, content: &str) -> Result<()> {
    fs::write(output_dir.join("summary.txt"), content)?;
    Ok(())
}

fn write_rows<K: Display>(
    output_dir: &Path,
    filename: &str,
    header: [&str; 4],
    rows: &[AggregateRow<K>],
    value_precision: usize,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_dir.join(filename))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record([
            row.key.to_string(),
            row.records.to_string(),
            format!("{:.*}", value_precision, row.value),
            format!("{:.4}", row.percentage),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `day_types.csv` - rental totals and shares per day-type
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_day_types(output_dir: &Path, rows: &[AggregateRow<DayType>]) -> Result<()> {
    write_rows(
        output_dir,
        "day_types.csv",
        ["day_type", "records", "rentals", "percentage"],
        rows,
        0,
    )
}

/// Write `seasons.csv` - mean daily rentals per season
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_seasons(output_dir: &Path, rows: &[AggregateRow<Season>]) -> Result<()> {
    write_rows(
        output_dir,
        "seasons.csv",
        ["season", "records", "mean_rentals", "percentage"],
        rows,
        2,
    )
}

/// Write `weather.csv` - mean daily rentals per weather condition
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_weather(output_dir: &Path, rows: &[AggregateRow<Weather>]) -> Result<()> {
    write_rows(
        output_dir,
        "weather.csv",
        ["weather", "records", "mean_rentals", "percentage"],
        rows,
        2,
    )
}

/// Write `scatter.csv` - one (temperature, count) point per selected day
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_scatter(output_dir: &Path, report: &AnalysisReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_dir.join("scatter.csv"))?;
    for point in &report.scatter {
        writer.serialize(point)?;
    }
    if report.scatter.is_empty() {
        writer.write_record(["date", "temperature", "count"])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `records.csv` - the typed records that passed the filter
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_records(output_dir: &Path, records: &[&RentalRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_dir.join("records.csv"))?;
    for record in records {
        writer.serialize(record)?;
    }
    if records.is_empty() {
        writer.write_record(RECORD_HEADER)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `stats.json` - machine-readable report
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_stats_json(output_dir: &Path, source: &str, report: &AnalysisReport) -> Result<()> {
    let output = StatsOutput {
        source,
        total_records: report.total_records,
        selected_records: report.selected.len(),
        selection: &report.state,
        day_types: &report.day_types,
        seasons: &report.seasons,
        weather: &report.weather,
        correlation: CorrelationEntry {
            coefficient: report.correlation.coefficient.value(),
            relationship: report.correlation.relationship,
            interpretation: report.correlation.relationship.describe(X_LABEL, Y_LABEL),
        },
        scatter: &report.scatter,
        summary_lines: console_lines(report),
        conclusions: if matches!(report.state, SelectionState::NothingSelected(_)) {
            Vec::new()
        } else {
            conclusions(report)
        },
    };

    let json = serde_json::to_string_pretty(&output)?;
    fs::write(output_dir.join("stats.json"), json)?;
    Ok(())
}

/// Write every output file
///
/// # Errors
/// Returns error if the directory or any file cannot be written
pub fn write_all(output_dir: &Path, source: &str, report: &AnalysisReport) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    write_summary(output_dir, &build_summary(source, report))?;
    write_day_types(output_dir, &report.day_types)?;
    write_seasons(output_dir, &report.seasons)?;
    write_weather(output_dir, &report.weather)?;
    write_scatter(output_dir, report)?;
    write_records(output_dir, &report.selected)?;
    write_stats_json(output_dir, source, report)?;
    Ok(())
}

// JSON output structures

#[derive(Serialize)]
struct StatsOutput<'a> {
    source: &'a str,
    total_records: usize,
    selected_records: usize,
    selection: &'a SelectionState,
    day_types: &'a [AggregateRow<DayType>],
    seasons: &'a [AggregateRow<Season>],
    weather: &'a [AggregateRow<Weather>],
    correlation: CorrelationEntry,
    scatter: &'a [ScatterPoint],
    summary_lines: Vec<String>,
    conclusions: Vec<String>,
}

#[derive(Serialize)]
struct CorrelationEntry {
    coefficient: Option<f64>,
    relationship: Relationship,
    interpretation: String,
}
