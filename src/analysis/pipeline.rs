//! Analysis pipeline that runs every aggregation over one filtered record set

use super::aggregate::aggregate;
use crate::structs::{
    AnalysisReport, Aggregation, CorrelationSummary, DayType, FilteredRecords, KeyOrder,
    RecordFilter, RentalRecord, Result, ScatterPoint,
};
use tracing::debug;

/// Configuration for the analysis pipeline
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub filter: RecordFilter,
    /// Day-type rows to show, and in which order
    pub day_type_order: KeyOrder<DayType>,
}

/// Run the full analysis pipeline
///
/// Pure: the same records and config always give the same report.
///
/// # Errors
/// Returns error only if the correlation series cannot be built
pub fn run_pipeline<'a>(
    records: &'a [RentalRecord],
    config: &AnalysisConfig,
) -> Result<AnalysisReport<'a>> {
    let FilteredRecords {
        records: selected_records,
        state,
    } = config.filter.apply(records);
    debug!(
        "{} of {} records selected ({:?})",
        selected_records.len(),
        records.len(),
        state
    );
    let selected = selected_records.iter().copied();

    let day_type_order = config
        .day_type_order
        .restricted_to(&config.filter.day_types);
    let day_types = aggregate(
        selected.clone(),
        |r: &RentalRecord| r.day_type,
        |r: &RentalRecord| f64::from(r.count),
        Aggregation::Sum,
        &day_type_order,
    );

    let seasons = aggregate(
        selected.clone(),
        |r: &RentalRecord| r.season,
        |r: &RentalRecord| f64::from(r.count),
        Aggregation::Mean,
        &KeyOrder::Natural,
    );

    let weather = aggregate(
        selected.clone(),
        |r: &RentalRecord| r.weather,
        |r: &RentalRecord| f64::from(r.count),
        Aggregation::Mean,
        &KeyOrder::Natural,
    );

    let scatter: Vec<ScatterPoint> = selected
        .map(|r| ScatterPoint {
            date: r.date,
            temperature: r.temperature,
            count: r.count,
        })
        .collect();

    let temperatures: Vec<f64> = scatter.iter().map(|p| p.temperature).collect();
    let counts: Vec<f64> = scatter.iter().map(|p| f64::from(p.count)).collect();
    let correlation = CorrelationSummary::compute(&temperatures, &counts)?;

    Ok(AnalysisReport {
        state,
        total_records: records.len(),
        selected: selected_records,
        day_types,
        seasons,
        weather,
        correlation,
        scatter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{Correlation, Relationship, Season, Selection, SelectionState, Weather};
    use chrono::{Datelike, NaiveDate, Weekday};
    use std::collections::BTreeSet;

    fn record(day: u32, weekday: Weekday, season: Season, temperature: f64, count: u32) -> RentalRecord {
        let date = NaiveDate::from_ymd_opt(2011, 3, day).expect("date");
        RentalRecord {
            date,
            weekday,
            season,
            year: date.year(),
            month: date.month(),
            holiday: false,
            working_day: DayType::from_weekday(weekday) == DayType::Working,
            weather: if count > 150 { Weather::Clear } else { Weather::Mist },
            temperature,
            count,
            day_type: DayType::from_weekday(weekday),
        }
    }

    fn default_config() -> AnalysisConfig {
        AnalysisConfig {
            filter: RecordFilter::default(),
            day_type_order: KeyOrder::Reindex(vec![DayType::NonWorking, DayType::Working]),
        }
    }

    #[test]
    fn test_day_type_scenario() {
        // Senin 100, Sabtu 50, Minggu 50
        let records = vec![
            record(7, Weekday::Mon, Season::Spring, 10.0, 100),
            record(12, Weekday::Sat, Season::Spring, 20.0, 50),
            record(13, Weekday::Sun, Season::Spring, 30.0, 50),
        ];
        let report = run_pipeline(&records, &default_config()).expect("pipeline");

        assert_eq!(report.state, SelectionState::Unfiltered);
        assert_eq!(report.day_types.len(), 2);
        assert_eq!(report.day_types[0].key, DayType::NonWorking);
        assert!((report.day_types[0].value - 100.0).abs() < 1e-9);
        assert!((report.day_types[0].percentage - 50.0).abs() < 1e-9);
        assert_eq!(report.day_types[1].key, DayType::Working);
        assert!((report.day_types[1].value - 100.0).abs() < 1e-9);
        assert!((report.day_types[1].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_and_seasons() {
        let records = vec![
            record(1, Weekday::Tue, Season::Spring, 10.0, 100),
            record(2, Weekday::Wed, Season::Summer, 20.0, 200),
            record(3, Weekday::Thu, Season::Summer, 30.0, 300),
        ];
        let report = run_pipeline(&records, &default_config()).expect("pipeline");

        let r = report.correlation.coefficient.value().expect("defined");
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(report.correlation.relationship, Relationship::Positive);

        assert_eq!(report.seasons.len(), 2);
        assert_eq!(report.seasons[1].key, Season::Summer);
        assert!((report.seasons[1].value - 250.0).abs() < 1e-9);
        assert_eq!(report.scatter.len(), 3);
        assert_eq!(report.weather.len(), 2);
    }

    #[test]
    fn test_missing_day_type_is_zero_filled() {
        let records = vec![
            record(1, Weekday::Tue, Season::Spring, 10.0, 100),
            record(2, Weekday::Wed, Season::Spring, 12.0, 140),
        ];
        let report = run_pipeline(&records, &default_config()).expect("pipeline");

        assert_eq!(report.day_types.len(), 2);
        assert_eq!(report.day_types[0].key, DayType::NonWorking);
        assert_eq!(report.day_types[0].value, 0.0);
        assert_eq!(report.day_types[0].percentage, 0.0);
        assert!((report.day_types[1].percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_selected() {
        let records = vec![record(1, Weekday::Tue, Season::Spring, 10.0, 100)];
        let config = AnalysisConfig {
            filter: RecordFilter {
                years: Selection::Only(BTreeSet::new()),
                ..RecordFilter::default()
            },
            ..default_config()
        };
        let report = run_pipeline(&records, &config).expect("pipeline");

        assert!(report.selected.is_empty());
        assert_eq!(report.total_records, 1);
        assert!(matches!(report.state, SelectionState::NothingSelected(_)));
        assert!(report.scatter.is_empty());
        assert!(report.seasons.is_empty());
        assert_eq!(report.correlation.coefficient, Correlation::Undefined);
        assert_eq!(report.correlation.relationship, Relationship::None);
    }

    #[test]
    fn test_day_type_subset_uses_subset_total() {
        let records = vec![
            record(7, Weekday::Mon, Season::Spring, 10.0, 100),
            record(12, Weekday::Sat, Season::Spring, 20.0, 50),
        ];
        let config = AnalysisConfig {
            filter: RecordFilter {
                day_types: Selection::Only(BTreeSet::from([DayType::NonWorking])),
                ..RecordFilter::default()
            },
            ..default_config()
        };
        let report = run_pipeline(&records, &config).expect("pipeline");

        assert_eq!(report.day_types.len(), 1);
        assert_eq!(report.day_types[0].key, DayType::NonWorking);
        assert!((report.day_types[0].percentage - 100.0).abs() < 1e-9);
    }
}
