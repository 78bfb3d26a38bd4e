//! Date-range and category selection over loaded records

use super::records::parse_date;
use crate::config::FilterConfig;
use crate::structs::{
    DateRange, FilteredRecords, RecordFilter, RentalError, RentalRecord, Result, Selection,
    SelectionState,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

impl<T: Ord> Selection<T> {
    /// `None` applies no filter; `Some(vec![])` selects nothing
    #[must_use]
    pub fn from_option(values: Option<Vec<T>>) -> Self {
        match values {
            None => Self::All,
            Some(v) => Self::Only(v.into_iter().collect::<BTreeSet<T>>()),
        }
    }

    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(value),
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Only(set) if set.is_empty())
    }
}

impl DateRange {
    /// # Errors
    /// Returns `InvalidInput` if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RentalError::InvalidInput(format!(
                "date range starts ({start}) after it ends ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from optional bounds; a missing bound is open
    ///
    /// # Errors
    /// Returns `DateParse` naming an unparseable bound, or `InvalidInput` for a reversed range
    pub fn parse(start: Option<&str>, end: Option<&str>, format: &str) -> Result<Option<Self>> {
        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        let start = start
            .map(|s| parse_date(s, format))
            .transpose()?
            .unwrap_or(NaiveDate::MIN);
        let end = end
            .map(|s| parse_date(s, format))
            .transpose()?
            .unwrap_or(NaiveDate::MAX);
        Self::new(start, end).map(Some)
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl RecordFilter {
    /// # Errors
    /// Returns error if a date bound cannot be parsed or the range is reversed
    pub fn from_config(filter: &FilterConfig, date_format: &str) -> Result<Self> {
        Ok(Self {
            date_range: DateRange::parse(
                filter.start.as_deref(),
                filter.end.as_deref(),
                date_format,
            )?,
            years: Selection::from_option(filter.years.clone()),
            seasons: Selection::from_option(filter.seasons.clone()),
            day_types: Selection::from_option(filter.day_types.clone()),
        })
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.date_range.is_none()
            && self.years.is_all()
            && self.seasons.is_all()
            && self.day_types.is_all()
    }

    /// Names of the selections that exclude every category
    #[must_use]
    pub fn empty_selections(&self) -> Vec<String> {
        [
            ("years", self.years.is_nothing()),
            ("seasons", self.seasons.is_nothing()),
            ("day_types", self.day_types.is_nothing()),
        ]
        .into_iter()
        .filter(|(_, empty)| *empty)
        .map(|(name, _)| name.to_string())
        .collect()
    }

    #[must_use]
    pub fn matches(&self, record: &RentalRecord) -> bool {
        self.date_range.map_or(true, |r| r.contains(record.date))
            && self.years.matches(&record.year)
            && self.seasons.matches(&record.season)
            && self.day_types.matches(&record.day_type)
    }

    /// Keep matching records in their original order
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [RentalRecord]) -> FilteredRecords<'a> {
        let empty = self.empty_selections();
        if !empty.is_empty() {
            return FilteredRecords {
                records: Vec::new(),
                state: SelectionState::NothingSelected(empty),
            };
        }

        if self.is_unfiltered() {
            return FilteredRecords {
                records: records.iter().collect(),
                state: SelectionState::Unfiltered,
            };
        }

        FilteredRecords {
            records: records.iter().filter(|r| self.matches(r)).collect(),
            state: SelectionState::Filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{DayType, Season, Weather};
    use chrono::{Datelike, Weekday};

    fn record(date: &str, season: Season, count: u32) -> RentalRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date");
        let weekday = date.weekday();
        RentalRecord {
            date,
            weekday,
            season,
            year: date.year(),
            month: date.month(),
            holiday: false,
            working_day: !matches!(weekday, Weekday::Sat | Weekday::Sun),
            weather: Weather::Clear,
            temperature: 20.0,
            count,
            day_type: DayType::from_weekday(weekday),
        }
    }

    fn dataset() -> Vec<RentalRecord> {
        vec![
            record("2011-01-01", Season::Spring, 985),
            record("2011-07-04", Season::Fall, 6043),
            record("2012-01-02", Season::Spring, 1951),
            record("2012-12-31", Season::Spring, 2729),
        ]
    }

    #[test]
    fn test_no_filter_returns_everything() {
        let data = dataset();
        let result = RecordFilter::default().apply(&data);

        assert_eq!(result.state, SelectionState::Unfiltered);
        assert_eq!(result.records.len(), 4);
    }

    #[test]
    fn test_empty_year_selection_selects_nothing() {
        let data = dataset();
        let filter = RecordFilter {
            years: Selection::Only(BTreeSet::new()),
            ..RecordFilter::default()
        };
        let result = filter.apply(&data);

        assert!(result.records.is_empty());
        assert_eq!(
            result.state,
            SelectionState::NothingSelected(vec!["years".to_string()])
        );
        assert_ne!(result.state, RecordFilter::default().apply(&data).state);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let data = dataset();
        let range = DateRange::parse(Some("2011-07-04"), Some("2012-01-02"), "%Y-%m-%d")
            .unwrap()
            .unwrap();
        let filter = RecordFilter {
            date_range: Some(range),
            ..RecordFilter::default()
        };
        let result = filter.apply(&data);

        assert_eq!(result.state, SelectionState::Filtered);
        let counts: Vec<u32> = result.records.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![6043, 1951]);
    }

    #[test]
    fn test_open_ended_range() {
        let range = DateRange::parse(Some("2012-01-01"), None, "%Y-%m-%d")
            .unwrap()
            .unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2011, 12, 31).unwrap()));
        assert_eq!(DateRange::parse(None, None, "%Y-%m-%d").unwrap(), None);
    }

    #[test]
    fn test_bad_date_names_value() {
        let err = DateRange::parse(Some("2011-13-45"), None, "%Y-%m-%d").unwrap_err();
        assert!(matches!(err, RentalError::DateParse { ref value, .. } if value == "2011-13-45"));
    }

    #[test]
    fn test_reversed_range() {
        assert!(DateRange::parse(Some("2012-01-01"), Some("2011-01-01"), "%Y-%m-%d").is_err());
    }

    #[test]
    fn test_set_membership_preserves_order() {
        let data = dataset();
        let filter = RecordFilter {
            years: Selection::from_option(Some(vec![2012, 2011])),
            seasons: Selection::from_option(Some(vec![Season::Spring])),
            ..RecordFilter::default()
        };
        let result = filter.apply(&data);

        let counts: Vec<u32> = result.records.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![985, 1951, 2729]);
    }

    #[test]
    fn test_day_type_selection() {
        let data = dataset();
        let filter = RecordFilter {
            day_types: Selection::from_option(Some(vec![DayType::NonWorking])),
            ..RecordFilter::default()
        };
        let result = filter.apply(&data);

        // 2011-01-01 is a Saturday
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].count, 985);
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig {
            start: Some("2011-01-01".into()),
            seasons: Some(vec![]),
            ..FilterConfig::default()
        };
        let filter = RecordFilter::from_config(&config, "%Y-%m-%d").unwrap();

        assert!(filter.date_range.is_some());
        assert!(filter.seasons.is_nothing());
        assert!(filter.years.is_all());
        assert_eq!(filter.empty_selections(), vec!["seasons".to_string()]);
    }
}
