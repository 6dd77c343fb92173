use chrono::{NaiveTime, Timelike};

use crate::model::{DailyForecastEntry, ForecastSample};

fn is_midday(time: NaiveTime) -> bool {
    time.hour() == 12 && time.minute() == 0 && time.second() == 0
}

/// Reduce a 3-hour series to one reading per day: the 12:00:00 sample.
///
/// Days without a midday sample (typically the partial first or last day of
/// the series) produce no entry. Input order is preserved.
pub fn midday_reduction(series: &[ForecastSample]) -> Vec<DailyForecastEntry> {
    series
        .iter()
        .filter(|sample| is_midday(sample.label.time()))
        .map(DailyForecastEntry::from)
        .collect()
}
