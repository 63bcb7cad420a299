use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};

use c19_types::{GrowthPoint, InfectionReport, LocationGrowthPoint, SeriesPoint};

/// Build the filled per-location daily series from parsed reports.
///
/// Reports for the same (date, location) cell are summed. The output
/// spans every day from the earliest to the latest reported date,
/// inclusive, for every observed location, with 0 on days a location
/// reported nothing. Rows are date-major, locations alphabetical, so
/// output files are stable across runs.
///
/// Reports missing either the date or the location cannot be placed in
/// the grid and are left out; the caller counts and logs them.
pub fn province_series(reports: &[InfectionReport]) -> Vec<SeriesPoint> {
    let mut cells: BTreeMap<NaiveDate, BTreeMap<&str, i64>> = BTreeMap::new();
    let mut locations: BTreeSet<&str> = BTreeSet::new();

    for report in reports {
        let (Some(location), Some(date)) = (report.location.as_deref(), report.date) else {
            continue;
        };
        *cells.entry(date).or_default().entry(location).or_insert(0) += report.count;
        locations.insert(location);
    }

    let (Some(&start), Some(&end)) = (
        cells.keys().next(),
        cells.keys().next_back(),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut date = start;
    while date <= end {
        let day_cells = cells.get(&date);
        for &location in &locations {
            let count = day_cells
                .and_then(|m| m.get(location))
                .copied()
                .unwrap_or(0);
            out.push(SeriesPoint {
                location: location.to_string(),
                date,
                count,
            });
        }
        date = date
            .checked_add_days(Days::new(1))
            .expect("date span within calendar range");
    }
    out
}

/// Sum the per-location series into one national daily series and attach
/// the day-over-day growth rate.
///
/// The rate is today's count divided by yesterday's as a float; the
/// first day has no predecessor and divides by zero, giving +inf (or NaN
/// if the first count is itself zero), the same arithmetic the source
/// data sheets use.
pub fn national_series(series: &[SeriesPoint]) -> Vec<GrowthPoint> {
    let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for point in series {
        *by_date.entry(point.date).or_insert(0) += point.count;
    }

    let mut out = Vec::with_capacity(by_date.len());
    let mut prev = 0i64;
    for (date, count) in by_date {
        out.push(GrowthPoint {
            date,
            count,
            growth_rate: count as f64 / prev as f64,
        });
        prev = count;
    }
    out
}

/// Per-location growth-rate series: each location's daily counts with
/// growth relative to that location's previous day. Location-major,
/// dates ascending.
pub fn province_growth(series: &[SeriesPoint]) -> Vec<LocationGrowthPoint> {
    let mut by_location: BTreeMap<&str, Vec<&SeriesPoint>> = BTreeMap::new();
    for point in series {
        by_location.entry(&point.location).or_default().push(point);
    }

    let mut out = Vec::with_capacity(series.len());
    for (location, mut points) in by_location {
        points.sort_by_key(|p| p.date);
        let mut prev = 0i64;
        for point in points {
            out.push(LocationGrowthPoint {
                location: location.to_string(),
                date: point.date,
                count: point.count,
                growth_rate: point.count as f64 / prev as f64,
            });
            prev = point.count;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn report(location: &str, day: &str, count: i64) -> InfectionReport {
        InfectionReport {
            location: Some(location.to_string()),
            date: Some(date(day)),
            count,
        }
    }

    // ── province_series ──────────────────────────────────────────────

    #[test]
    fn test_series_fills_missing_days_with_zero() {
        let reports = vec![
            report("Stockholm", "2020-03-01", 1),
            report("Stockholm", "2020-03-03", 2),
        ];
        let series = province_series(&reports);
        assert_eq!(
            series,
            vec![
                SeriesPoint {
                    location: "Stockholm".into(),
                    date: date("2020-03-01"),
                    count: 1
                },
                SeriesPoint {
                    location: "Stockholm".into(),
                    date: date("2020-03-02"),
                    count: 0
                },
                SeriesPoint {
                    location: "Stockholm".into(),
                    date: date("2020-03-03"),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_series_spans_all_locations_every_day() {
        let reports = vec![
            report("Skåne", "2020-03-01", 1),
            report("Värmland", "2020-03-02", 3),
        ];
        let series = province_series(&reports);
        // 2 days × 2 locations
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].location, "Skåne");
        assert_eq!(series[1].location, "Värmland");
        assert_eq!(series[1].count, 0);
        assert_eq!(series[3].count, 3);
    }

    #[test]
    fn test_series_sums_same_cell() {
        let reports = vec![
            report("Skåne", "2020-03-01", 1),
            report("Skåne", "2020-03-01", 4),
        ];
        let series = province_series(&reports);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].count, 5);
    }

    #[test]
    fn test_series_skips_incomplete_reports() {
        let reports = vec![
            InfectionReport {
                location: None,
                date: Some(date("2020-03-01")),
                count: 7,
            },
            InfectionReport {
                location: Some("Skåne".into()),
                date: None,
                count: 7,
            },
        ];
        assert!(province_series(&reports).is_empty());
    }

    // ── national_series ──────────────────────────────────────────────

    #[test]
    fn test_national_sums_over_locations() {
        let reports = vec![
            report("Skåne", "2020-03-01", 1),
            report("Värmland", "2020-03-01", 2),
            report("Skåne", "2020-03-02", 3),
            report("Värmland", "2020-03-02", 3),
        ];
        let national = national_series(&province_series(&reports));
        assert_eq!(national.len(), 2);
        assert_eq!(national[0].count, 3);
        assert_eq!(national[1].count, 6);
        assert_eq!(national[1].growth_rate, 2.0);
    }

    #[test]
    fn test_national_first_day_divides_by_zero() {
        let reports = vec![report("Skåne", "2020-03-01", 2)];
        let national = national_series(&province_series(&reports));
        assert!(national[0].growth_rate.is_infinite());
    }

    // ── province_growth ──────────────────────────────────────────────

    #[test]
    fn test_growth_is_relative_to_same_location() {
        let reports = vec![
            report("Skåne", "2020-03-01", 2),
            report("Skåne", "2020-03-02", 6),
            report("Värmland", "2020-03-01", 1),
            report("Värmland", "2020-03-02", 1),
        ];
        let growth = province_growth(&province_series(&reports));
        assert_eq!(growth.len(), 4);
        // Location-major: Skåne first
        assert_eq!(growth[0].location, "Skåne");
        assert_eq!(growth[1].growth_rate, 3.0);
        assert_eq!(growth[3].location, "Värmland");
        assert_eq!(growth[3].growth_rate, 1.0);
    }
}
