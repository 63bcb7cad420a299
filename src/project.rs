use chrono::NaiveDate;

use c19_types::ProjectionPoint;

/// Simulate an exponential infection trajectory over an inclusive date
/// span: `count(day) = starting_cases * growth_rate^day`, truncated to
/// an integer. An end date before the start yields an empty trajectory.
pub fn infection_projection(
    start_date: NaiveDate,
    end_date: NaiveDate,
    starting_cases: i64,
    growth_rate: f64,
) -> Vec<ProjectionPoint> {
    let days = (end_date - start_date).num_days() + 1;

    (0..days.max(0))
        .map(|day| ProjectionPoint {
            day,
            count: (starting_cases as f64 * growth_rate.powi(day as i32)) as i64,
            growth_rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_projection_doubles_daily_at_rate_two() {
        let points = infection_projection(
            date("2020-01-01"),
            date("2020-01-04"),
            5,
            2.0,
        );
        let counts: Vec<i64> = points.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![5, 10, 20, 40]);
        assert_eq!(points[3].day, 3);
    }

    #[test]
    fn test_projection_truncates_fractional_cases() {
        let points = infection_projection(
            date("2020-01-01"),
            date("2020-01-03"),
            5,
            1.5,
        );
        let counts: Vec<i64> = points.iter().map(|p| p.count).collect();
        // 5, 7.5, 11.25 → truncated
        assert_eq!(counts, vec![5, 7, 11]);
    }

    #[test]
    fn test_projection_single_day_span() {
        let points =
            infection_projection(date("2020-01-01"), date("2020-01-01"), 5, 2.5);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].count, 5);
    }

    #[test]
    fn test_projection_inverted_span_is_empty() {
        assert!(
            infection_projection(date("2020-01-02"), date("2020-01-01"), 5, 2.0)
                .is_empty()
        );
    }
}
