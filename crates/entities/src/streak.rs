//! Streaks derived from completion history.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-day counters for a habit.
///
/// Always derived from the completion dates, never stored, so retroactive
/// completions and un-completions cannot make it drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive completed days ending at `as_of`, or at the day before
    /// when `as_of` itself has no completion yet.
    pub current: u32,
    /// Longest consecutive run anywhere in the history.
    pub longest: u32,
}

impl Streak {
    /// Computes the streak from completion dates as seen on `as_of`.
    ///
    /// Duplicate dates are ignored; dates after `as_of` only count towards
    /// the longest run.
    pub fn from_dates<I>(dates: I, as_of: NaiveDate) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

        let mut longest = 0u32;
        let mut run = 0u32;
        let mut previous: Option<NaiveDate> = None;
        for day in &days {
            run = match previous {
                Some(prev) if prev.succ_opt() == Some(*day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(*day);
        }

        let start = if days.contains(&as_of) {
            Some(as_of)
        } else {
            as_of.pred_opt()
        };

        let mut current = 0u32;
        let mut cursor = start;
        while let Some(day) = cursor {
            if !days.contains(&day) {
                break;
            }
            current += 1;
            cursor = day.pred_opt();
        }

        Self { current, longest }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(Streak::from_dates([], date("2025-01-30")), Streak::default());
    }

    #[test]
    fn test_current_streak_ending_today() {
        let dates = [date("2025-01-28"), date("2025-01-29"), date("2025-01-30")];
        let streak = Streak::from_dates(dates, date("2025-01-30"));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn test_today_not_yet_completed_keeps_streak() {
        let dates = [date("2025-01-28"), date("2025-01-29")];
        let streak = Streak::from_dates(dates, date("2025-01-30"));
        assert_eq!(streak.current, 2);
    }

    #[test]
    fn test_gap_breaks_current_but_not_longest() {
        let dates = [
            date("2025-01-20"),
            date("2025-01-21"),
            date("2025-01-22"),
            date("2025-01-23"),
            date("2025-01-27"),
        ];
        let streak = Streak::from_dates(dates, date("2025-01-30"));
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 4);
    }

    #[test]
    fn test_out_of_order_and_duplicate_dates() {
        let dates = [
            date("2025-01-30"),
            date("2025-01-28"),
            date("2025-01-29"),
            date("2025-01-29"),
        ];
        let streak = Streak::from_dates(dates, date("2025-01-30"));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn test_retroactive_fill_joins_runs() {
        let mut dates = vec![date("2025-01-27"), date("2025-01-29"), date("2025-01-30")];
        assert_eq!(Streak::from_dates(dates.clone(), date("2025-01-30")).current, 2);

        dates.push(date("2025-01-28"));
        assert_eq!(Streak::from_dates(dates, date("2025-01-30")).current, 4);
    }
}
