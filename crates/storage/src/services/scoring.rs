//! Derived-score computation: leaderboard rows and activity streaks.
//! Pure functions over rows already read from the ledger.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::dto::scoreboard::ScoreRow;
use crate::models::MemberTotal;

/// Reduce per-member totals to leaderboard rows.
///
/// `percent` is each member's share of `team_total`. A zero or
/// non-finite team total falls back to a divisor of 1, so an empty team
/// yields scores as percents instead of dividing by zero; any
/// non-finite or zero percent collapses to 0. Rows come back unordered;
/// ordering is the caller's concern.
pub fn scoreboard(members: &[MemberTotal], team_total: f64) -> Vec<ScoreRow> {
    let divisor = if team_total.is_finite() && team_total != 0.0 {
        team_total
    } else {
        1.0
    };

    members
        .iter()
        .map(|member| {
            let name = member
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Person {}", member.person_id));
            let percent = member.total / divisor * 100.0;
            ScoreRow {
                id: member.person_id,
                name,
                score: member.total,
                percent: if percent.is_finite() && percent != 0.0 {
                    percent
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Count consecutive active calendar days ending today.
///
/// Walks the unique active days backward from `today`; the first gap
/// stops the count. No activity today means streak 0, regardless of how
/// long yesterday's run was.
pub fn streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0u32;
    for (i, day) in days.iter().rev().enumerate() {
        let expected = today - Duration::days(i as i64);
        if *day == expected {
            count += 1;
        } else {
            break;
        }
    }
    count
}

/// Collapse entry timestamps to calendar days in `tz` and count the
/// streak as of `today` (a date in that same zone).
pub fn streak_from_timestamps<Tz: TimeZone>(
    timestamps: &[DateTime<Utc>],
    tz: &Tz,
    today: NaiveDate,
) -> u32 {
    let days: BTreeSet<NaiveDate> = timestamps
        .iter()
        .map(|t| t.with_timezone(tz).date_naive())
        .collect();
    streak(&days, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn member(name: Option<&str>, total: f64) -> MemberTotal {
        MemberTotal {
            person_id: Uuid::new_v4(),
            name: name.map(String::from),
            team: None,
            total,
        }
    }

    #[test]
    fn percent_is_share_of_team_total() {
        let members = vec![member(Some("ana"), 30.0), member(Some("bo"), 10.0)];
        let rows = scoreboard(&members, 40.0);

        assert_eq!(rows[0].percent, 75.0);
        assert_eq!(rows[1].percent, 25.0);
        assert_eq!(rows[0].score, 30.0);
    }

    #[test]
    fn zero_team_total_does_not_divide_by_zero() {
        let members = vec![member(Some("ana"), 5.0)];
        let rows = scoreboard(&members, 0.0);

        // Divisor falls back to 1: percent collapses to score * 100.
        assert_eq!(rows[0].percent, 500.0);
        assert!(rows[0].percent.is_finite());
    }

    #[test]
    fn output_is_nan_free_for_malformed_input() {
        let members = vec![member(Some("ana"), f64::NAN), member(Some("bo"), 0.0)];
        let rows = scoreboard(&members, f64::NAN);

        for row in &rows {
            assert!(!row.percent.is_nan());
        }
        assert_eq!(rows[1].percent, 0.0);
    }

    #[test]
    fn missing_name_gets_placeholder_with_id() {
        let members = vec![member(None, 1.0), member(Some(""), 1.0)];
        let rows = scoreboard(&members, 2.0);

        assert!(rows[0].name.starts_with("Person "));
        assert!(rows[0].name.contains(&rows[0].id.to_string()));
        assert!(rows[1].name.starts_with("Person "));
    }

    #[test]
    fn member_sum_matches_team_total() {
        let members = vec![
            member(Some("ana"), 12.5),
            member(Some("bo"), -2.5),
            member(Some("cy"), 10.0),
        ];
        let team_total: f64 = members.iter().map(|m| m.total).sum();
        let rows = scoreboard(&members, team_total);

        let score_sum: f64 = rows.iter().map(|r| r.score).sum();
        assert_eq!(score_sum, team_total);
        let percent_sum: f64 = rows.iter().map(|r| r.percent).sum();
        assert!((percent_sum - 100.0).abs() < 1e-9);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn streak_counts_back_from_today() {
        let today = date(2025, 6, 10);
        // Today, yesterday, and a gap before the 7th.
        let days: BTreeSet<NaiveDate> =
            [date(2025, 6, 10), date(2025, 6, 9), date(2025, 6, 7)].into();

        assert_eq!(streak(&days, today), 2);
    }

    #[test]
    fn no_activity_today_means_zero() {
        let today = date(2025, 6, 10);
        let days: BTreeSet<NaiveDate> = [date(2025, 6, 9), date(2025, 6, 8)].into();

        assert_eq!(streak(&days, today), 0);
    }

    #[test]
    fn empty_days_means_zero() {
        assert_eq!(streak(&BTreeSet::new(), date(2025, 6, 10)), 0);
    }

    #[test]
    fn multiple_entries_on_one_day_count_once() {
        let today = date(2025, 6, 10);
        let timestamps = vec![
            Utc.with_ymd_and_hms(2025, 6, 10, 6, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 21, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 9, 12, 0, 0).unwrap(),
        ];

        assert_eq!(streak_from_timestamps(&timestamps, &Utc, today), 2);
    }
}
