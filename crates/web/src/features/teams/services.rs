use std::cmp::Ordering;

use storage::dto::scoreboard::{ScoreRow, ScoreboardQuery, SortField, SortOrder};
use storage::error::Result;
use storage::models::Team;
use storage::services::scoring;
use storage::store::Ledger;

/// Aggregate and order a team's leaderboard. The aggregator itself
/// returns unordered rows; ordering and the stable-by-id tie-break live
/// here, in the presentation layer.
pub async fn scoreboard(
    ledger: &dyn Ledger,
    team: Team,
    query: &ScoreboardQuery,
) -> Result<Vec<ScoreRow>> {
    let members = ledger.member_totals(team).await?;
    let total = ledger.team_total(team).await?;

    let mut rows = scoring::scoreboard(&members, total);
    sort_rows(&mut rows, query.sort, query.order);
    Ok(rows)
}

pub async fn team_total(ledger: &dyn Ledger, team: Team) -> Result<f64> {
    ledger.team_total(team).await
}

pub fn sort_rows(rows: &mut [ScoreRow], field: SortField, order: SortOrder) {
    rows.sort_by(|a, b| {
        let primary = match field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Percent => a.percent.partial_cmp(&b.percent).unwrap_or(Ordering::Equal),
            SortField::Score => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
        };
        let primary = match order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(name: &str, score: f64, percent: f64) -> ScoreRow {
        ScoreRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score,
            percent,
        }
    }

    #[test]
    fn sorts_by_score_descending_by_default() {
        let mut rows = vec![row("ana", 5.0, 25.0), row("bo", 15.0, 75.0)];
        sort_rows(&mut rows, SortField::Score, SortOrder::Desc);

        assert_eq!(rows[0].name, "bo");
        assert_eq!(rows[1].name, "ana");
    }

    #[test]
    fn sorts_by_name_ascending() {
        let mut rows = vec![row("zoe", 1.0, 50.0), row("ana", 1.0, 50.0)];
        sort_rows(&mut rows, SortField::Name, SortOrder::Asc);

        assert_eq!(rows[0].name, "ana");
    }

    #[test]
    fn equal_keys_tie_break_by_id() {
        let mut rows = vec![row("ana", 10.0, 50.0), row("bo", 10.0, 50.0)];
        sort_rows(&mut rows, SortField::Score, SortOrder::Desc);
        let first_pass: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        rows.reverse();
        sort_rows(&mut rows, SortField::Score, SortOrder::Desc);
        let second_pass: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        // Same order no matter the input order.
        assert_eq!(first_pass, second_pass);
        assert!(first_pass[0] < first_pass[1]);
    }
}
