use storage::error::Result;
use storage::models::Person;
use storage::services::admin;
use storage::services::admin::TeamDraw;
use storage::store::Ledger;
use uuid::Uuid;

pub async fn list_people(ledger: &dyn Ledger) -> Result<Vec<Person>> {
    ledger.list_people().await
}

pub async fn randomize_teams(ledger: &dyn Ledger, people: Vec<Uuid>) -> Result<TeamDraw> {
    admin::randomize_teams(ledger, people).await
}
