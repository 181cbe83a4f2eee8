pub mod models;

pub use models::client::{Client, ClientFilters, ClientPatch, NewClient};
pub use models::initiative::{Initiative, InitiativePatch, NewInitiative};
pub use models::proposal_seed::{NewProposalSeed, ProposalSeed, ProposalSeedPatch};
pub use models::weekly_summary::{ClientWeeklySummary, SummarySubmission};

use futures::future::try_join_all;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

/// A client as shown on a team meeting's board.
#[derive(Debug, Clone, Serialize)]
pub struct ClientBoard {
    #[serde(flatten)]
    pub client: Client,
    pub initiatives: Vec<Initiative>,
    /// This meeting's summary, if one was written.
    pub weekly_summary: Option<ClientWeeklySummary>,
    /// Non-dormant seeds only.
    pub proposal_seeds: Vec<ProposalSeed>,
}

impl ClientBoard {
    pub async fn load_for_team(team_id: Uuid, meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        let clients = Client::list_for_team(team_id, pool).await?;

        try_join_all(clients.into_iter().map(|client| async move {
            let (initiatives, weekly_summary, proposal_seeds) = tokio::try_join!(
                Initiative::list_for_client(client.id, pool),
                ClientWeeklySummary::find(client.id, meeting_id, pool),
                ProposalSeed::list_active_for_client(client.id, pool),
            )?;
            Ok::<_, VexumError>(Self {
                client,
                initiatives,
                weekly_summary,
                proposal_seeds,
            })
        }))
        .await
    }
}
