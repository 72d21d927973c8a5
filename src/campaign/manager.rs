use futures::TryStreamExt;
use serde::Serialize;
use tracing::debug;

use crate::config::ValidationPolicy;
use crate::database::ConnectionManager;
use crate::error::Error;

use super::db::{CampaignStore, CampaignStream};
use super::{Campaign, CampaignId, NewCampaign, Status, StatusFilter, STATUS_OPTIONS};

async fn store(db: &ConnectionManager) -> Result<&dyn CampaignStore, Error> {
    match db.database().await {
        Ok(database) => Ok(database.campaigns()),
        Err(err) => Err(Error::StoreUnavailable(Box::new(err))),
    }
}

pub fn validate_campaign(policy: ValidationPolicy, campaign: &NewCampaign) -> Result<(), Error> {
    if policy == ValidationPolicy::Lenient {
        return Ok(());
    }

    if campaign.name.is_empty() {
        return Err(Error::MissingField { field: "name" });
    }
    if campaign.client.is_empty() {
        return Err(Error::MissingField { field: "client" });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: &ConnectionManager,
    filter: &StatusFilter,
) -> Result<CampaignStream, Error> {
    let campaigns = store(db).await?.fetch_campaigns(filter).await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &ConnectionManager,
    policy: ValidationPolicy,
    campaign: NewCampaign,
) -> Result<Campaign, Error> {
    validate_campaign(policy, &campaign)?;

    let campaign_id = store(db).await?.insert_campaign(&campaign).await?;

    Ok(campaign.into_campaign(campaign_id))
}

/// Overwrites the status of a campaign. A well-formed id that matches nothing
/// is not an error.
#[tracing::instrument(skip(db))]
pub async fn update_campaign_status(
    db: &ConnectionManager,
    campaign_id: &str,
    status: Status,
) -> Result<(), Error> {
    let campaign_id = CampaignId::parse(campaign_id)?;

    let matched = store(db)
        .await?
        .update_campaign_status(campaign_id, &status)
        .await?;
    if !matched {
        debug!("no campaign matched {}, nothing updated", campaign_id);
    }

    Ok(())
}

/// Removes a campaign. Deleting a campaign that does not exist is not an error.
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &ConnectionManager, campaign_id: &str) -> Result<(), Error> {
    let campaign_id = CampaignId::parse(campaign_id)?;

    let deleted = store(db).await?.delete_campaign(campaign_id).await?;
    if !deleted {
        debug!("no campaign matched {}, nothing deleted", campaign_id);
    }

    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

/// Counts campaigns per known status. Every known status is present, in
/// display order, even when its count is zero.
pub fn summarize(campaigns: &[Campaign]) -> Vec<StatusCount> {
    STATUS_OPTIONS
        .iter()
        .map(|status| StatusCount {
            status: status.clone(),
            count: campaigns.iter().filter(|c| &c.status == status).count(),
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct Report {
    pub filter: StatusFilter,
    pub campaigns: Vec<Campaign>,
    pub summary: Vec<StatusCount>,
}

#[tracing::instrument(skip(db))]
pub async fn get_report(db: &ConnectionManager, filter: StatusFilter) -> Result<Report, Error> {
    let campaigns: Vec<Campaign> = get_campaigns(db, &filter).await?.try_collect().await?;
    let summary = summarize(&campaigns);

    Ok(Report {
        filter,
        campaigns,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::database::test::{MockConnector, MockDatabase};

    fn manager() -> (ConnectionManager, MockDatabase) {
        let connector = MockConnector::new();
        let db = connector.db.clone();
        let manager = ConnectionManager::new(connector, Some("mongodb://test".into()));
        (manager, db)
    }

    fn launch() -> NewCampaign {
        NewCampaign {
            name: "Launch".into(),
            client: "Acme".into(),
            start_date: "2024-01-01".into(),
            status: Status::Active,
        }
    }

    async fn list(db: &ConnectionManager, filter: StatusFilter) -> Vec<Campaign> {
        get_campaigns(db, &filter)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn added_campaign_is_listed_with_a_fresh_id() {
        let (db, _) = manager();
        let first = create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();

        let second = create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();

        let campaigns = list(&db, StatusFilter::All).await;
        assert_eq!(campaigns.len(), 2);
        assert_ne!(first.id, second.id);
        let listed = campaigns.iter().find(|c| c.id == second.id).unwrap();
        assert_eq!(listed, &launch().into_campaign(second.id));
    }

    #[tokio::test]
    async fn lenient_policy_accepts_empty_fields() {
        let (db, _) = manager();
        let empty = NewCampaign {
            name: String::new(),
            client: String::new(),
            start_date: String::new(),
            status: Status::Other(String::new()),
        };

        let campaign = create_campaign(&db, ValidationPolicy::Lenient, empty.clone())
            .await
            .unwrap();

        assert_eq!(list(&db, StatusFilter::All).await, vec![empty.into_campaign(campaign.id)]);
    }

    #[tokio::test]
    async fn strict_policy_rejects_missing_client_without_inserting() {
        let (db, mock) = manager();
        let campaign = NewCampaign {
            client: String::new(),
            ..launch()
        };

        let result = create_campaign(&db, ValidationPolicy::Strict, campaign).await;

        assert_eq!(result.unwrap_err(), Error::MissingField { field: "client" });
        assert_eq!(mock.campaigns.mutations(), 0);
    }

    #[tokio::test]
    async fn strict_policy_only_rejects_empty_text() {
        let (db, _) = manager();
        let campaign = NewCampaign {
            name: " ".into(),
            ..launch()
        };

        let created = create_campaign(&db, ValidationPolicy::Strict, campaign.clone())
            .await
            .unwrap();

        assert_eq!(list(&db, StatusFilter::All).await, vec![campaign.into_campaign(created.id)]);
    }

    #[tokio::test]
    async fn update_status_changes_only_the_status() {
        let (db, _) = manager();
        let campaign = create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();

        update_campaign_status(&db, &campaign.id.to_string(), Status::Paused)
            .await
            .unwrap();

        let campaigns = list(&db, StatusFilter::All).await;
        assert_eq!(
            campaigns,
            vec![Campaign {
                status: Status::Paused,
                ..campaign
            }]
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (db, _) = manager();
        let campaign = create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();
        let id = campaign.id.to_string();

        delete_campaign(&db, &id).await.unwrap();
        delete_campaign(&db, &id).await.unwrap();

        assert!(list(&db, StatusFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn updating_a_missing_campaign_is_a_no_op() {
        let (db, _) = manager();

        let result =
            update_campaign_status(&db, &CampaignId::new().to_string(), Status::Completed).await;

        assert!(result.is_ok());
        assert!(list(&db, StatusFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_before_the_store() {
        let (db, mock) = manager();
        create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();
        let before = mock.campaigns.mutations();

        let update = update_campaign_status(&db, "not-an-id", Status::Paused).await;
        let delete = delete_campaign(&db, "12345").await;

        assert_eq!(
            update.unwrap_err(),
            Error::InvalidIdentifier {
                id: "not-an-id".into()
            }
        );
        assert_eq!(
            delete.unwrap_err(),
            Error::InvalidIdentifier { id: "12345".into() }
        );
        assert_eq!(mock.campaigns.mutations(), before);
        assert_eq!(list(&db, StatusFilter::All).await[0].status, Status::Active);
    }

    #[tokio::test]
    async fn padded_ids_are_rejected_before_the_store() {
        let (db, mock) = manager();
        let campaign = create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();
        let before = mock.campaigns.mutations();
        let padded = format!("  {}  ", campaign.id);

        let delete = delete_campaign(&db, &padded).await;

        assert_eq!(delete.unwrap_err(), Error::InvalidIdentifier { id: padded });
        assert_eq!(mock.campaigns.mutations(), before);
        assert_eq!(list(&db, StatusFilter::All).await, vec![campaign]);
    }

    #[tokio::test]
    async fn filter_returns_only_matching_statuses() {
        let (db, _) = manager();
        for status in &[Status::Active, Status::Completed, Status::Paused, Status::Completed] {
            let campaign = NewCampaign {
                status: status.clone(),
                ..launch()
            };
            create_campaign(&db, ValidationPolicy::Lenient, campaign)
                .await
                .unwrap();
        }

        let completed = list(&db, StatusFilter::Only(Status::Completed)).await;
        let all = list(&db, StatusFilter::from_param(Some("All"))).await;

        assert_eq!(completed.len(), 2);
        assert!(completed.iter().all(|c| c.status == Status::Completed));
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn launch_scenario() {
        let (db, _) = manager();
        let campaign = create_campaign(&db, ValidationPolicy::Lenient, launch())
            .await
            .unwrap();
        assert_eq!(list(&db, StatusFilter::All).await, vec![campaign.clone()]);

        update_campaign_status(&db, &campaign.id.to_string(), Status::Completed)
            .await
            .unwrap();
        let completed = list(&db, StatusFilter::Only(Status::Completed)).await;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, campaign.id);

        delete_campaign(&db, &campaign.id.to_string()).await.unwrap();
        assert!(list(&db, StatusFilter::All).await.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_store_is_unavailable() {
        let db = ConnectionManager::new(MockConnector::new(), None);

        let list = get_campaigns(&db, &StatusFilter::All).await.err();
        let add = create_campaign(&db, ValidationPolicy::Lenient, launch()).await;
        let delete = delete_campaign(&db, &CampaignId::new().to_string()).await;

        let unavailable = || Error::StoreUnavailable(Box::new(Error::NotConfigured));
        assert_eq!(list, Some(unavailable()));
        assert_eq!(add.unwrap_err(), unavailable());
        assert_eq!(delete.unwrap_err(), unavailable());
    }

    #[tokio::test]
    async fn unreachable_store_is_unavailable() {
        let connector = MockConnector::failing();
        let attempts = connector.clone();
        let db = ConnectionManager::new(connector, Some("mongodb://test".into()));

        let list = get_campaigns(&db, &StatusFilter::All).await.err();
        let update =
            update_campaign_status(&db, &CampaignId::new().to_string(), Status::Paused).await;

        let unavailable = || {
            Error::StoreUnavailable(Box::new(Error::ConnectionFailed {
                reason: "server selection timeout".into(),
            }))
        };
        assert_eq!(list, Some(unavailable()));
        assert_eq!(update.unwrap_err(), unavailable());
        assert_eq!(unavailable().error_code(), "E5001002");
        assert_eq!(attempts.attempts(), 1);
    }

    #[tokio::test]
    async fn store_failures_are_reported_as_operation_failures() {
        let (db, mock) = manager();
        *mock.campaigns.failing.lock().unwrap() = true;

        let result = create_campaign(&db, ValidationPolicy::Lenient, launch()).await;

        assert_eq!(result.unwrap_err().error_code(), "E5001003");
        assert_eq!(mock.campaigns.inserts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn summary_counts_every_known_status() {
        let campaigns: Vec<Campaign> = [Status::Active, Status::Active, Status::Other("x".into())]
            .iter()
            .map(|status| Campaign {
                status: status.clone(),
                ..launch().into_campaign(CampaignId::new())
            })
            .collect();

        let summary = summarize(&campaigns);

        assert_eq!(
            summary,
            vec![
                StatusCount {
                    status: Status::Active,
                    count: 2
                },
                StatusCount {
                    status: Status::Paused,
                    count: 0
                },
                StatusCount {
                    status: Status::Completed,
                    count: 0
                },
            ]
        );
    }
}
