use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::{self, Document};

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId, NewCampaign, Status, StatusFilter};

/// Campaigns as they come off a store cursor. Dropping the stream stops the
/// query; listing again re-runs it against the current contents.
pub type CampaignStream = BoxStream<'static, Result<Campaign, Error>>;

/// Single-round-trip operations over the campaign collection.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error>;

    async fn fetch_campaigns(&self, filter: &StatusFilter) -> Result<CampaignStream, Error>;

    /// Returns whether a campaign matched `campaign_id`.
    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: &Status,
    ) -> Result<bool, Error>;

    /// Returns whether a campaign was removed.
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error>;
}

fn filter_document(filter: &StatusFilter) -> Document {
    match filter {
        StatusFilter::All => bson::doc! {},
        StatusFilter::Only(status) => bson::doc! { "status": status.as_str() },
    }
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error> {
        let campaign = campaign.clone().into_campaign(CampaignId::new());
        self.insert_one(&campaign, None).await?;

        Ok(campaign.id)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self, filter: &StatusFilter) -> Result<CampaignStream, Error> {
        let cursor = self.find(filter_document(filter), None).await?;

        Ok(cursor.map_err(Error::from).boxed())
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: &Status,
    ) -> Result<bool, Error> {
        let result = self
            .update_one(
                bson::doc! { "_id": campaign_id },
                bson::doc! { "$set": { "status": status.as_str() } },
                None,
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let result = self
            .delete_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(result.deleted_count > 0)
    }
}
