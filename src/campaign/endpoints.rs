use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::ConnectionManager;
use crate::error::Error;

use super::manager::{self, StatusCount};
use super::{Campaign, NewCampaign, Status, StatusFilter};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateCampaignBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default, rename = "startDate")]
    pub start_date: String,
    #[serde(default)]
    pub status: Status,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: String,
    pub name: String,
    pub client: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    pub status: Status,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id.to_string(),
            name: campaign.name,
            client: campaign.client,
            start_date: campaign.start_date,
            status: campaign.status,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[get("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<ConnectionManager>,
    query: Query<StatusQuery>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    let filter = StatusFilter::from_param(query.status.as_deref());

    let body = manager::get_campaigns(&db, &filter)
        .await?
        .map_ok(CampaignBody::render)
        .try_collect()
        .await?;

    Ok(Json(body))
}

#[post("/api/campaigns")]
#[tracing::instrument(skip(db, config))]
pub async fn create_campaign(
    db: Data<ConnectionManager>,
    config: Data<Config>,
    body: Json<CreateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let body = body.into_inner();
    let campaign = NewCampaign {
        name: body.name,
        client: body.client,
        start_date: body.start_date,
        status: body.status,
    };

    let campaign = manager::create_campaign(&db, config.validation, campaign).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: Status,
}

#[put("/api/campaigns/{campaign_id}/status")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign_status(
    db: Data<ConnectionManager>,
    params: Path<String>,
    body: Json<UpdateStatusBody>,
) -> Result<Json<SuccessBody>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    manager::update_campaign_status(&db, &campaign_id, body.status).await?;

    Ok(Json(SuccessBody { success: true }))
}

#[delete("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<ConnectionManager>,
    params: Path<String>,
) -> Result<Json<SuccessBody>, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&db, &campaign_id).await?;

    Ok(Json(SuccessBody { success: true }))
}

#[derive(Clone, Debug, Serialize)]
pub struct ReportBody {
    pub filter: String,
    pub campaigns: Vec<CampaignBody>,
    pub summary: Vec<StatusCount>,
}

#[get("/api/report")]
#[tracing::instrument(skip(db))]
pub async fn get_report(
    db: Data<ConnectionManager>,
    query: Query<StatusQuery>,
) -> Result<Json<ReportBody>, Error> {
    let filter = StatusFilter::from_param(query.status.as_deref());

    let report = manager::get_report(&db, filter).await?;

    Ok(Json(ReportBody {
        filter: report.filter.as_str().to_string(),
        campaigns: report
            .campaigns
            .into_iter()
            .map(CampaignBody::render)
            .collect(),
        summary: report.summary,
    }))
}
