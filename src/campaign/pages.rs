use actix_web::web::{Data, Form, Json, Path, Query};
use actix_web::{get, post, route, HttpResponse};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::ConnectionManager;
use crate::error::Error;
use crate::views::{self, Nav, NoticeKind, RowActions, SITE_NAV};

use super::{manager, Campaign, NewCampaign, Status, StatusFilter};

fn nav(current: &'static str) -> Nav<'static> {
    Nav {
        links: SITE_NAV.links,
        current,
    }
}

#[get("/")]
#[tracing::instrument(skip(db))]
pub async fn home(db: Data<ConnectionManager>) -> HttpResponse {
    let diagnostic = match db.database().await {
        Ok(_) => String::new(),
        Err(Error::NotConfigured) => views::notice(
            NoticeKind::Warning,
            "No database connection string is configured. Set MONGO_URI \
             (or CAMPAIGN_TRACKER_DEV=1 for a local database) and restart.",
        ),
        Err(err) => views::notice(NoticeKind::Warning, &err.describe()),
    };

    let content = format!(
        "{}\n<p>Track marketing campaigns for your clients.</p>\n\
         <h2>Add Campaign</h2>\n\
         <form method=\"post\" action=\"/add\">\n\
         <label>Campaign Name <input name=\"name\"></label>\n\
         <label>Client <input name=\"client\"></label>\n\
         <label>Start Date <input type=\"date\" name=\"start-date\"></label>\n\
         <label>Status {}</label>\n\
         <button>Add Campaign</button>\n</form>",
        diagnostic,
        views::status_select("status", &Status::Active),
    );

    views::html(views::layout("Campaign Tracker", &nav("/"), &content))
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn list_campaigns(db: Data<ConnectionManager>) -> Result<HttpResponse, Error> {
    let campaigns: Vec<Campaign> = manager::get_campaigns(&db, &StatusFilter::All)
        .await?
        .try_collect()
        .await?;

    let update = |campaign: &Campaign| format!("/update/{}", campaign.id);
    let delete = |campaign: &Campaign| format!("/delete/{}", campaign.id);
    let actions = RowActions {
        update_action: &update,
        delete_action: &delete,
    };
    let content = views::campaign_table(&campaigns, Some(&actions));

    Ok(views::html(views::layout(
        "Campaigns",
        &nav("/campaigns"),
        &content,
    )))
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddCampaignForm {
    pub name: String,
    pub client: String,
    #[serde(rename = "start-date")]
    pub start_date: String,
    pub status: String,
}

#[post("/add")]
#[tracing::instrument(skip(db, config))]
pub async fn add_campaign(
    db: Data<ConnectionManager>,
    config: Data<Config>,
    form: Form<AddCampaignForm>,
) -> Result<HttpResponse, Error> {
    let form = form.into_inner();
    let campaign = NewCampaign {
        name: form.name,
        client: form.client,
        start_date: form.start_date,
        status: form.status.into(),
    };

    manager::create_campaign(&db, config.validation, campaign).await?;

    Ok(views::see_other("/campaigns"))
}

#[post("/delete/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<ConnectionManager>,
    params: Path<String>,
) -> Result<HttpResponse, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&db, &campaign_id).await?;

    Ok(views::see_other("/campaigns"))
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
}

#[post("/update/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<ConnectionManager>,
    params: Path<String>,
    form: Form<StatusForm>,
) -> Result<HttpResponse, Error> {
    let campaign_id = params.into_inner();
    let status = form.into_inner().status.into();

    manager::update_campaign_status(&db, &campaign_id, status).await?;

    Ok(views::see_other("/campaigns"))
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportForm {
    pub status_filter: Option<String>,
}

impl ReportForm {
    /// The submitted form takes precedence over the query string.
    pub fn filter(form: Option<Form<ReportForm>>, query: Option<Query<ReportForm>>) -> StatusFilter {
        let param = form
            .and_then(|form| form.into_inner().status_filter)
            .or_else(|| query.and_then(|query| query.into_inner().status_filter));
        StatusFilter::from_param(param.as_deref())
    }
}

#[route("/report", method = "GET", method = "POST")]
#[tracing::instrument(skip(db, form, query))]
pub async fn report(
    db: Data<ConnectionManager>,
    form: Option<Form<ReportForm>>,
    query: Option<Query<ReportForm>>,
) -> Result<HttpResponse, Error> {
    let filter = ReportForm::filter(form, query);
    let campaigns: Vec<Campaign> = manager::get_campaigns(&db, &filter)
        .await?
        .try_collect()
        .await?;

    let content = format!(
        "<form method=\"post\" action=\"/report\">\n\
         <label>Filter by Status {}</label> <button>Apply</button>\n</form>\n\
         <p>Showing: {}</p>\n{}",
        views::filter_select("status_filter", &filter),
        views::escape(filter.as_str()),
        views::campaign_table(&campaigns, None),
    );

    Ok(views::html(views::layout(
        "Campaigns Report",
        &nav("/report"),
        &content,
    )))
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

#[get("/health")]
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}
