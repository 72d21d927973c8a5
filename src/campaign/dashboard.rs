//! Dashboard pages. Every interaction re-renders the whole page; store
//! failures and validation problems are shown inline instead of as error
//! responses.

use actix_web::web::{Data, Form, Path, Query};
use actix_web::{get, post, route, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use serde::Deserialize;

use crate::config::ValidationPolicy;
use crate::database::ConnectionManager;
use crate::error::Error;
use crate::views::{self, escape, Nav, NoticeKind};

use super::pages::ReportForm;
use super::{manager, Campaign, NewCampaign, Status, StatusFilter};

const FILL_IN_WARNING: &str = "Please fill in the campaign name and client name.";

fn page(section: &str, current: &'static str, content: &str) -> HttpResponse {
    let nav = Nav {
        links: &[
            ("/dashboard/new", "New Campaign"),
            ("/dashboard/alter", "Alter Campaigns"),
            ("/dashboard/report", "Reports"),
        ],
        current,
    };
    let content = format!("<h2>{}</h2>\n{}", escape(section), content);
    views::html(views::layout("Campaign Tracker", &nav, &content))
}

#[get("/dashboard")]
pub async fn index() -> HttpResponse {
    views::see_other("/dashboard/new")
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewCampaignForm {
    pub name: String,
    pub client: String,
    pub start_date: String,
    pub status: String,
}

fn new_campaign_form(form: &NewCampaignForm) -> String {
    format!(
        "<form method=\"post\" action=\"/dashboard/new\">\n\
         <label>Campaign Name <input name=\"name\" value=\"{}\"></label>\n\
         <label>Client Name <input name=\"client\" value=\"{}\"></label>\n\
         <label>Start Date <input type=\"date\" name=\"start_date\" value=\"{}\"></label>\n\
         <label>Status {}</label>\n\
         <button>Add Campaign</button>\n</form>",
        escape(&form.name),
        escape(&form.client),
        escape(&form.start_date),
        views::status_select("status", &Status::from(form.status.as_str())),
    )
}

fn blank_form() -> NewCampaignForm {
    NewCampaignForm {
        start_date: Utc::now().date_naive().to_string(),
        status: Status::Active.to_string(),
        ..NewCampaignForm::default()
    }
}

#[route("/dashboard/new", method = "GET", method = "POST")]
#[tracing::instrument(skip(db))]
pub async fn new_campaign(
    db: Data<ConnectionManager>,
    form: Option<Form<NewCampaignForm>>,
) -> HttpResponse {
    let (notice, form) = match form {
        None => (String::new(), blank_form()),
        Some(form) => {
            let form = form.into_inner();
            let campaign = NewCampaign {
                name: form.name.clone(),
                client: form.client.clone(),
                start_date: form.start_date.clone(),
                status: form.status.as_str().into(),
            };
            match manager::create_campaign(&db, ValidationPolicy::Strict, campaign).await {
                Ok(_) => (
                    views::notice(NoticeKind::Success, "Campaign added"),
                    blank_form(),
                ),
                Err(Error::MissingField { .. }) => {
                    (views::notice(NoticeKind::Warning, FILL_IN_WARNING), form)
                }
                Err(err) => (views::notice(NoticeKind::Warning, &err.describe()), form),
            }
        }
    };

    let content = format!("{}\n{}", notice, new_campaign_form(&form));
    page("Add New Campaign", "/dashboard/new", &content)
}

fn edit_section(campaigns: &[Campaign]) -> String {
    let mut section = String::from("<hr>\n<h3>Edit individual campaigns</h3>\n");
    for campaign in campaigns {
        section.push_str(&format!(
            "<details><summary>{name} \u{2014} {client}</summary>\n\
             <p>Start Date: {start_date}</p>\n\
             <form method=\"post\" action=\"/dashboard/alter/{id}/update\">{select} \
             <button>Update</button></form>\n\
             <form method=\"post\" action=\"/dashboard/alter/{id}/delete\">\
             <button>Delete</button></form>\n</details>\n",
            name = escape(&campaign.name),
            client = escape(&campaign.client),
            start_date = escape(&campaign.start_date),
            id = campaign.id,
            select = views::status_select("status", &campaign.status),
        ));
    }
    section
}

async fn alter_page(db: &ConnectionManager, notice: String) -> HttpResponse {
    let listing: Result<Vec<Campaign>, Error> =
        match manager::get_campaigns(db, &StatusFilter::All).await {
            Ok(campaigns) => campaigns.try_collect().await,
            Err(err) => Err(err),
        };

    let body = match listing {
        Err(err) => views::notice(NoticeKind::Warning, &err.describe()),
        Ok(campaigns) if campaigns.is_empty() => views::notice(
            NoticeKind::Info,
            "No campaigns found. Add one from 'New Campaign'.",
        ),
        Ok(campaigns) => format!(
            "{}\n{}",
            views::campaign_table(&campaigns, None),
            edit_section(&campaigns)
        ),
    };

    let content = format!("{}\n{}", notice, body);
    page("Alter Campaigns", "/dashboard/alter", &content)
}

#[get("/dashboard/alter")]
#[tracing::instrument(skip(db))]
pub async fn alter_campaigns(db: Data<ConnectionManager>) -> HttpResponse {
    alter_page(&db, String::new()).await
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
}

#[post("/dashboard/alter/{campaign_id}/update")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<ConnectionManager>,
    params: Path<String>,
    form: Form<StatusForm>,
) -> HttpResponse {
    let campaign_id = params.into_inner();
    let status = form.into_inner().status.into();

    let notice = match manager::update_campaign_status(&db, &campaign_id, status).await {
        Ok(()) => views::notice(NoticeKind::Success, "Updated"),
        Err(err) => views::notice(NoticeKind::Warning, &err.describe()),
    };

    alter_page(&db, notice).await
}

#[post("/dashboard/alter/{campaign_id}/delete")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: Data<ConnectionManager>, params: Path<String>) -> HttpResponse {
    let campaign_id = params.into_inner();

    let notice = match manager::delete_campaign(&db, &campaign_id).await {
        Ok(()) => views::notice(NoticeKind::Warning, "Deleted"),
        Err(err) => views::notice(NoticeKind::Warning, &err.describe()),
    };

    alter_page(&db, notice).await
}

#[route("/dashboard/report", method = "GET", method = "POST")]
#[tracing::instrument(skip(db, form, query))]
pub async fn report(
    db: Data<ConnectionManager>,
    form: Option<Form<ReportForm>>,
    query: Option<Query<ReportForm>>,
) -> HttpResponse {
    let filter = ReportForm::filter(form, query);

    let selector = format!(
        "<form method=\"post\" action=\"/dashboard/report\">\n\
         <label>Filter by Status {}</label> <button>Apply</button>\n</form>",
        views::filter_select("status_filter", &filter),
    );

    let body = match manager::get_report(&db, filter).await {
        Err(err) => views::notice(NoticeKind::Warning, &err.describe()),
        Ok(report) if report.campaigns.is_empty() => views::notice(
            NoticeKind::Info,
            "No campaigns match the selected filter.",
        ),
        Ok(report) => format!(
            "{}\n<hr>\n<h3>Summary</h3>\n{}",
            views::campaign_table(&report.campaigns, None),
            views::summary_table(&report.summary),
        ),
    };

    let content = format!("{}\n{}", selector, body);
    page("Campaigns Report", "/dashboard/report", &content)
}
