use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

pub mod dashboard;
pub mod db;
pub mod endpoints;
mod id;
pub mod manager;
pub mod pages;

pub use id::CampaignId;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client: String,
    #[serde(rename = "startDate", default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
}

/// A campaign that has not been inserted yet; the store assigns its `_id`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewCampaign {
    pub name: String,
    pub client: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    pub status: Status,
}

impl NewCampaign {
    pub fn into_campaign(self, id: CampaignId) -> Campaign {
        Campaign {
            id,
            name: self.name,
            client: self.client,
            start_date: self.start_date,
            status: self.status,
        }
    }
}

pub static STATUS_OPTIONS: [Status; 3] = [Status::Active, Status::Paused, Status::Completed];

/// Status of a campaign. Values outside the known options are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Active,
    Paused,
    Completed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Active => "Active",
            Status::Paused => "Paused",
            Status::Completed => "Completed",
            Status::Other(status) => status,
        }
    }
}

impl Default for Status {
    fn default() -> Status {
        Status::Other(String::new())
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(status: String) -> Status {
        match status.as_str() {
            "Active" => Status::Active,
            "Paused" => Status::Paused,
            "Completed" => Status::Completed,
            _ => Status::Other(status),
        }
    }
}

impl From<&str> for Status {
    fn from(status: &str) -> Status {
        Status::from(status.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> String {
        match status {
            Status::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

pub const ALL: &str = "All";

/// Filter applied when listing campaigns. The sentinel `"All"` (or nothing at
/// all) disables filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn from_param(param: Option<&str>) -> StatusFilter {
        match param {
            None | Some("") | Some(ALL) => StatusFilter::All,
            Some(status) => StatusFilter::Only(status.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => ALL,
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, status: &Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl Default for StatusFilter {
    fn default() -> StatusFilter {
        StatusFilter::All
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
