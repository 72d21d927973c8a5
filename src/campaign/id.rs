use std::fmt::{Debug, Display};
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier assigned by the store when a campaign is inserted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(ObjectId);

impl CampaignId {
    pub fn new() -> CampaignId {
        CampaignId(ObjectId::new())
    }

    pub fn parse(s: &str) -> Result<CampaignId, Error> {
        s.parse()
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Debug for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Display::fmt(self, f)
    }
}

impl FromStr for CampaignId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(CampaignId)
            .map_err(|_| Error::InvalidIdentifier { id: s.to_string() })
    }
}

impl From<ObjectId> for CampaignId {
    fn from(id: ObjectId) -> CampaignId {
        CampaignId(id)
    }
}

impl From<CampaignId> for Bson {
    fn from(id: CampaignId) -> Bson {
        Bson::ObjectId(id.0)
    }
}
