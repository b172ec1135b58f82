use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an item is in the lost-and-found flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Lost,
    Found,
    /// Returned to its owner; set when the claimer confirms receipt.
    Claimed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Lost => "LOST",
            ItemStatus::Found => "FOUND",
            ItemStatus::Claimed => "CLAIMED",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOST" => Ok(ItemStatus::Lost),
            "FOUND" => Ok(ItemStatus::Found),
            "CLAIMED" => Ok(ItemStatus::Claimed),
            other => Err(format!("unknown item status '{other}'")),
        }
    }
}

/// A reported lost or found object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    /// The reporting user. For found items this is the finder.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for reporting an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ItemStatus,
    pub owner_id: Uuid,
}

impl Item {
    pub fn from_new(new: NewItem) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: new.title,
            description: new.description,
            status: new.status,
            owner_id: new.owner_id,
            created_at: Utc::now(),
        }
    }
}
