//! Wire shapes returned by the event backend before mapping into [`crate::domain::Event`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCoFacilitator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventRow {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub co_facilitators: Option<Vec<RawCoFacilitator>>,
    #[serde(default)]
    pub profiles: Option<RawProfile>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Registration status for a co-facilitator identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfileStatus {
    pub id: String,
    #[serde(default)]
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDescription {
    #[serde(default)]
    pub description: Option<String>,
}
