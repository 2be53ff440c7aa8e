//! Request and response bodies for advertisement endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::advertisement::Advertisement;
use crate::domain::foundation::AdvertisementId;

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveQuery {
    pub airport: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementResponse {
    pub success: bool,
    pub advertisement: Advertisement,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecordedResponse {
    pub success: bool,
    pub views: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementDeletedResponse {
    pub success: bool,
    pub advertisement_id: AdvertisementId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmergencyRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyResponse {
    pub success: bool,
    pub emergency_mode: bool,
    pub previous: bool,
}
