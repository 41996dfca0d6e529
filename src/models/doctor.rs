use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StaffId;

/// A doctor as listed by the scheduler API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: StaffId,
    pub first_name: String,
    pub last_names: String,
    #[serde(default)]
    pub email: Option<String>,
    pub status: String,
}

impl Doctor {
    pub const AVAILABLE: &'static str = "AVAILABLE";

    /// Only available doctors can be picked as wanted or unwanted on a day
    pub fn is_available(&self) -> bool {
        self.status == Self::AVAILABLE
    }
}
