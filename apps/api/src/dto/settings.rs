use scanboard_domain::Setting;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// API representation of a global setting.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/setting-response.ts"
)]
pub struct SettingResponse {
    pub id: i64,
    pub key: String,
    pub label: String,
    #[ts(type = "string | number")]
    pub value: Value,
    pub description: String,
}

impl From<Setting> for SettingResponse {
    fn from(setting: Setting) -> Self {
        Self {
            id: setting.id(),
            key: setting.key().as_str().to_owned(),
            label: setting.label().as_str().to_owned(),
            value: setting.value().to_json(),
            description: setting.description().to_owned(),
        }
    }
}

/// Incoming payload for a setting update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-setting-request.ts"
)]
pub struct UpdateSettingRequest {
    pub key: String,
    #[ts(type = "unknown")]
    pub value: Value,
}
