use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role decay state stored by the Discord settings service.
///
/// User ids are Discord snowflakes encoded as strings, timestamps are Unix seconds.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoleDecaySeedDto {
    #[serde(default)]
    pub last_interactions: HashMap<String, i64>,
    #[serde(default)]
    pub dont_want: Vec<String>,
}
