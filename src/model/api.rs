use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct HealthDto {
    pub status: String,
}

/// Result of a job run triggered through the dispatch endpoint.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct JobRunDto {
    pub job: String,
    pub summary: String,
}
