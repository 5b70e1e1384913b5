use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::services::admin::TeamDraw;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RandomizeRequest {
    #[validate(length(min = 2, message = "select at least 2 people"))]
    pub people: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RandomizeResponse {
    pub draw: TeamDraw,
    pub message: String,
}
