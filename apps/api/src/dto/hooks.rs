use fieldgate_domain::FieldDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Field descriptor the host is about to render.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/load-field-request.ts"
)]
pub struct LoadFieldRequest {
    #[ts(type = "Record<string, unknown>")]
    pub field: FieldDescriptor,
}

/// Field descriptor after render-time enforcement.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/load-field-response.ts"
)]
pub struct LoadFieldResponse {
    #[ts(type = "Record<string, unknown>")]
    pub field: FieldDescriptor,
}

/// Submitted value for one field of one entity.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-value-request.ts"
)]
pub struct UpdateValueRequest {
    #[ts(type = "Record<string, unknown>")]
    pub field: FieldDescriptor,
    pub entity_id: String,
    #[ts(type = "unknown")]
    pub value: Value,
}

/// Value accepted for persistence.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-value-response.ts"
)]
pub struct UpdateValueResponse {
    #[ts(type = "unknown")]
    pub value: Value,
    pub reverted: bool,
}
