use serde::Serialize;
use stockledger_application::DirectoryOption;
use stockledger_core::UserIdentity;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub tenant_id: String,
    pub roles: Vec<String>,
}

impl From<&UserIdentity> for UserIdentityResponse {
    fn from(value: &UserIdentity) -> Self {
        Self {
            subject: value.subject().to_owned(),
            display_name: value.display_name().to_owned(),
            email: value.email().map(str::to_owned),
            tenant_id: value.tenant_id().to_string(),
            roles: value.roles().to_vec(),
        }
    }
}

/// One selectable option for a foreign-key picker.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/directory-option-response.ts"
)]
pub struct DirectoryOptionResponse {
    pub id: String,
    pub label: String,
}

impl From<DirectoryOption> for DirectoryOptionResponse {
    fn from(value: DirectoryOption) -> Self {
        Self {
            id: value.id,
            label: value.label,
        }
    }
}
