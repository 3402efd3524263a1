use stockledger_application::{DirectoryService, RecordService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub record_service: RecordService,
    pub directory_service: DirectoryService,
    pub frontend_url: String,
    pub session_token: String,
}
