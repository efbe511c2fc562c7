// Application state for HTTP handlers
use crate::application::report_service::ReportService;
use crate::infrastructure::config::CredentialPresence;

#[derive(Clone)]
pub struct AppState {
    pub report_service: ReportService,
    /// Captured once at startup.
    pub credentials: CredentialPresence,
}

impl AppState {
    pub fn new(report_service: ReportService, credentials: CredentialPresence) -> Self {
        Self {
            report_service,
            credentials,
        }
    }
}
