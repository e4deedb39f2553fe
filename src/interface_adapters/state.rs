use crate::use_cases::MatchRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Live matches, shared by every connection.
    pub registry: Arc<MatchRegistry>,
}
