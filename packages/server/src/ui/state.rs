//! Shared application state handed to the axum handlers.

use std::sync::Arc;

use crate::domain::IdentityResolver;
use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetHistoryUseCase, SendMessageUseCase,
};

/// Everything the handlers need, wired once at startup.
pub struct AppState {
    pub connect_session: Arc<ConnectSessionUseCase>,
    pub disconnect_session: Arc<DisconnectSessionUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
    pub get_history: Arc<GetHistoryUseCase>,
    pub resolver: Arc<dyn IdentityResolver>,
}
