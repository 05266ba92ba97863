//! Use case layer: one struct per gateway operation, depending on
//! domain traits only.

mod connect_session;
mod disconnect_session;
mod get_history;
mod send_message;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use get_history::{GetHistoryError, GetHistoryUseCase};
pub use send_message::{SendMessageUseCase, SendOutcome};
