use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Ways a subscriber session can fail.
///
/// These never cross the round boundary: the client absorbs each of them
/// into a failed [`ClientOutcome`](wsload_core::ClientOutcome).
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("connect failed: {0}")]
    Connect(tungstenite::Error),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("transport error: {0}")]
    Transport(tungstenite::Error),

    #[error("server closed the session")]
    ServerClosed,

    #[error("no pong within {0:?}")]
    KeepAlive(Duration),
}
