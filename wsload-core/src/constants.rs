use std::time::Duration;

/// Upper bound on establishing a session, handshake included.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cadence of liveness pings on an open session.
pub const PING_INTERVAL: Duration = Duration::from_secs(20);

/// How long an outstanding ping may go unanswered before the peer is
/// considered dead.
pub const PING_TIMEOUT: Duration = Duration::from_secs(20);

/// Best-effort window for the closing handshake after a successful run.
pub const CLOSE_GRACE: Duration = Duration::from_secs(2);
