/// Terminal record of one simulated subscriber session.
///
/// Produced exactly once per client task and never mutated afterwards. A
/// failed outcome may still carry non-zero counters for frames delivered
/// before the failure.
#[derive(Debug, Clone)]
pub struct ClientOutcome {
    pub ok: bool,
    /// Data frames received (text and binary).
    pub msgs: u64,
    /// Payload bytes received; text frames count their UTF-8 length.
    pub bytes: u64,
    pub error: Option<String>,
    /// Time to an established session, or time-to-failure when `ok` is false.
    pub connect_ms: f64,
    /// Time spent in the receive phase; zero on every failure path.
    pub run_s: f64,
}

impl ClientOutcome {
    /// Failure with nothing delivered and no usable timings.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            msgs: 0,
            bytes: 0,
            error: Some(error.into()),
            connect_ms: 0.0,
            run_s: 0.0,
        }
    }
}
