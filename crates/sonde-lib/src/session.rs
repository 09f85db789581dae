use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Floor for the microsecond component, so two calls landing in the same
/// microsecond still produce distinct identifiers.
static LAST_MICROS: AtomicU64 = AtomicU64::new(0);

/// A client-generated correlation string distinguishing calls to the same
/// endpoint. Derived from wall-clock time at two resolutions
/// (`{prefix}-{secs}-{micros}`); never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate(prefix: &str) -> Self {
        let micros = unique_micros();
        Self(format!("{prefix}-{}-{micros}", micros / 1_000_000))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn unique_micros() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_micros() as u64;
    let mut last = LAST_MICROS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_MICROS.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}
