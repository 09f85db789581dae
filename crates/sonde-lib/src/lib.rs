//! Sonde core library.
//!
//! Shared plumbing for the diagnostic probes in `sonde-runner`:
//! - endpoint identity and session-id generation for the agent runtime
//! - the invocation client with transport-outcome classification
//! - strict response parsing with an explicit "unparseable" path
//! - the raw TCP connection-stability probe

pub mod client;
pub mod constants;
pub mod endpoint;
pub mod payload;
pub mod response;
pub mod session;
pub mod stability;

pub use client::{ClientOptions, Invocation, ProbeError, RuntimeClient};
pub use endpoint::AgentEndpoint;
pub use response::TaskReport;
pub use session::SessionId;
pub use stability::{StabilityOptions, StabilityOutcome};
