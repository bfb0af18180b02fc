pub mod backend;
pub mod gate;
pub mod tenant_resolver;

pub use backend::{BackendClient, FetchError};
pub use gate::{GateOutcome, GateRun, PageGate, Phase};
pub use tenant_resolver::{TenantResolution, TenantResolver};
