// handlers/mod.rs - HTTP entry points
//
// Public: `/`, `/health`
// Session-aware pages: everything under `pages`, behind `session_middleware`.
// Tenant-scoped pages additionally run through the tenant gate.

pub mod health;
pub mod pages;
pub mod respond;
