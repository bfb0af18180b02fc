pub mod bindings;
pub mod manager;

pub use bindings::{BindingError, BindingStore, PgBindingStore};
pub use manager::DatabaseManager;
