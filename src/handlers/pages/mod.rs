pub mod activity;
pub mod advisors;
pub mod clients;
pub mod connect;
pub mod dashboard;
pub mod integrations;
pub mod settings;
pub mod workflows;
