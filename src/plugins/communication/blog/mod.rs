pub mod models;
pub mod ledger;
pub mod status;
pub mod service;
pub mod handlers;
pub mod plugin;
pub mod repo;

pub use models::*;
pub use service::BlogService;
pub use plugin::BlogPlugin;

#[cfg(test)]
mod tests;
