pub mod auth;
pub mod cache;
pub mod filter;
pub mod pagination;
pub mod sale;
pub mod settings;
pub mod sort;
