pub mod normalizer;
pub mod sales_service;
pub mod sort_service;
