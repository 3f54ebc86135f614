pub mod token_service;
pub mod profile_service;
pub mod cashback_service;
