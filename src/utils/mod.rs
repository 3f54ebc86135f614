pub mod password;
pub mod jwt;
pub mod email;
