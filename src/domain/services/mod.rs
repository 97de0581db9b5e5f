pub mod access_service;
pub mod session_service;
