pub mod env_config;
pub mod error;
pub mod http;
pub mod stripe;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
