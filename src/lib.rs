pub mod auth;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod domain;
pub mod error;
pub mod reddit;
pub mod responder;

#[cfg(test)]
pub(crate) mod testing;
