//! Entity Module

pub mod refresh_token;
pub mod reset_token;
pub mod user;
