//! Value Object Module

pub mod gender;
pub mod unique_code;
