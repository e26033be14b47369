//! Entity Module

pub mod child;
pub mod company;
pub mod link;
