//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{child::Child, company::Company, link::ParentChildLink};
pub use repository::ChildrenRepository;
pub use value_object::{gender::Gender, unique_code::UniqueCode};
