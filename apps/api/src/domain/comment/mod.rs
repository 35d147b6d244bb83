pub mod convert;
pub mod entity;
pub mod errors;
pub mod repository;
pub mod rows;
pub mod value_objects;
