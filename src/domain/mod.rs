pub mod ai;
pub mod downs;
pub mod entity;
pub mod field;
