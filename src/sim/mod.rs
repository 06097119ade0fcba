pub mod event;
pub mod schedule;
pub mod setup;
pub mod step;
pub mod world;
