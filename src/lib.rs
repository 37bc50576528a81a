pub mod config;
pub mod edit;
pub mod engine;
pub mod gate;
pub mod store;
pub mod world;
