// Application layer - Use cases and business logic
pub mod clock;
pub mod live_service;
pub mod memo;
pub mod page_service;
pub mod random_source;
pub mod rolling_window;
pub mod sample_generator;
pub mod session;
pub mod snapshot_builder;
pub mod statistics;
pub mod views;
