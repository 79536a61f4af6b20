// Domain layer - Registries, measurements and view models
pub mod chart;
pub mod error;
pub mod location;
pub mod observation;
pub mod page;
