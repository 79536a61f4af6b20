// Page renderers - turn datasets into chart/map descriptions
pub mod analysis;
pub mod live;
pub mod maps;
pub mod text;
pub mod trends;
