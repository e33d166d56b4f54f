pub mod bounds;
pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod layout;
pub mod map;
pub mod room;
pub mod viewport;
