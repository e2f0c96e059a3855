pub mod body;
pub mod prelude;
pub mod registry;
