pub mod profile;
pub mod script;
