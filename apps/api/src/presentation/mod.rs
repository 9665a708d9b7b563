// Presentation layer: view models for the three states, the download artifact
// and the embedded browser page.

pub mod download;
pub mod phrases;
pub mod ui;
pub mod view;
