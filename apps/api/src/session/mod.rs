// Application Controller: the in-memory single-user session, its state machine,
// the async orchestration around it and the HTTP handlers exposing it.

pub mod controller;
pub mod handlers;
pub mod service;
mod ticker;
