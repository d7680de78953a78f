//! Client-side services for TaskFlow: the task repository over the remote
//! record store, the task list controller, and the application context.
pub mod config;
pub mod context;
pub mod controller;
pub mod notice;
pub mod record_store;
pub mod repository;
pub mod session;
pub mod theme;
