pub mod bot;
pub mod client;
pub mod config;
pub mod controller;
pub mod count;
pub mod display;
pub mod errors;
pub mod models;
pub mod page;
pub mod state;
pub mod storage;

pub use client::{CountingService, HttpCounterClient};
pub use config::{CounterConfig, IncrementMethod};
pub use controller::VisitCounterController;
pub use errors::CounterError;
pub use models::{Action, Outcome, Visibility};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
