pub mod api;
pub mod config;
pub mod controller;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod server;
