//! Library catalog
//!
//! Books, members and loans held in memory by one owned [`Catalog`] and
//! written back to two JSON stores after every change, driven by an
//! interactive text menu.

pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod repository;
pub mod services;

pub use crate::config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use services::Catalog;
