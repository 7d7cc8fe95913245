//! Core library for TaskFlow
//!
//! This crate contains the task-management logic, including:
//! - Task model, validation and persistence
//! - The filter/sort pipeline that derives the displayed list
//! - The task list controller that keeps an in-memory cache in sync

pub mod config;
pub mod controller;
pub mod error;
pub mod task;
pub mod view;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
