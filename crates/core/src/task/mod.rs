//! Task module
//!
//! This module contains the task model, its persistence and the
//! repository operations built on top of it.

mod model;
mod service;
mod storage;
pub mod validation;

pub use model::*;
pub use service::TaskService;
pub use storage::{
    generate_id, FileTaskStorage, MemoryTaskStorage, TaskStorage, DEFAULT_STORAGE_KEY,
};
pub use validation::ValidationError;
