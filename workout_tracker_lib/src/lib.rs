pub mod coordinates;
pub mod form;
pub mod map;
pub mod render;
pub mod session;
pub mod storage;
pub mod workout;

mod config;
mod error;

pub use config::*;
pub use error::*;
