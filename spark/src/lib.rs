mod application;
mod context;
mod error;
mod idx;
mod session;
mod sql;

pub mod cluster;
pub mod config;
pub mod scheduler;

pub use application::*;
pub use context::*;
pub use error::{SparkError, SparkResult};
pub use session::*;
pub use sql::*;

#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate eyre;

#[macro_use]
extern crate tracing;
