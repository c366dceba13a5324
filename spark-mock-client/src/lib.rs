mod config;
mod job;

pub use config::*;
pub use job::*;

#[macro_use]
extern crate tracing;
