mod analysis;
pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod session;
pub mod summary;

pub use analysis::analysis_text;
pub use api::Mode;
pub use config::{default_path, Config};
pub use error::Error;
pub use error::Result;
pub use session::Session;
