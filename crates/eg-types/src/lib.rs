pub mod config;
pub mod errors;
pub mod info;
pub mod record;

pub use config::*;
pub use errors::*;
pub use info::*;
pub use record::*;
