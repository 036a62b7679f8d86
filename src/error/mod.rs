mod types;

pub use types::{PluginFailure, Result, RouterError};
