#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn};

pub use thiserror::Error;

pub use std::io;
