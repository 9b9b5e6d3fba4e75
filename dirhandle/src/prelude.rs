#[allow(unused_imports)]
pub use common::log::{debug, error, info, trace, warn};

pub use anyhow::{anyhow, Context, Result};
pub use thiserror::Error;

pub use common::libc;
pub use std::io;

pub use crate::errors::DirError;
