use thiserror::Error;

/// Error taxonomy for `swipe-core`. Every non-recoverable failure the
/// engine can surface to a caller has exactly one variant here; `Overflow`
/// is not a variant because it is handled locally by the swipe kernel and
/// never escapes to a caller.
#[derive(Error, Debug)]
pub enum Error {
  #[error("database format error: {0}")]
  DatabaseFormat(String),

  #[error("database version error: {0}")]
  DatabaseVersion(String),

  #[error("database is incomplete: {0}")]
  DatabaseIncomplete(String),

  #[error("input format error: {0}")]
  InputFormat(String),

  #[error("traceback failed: {0}")]
  Traceback(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
