//! Crates the console and downstream users build against, pinned to the
//! versions this library uses.
pub use {adjustp,
         anyhow,
         itertools,
         log,
         ndarray,
         pretty_env_logger,
         serde,
         serde_json,
         statrs,
         tempfile};
