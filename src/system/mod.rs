//! # System Interaction Layer
//!
//! Boundaries between the core logic and the outside world: the network,
//! the filesystem walk, the terminal and the settings file.
//!
//! ## Modules
//!
//! - **`http`**: The `HttpClient` seam and its `reqwest` implementation. Maps
//!   transport failures onto `HttpError`, with timeouts kept distinct.
//! - **`prompt`**: The `Confirm` seam used before destructive actions, backed
//!   by `dialoguer` on a terminal.
//! - **`scanner`**: Breadth-first discovery of command files under a root.
//! - **`settings`**: Loading and validating `config.toml`.

pub mod http;
pub mod prompt;
pub mod scanner;
pub mod settings;
