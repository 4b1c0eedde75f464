//! # Hook Relay Core
//!
//! A toggle-gated relay: a hook runner posts to a loopback endpoint and, when
//! the switch is on, the trigger is forwarded as a GET to the configured URL.
//!
//! ```text
//! hookrelay-core/src/
//! ├── modules/
//! │   ├── config.rs      # ConfigStore: load-or-bootstrap, atomic save, reload
//! │   └── controller.rs  # ToggleController: get_state()/toggle() for the UI shell
//! └── relay/
//!     ├── handler.rs     # RelayHandler: reload -> check -> forward
//!     └── server.rs      # Router + ServiceRunner (Stopped/Running)
//! ```
//!
//! The UI shell and the relay share one `Arc<ConfigStore>`.

#![cfg_attr(test, allow(clippy::panic, clippy::assertions_on_result_states))]

pub mod modules;
pub mod relay;

pub use hookrelay_types as types;

// Re-export commonly used types
pub use modules::config::ConfigStore;
pub use modules::controller::ToggleController;
pub use relay::{build_relay_router, RelayHandler, RelayOutcome, ServiceRunner};
