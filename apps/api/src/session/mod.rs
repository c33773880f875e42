// Per-session state: creation, display mode, and the gated run history.

pub mod handlers;
pub mod store;
