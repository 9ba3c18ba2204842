//! Use cases of the application layer

pub mod run_poll;
