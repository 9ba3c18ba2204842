//! Poll rendering for the console

pub mod console;
pub mod table;

pub use console::ConsoleDisplay;
