//! Background tasks module
//! 
//! This module contains the tasks that run for the lifetime of the program.

pub mod clock_driver;
pub mod console;
pub mod display;

// Re-export main functions
pub use clock_driver::{spawn_clock_driver, ClockTask};
pub use console::console_task;
pub use display::countdown_display_task;
