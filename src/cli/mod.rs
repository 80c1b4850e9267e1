// Command-line front end module

pub mod app;

pub use app::{init_logging, run, Cli};
