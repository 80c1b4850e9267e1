// Utilities shared by the command-line front end

pub mod file_ops;

pub use file_ops::{read_text_file, write_text_file, TextSink, TextSource};
