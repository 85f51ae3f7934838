pub mod cli;
pub mod clipboard;
pub mod driver;
pub mod payload;
pub mod process;
pub mod resolver;
