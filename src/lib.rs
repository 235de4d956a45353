//! A small interactive shell for tidying up a directory of video footage.
//!
//! The tool reads one command per line and sorts files into folders by
//! extension, permanently deletes recognized files older than an age
//! threshold, or regroups files into subfolders named after their
//! modification date. Which extensions are recognized, the help texts and
//! the startup banner all come from a single JSON configuration file loaded
//! once at startup.
//!
//! The main entry point is [`Interpreter`], which owns a [`Session`] (the
//! loaded [`Config`] plus the directory the shell currently operates on) and
//! dispatches each input line to one of the six instructions. The filesystem
//! work itself lives in [`ops`].

pub mod command;
pub mod config;
mod interpreter;
pub mod ops;
pub mod session;

pub use config::Config;
pub use interpreter::Interpreter;
pub use session::Session;
