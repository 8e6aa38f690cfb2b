//! Input/output helpers shared by the loaders and the CLI.

pub mod io;
