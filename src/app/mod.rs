// Application layer: turns a dispatch report into output for the CLI.

pub mod dispatch;
