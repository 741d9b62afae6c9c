pub mod commands;
pub mod source;
pub mod trace_init;
