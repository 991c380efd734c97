//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the console session, the
//! SSH transport, process execution, the artifact probe and the config file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod probe;
pub mod session;
pub mod ssh;
