//! Unit tests for rhuictl
//!
//! Structural checks over the source tree; they run fast without I/O beyond
//! reading `src/`.
