//! Infrastructure layer for the server.
//!
//! Contains the OS-facing adapters: the serial link to the tracker
//! hardware, network sockets (registry + multiplexer), and file-system
//! configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tracker_core`, but MUST NOT be imported by `tracker_core`.

pub mod network;
pub mod storage;
pub mod tracker_link;
