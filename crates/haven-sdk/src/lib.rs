//! Haven SDK - client access to the safety backend plus local live
//! risk monitoring that matches the server's evaluation exactly.

pub mod client;
pub mod monitor;

pub use client::{HavenClient, RemoteEvaluation, SosOutcome};
pub use monitor::{DisplayState, LevelChange, LiveMonitor, MonitorStatus};
