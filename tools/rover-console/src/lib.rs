//! Rover Console: terminal control panel for a remotely operated robot.
//!
//! Polls the robot server for telemetry, drives the robot from the keyboard,
//! and shows camera snapshots, the map and the movement log.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  Key   ┌──────────────┐  spawn   ┌───────────────┐
//! │ terminal │ ─────► │   Session    │ ───────► │ RobotApi task │
//! └──────────┘        │  (App state) │ ◄─────── └───────────────┘
//!      ▲              └──────────────┘  SessionEvent (mpsc)
//!      └──── ui::render(&App) ────┘
//! ```
//!
//! Only the session mutates state; every request reports back through the
//! event channel and is applied on the main loop.

pub mod api;
pub mod domain;
pub mod input;
pub mod media;
pub mod session;
pub mod ui;

pub use domain::{App, AppState};
pub use session::{ConsoleConfig, Session, SessionEvent};
