//! dutylog - Duty Report Library
//!
//! A conversational attendance form: users report a check-in or check-out
//! step by step, every answer passes anti-spoofing checks, and finished
//! reports are stored and broadcast.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
