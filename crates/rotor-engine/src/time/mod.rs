//! Time subsystem.
//!
//! Rotation is a pure function of session time, so the clock reports time
//! elapsed since the session started alongside the usual per-frame delta.
//! One `SessionClock` per window; call `tick()` once per presented frame.

mod session_clock;

pub use session_clock::{FrameTime, SessionClock};
