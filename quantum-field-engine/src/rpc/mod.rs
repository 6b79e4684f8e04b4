//! Bridge between the engine and the page hosting its canvas.
//!
//! The host talks JSON-RPC 2.0 over `postMessage`:
//!
//! ```text
//! Host page  <──postMessage──>  Bevy (canvas)
//!     │                              │
//!     ├─ Request (with ID) ────────> │ ─ routed, side effect applied
//!     │ <───────── Response (ID) ────┤
//!     │                              │
//!     ├─ Notification (no ID) ─────> │ ─ routed, no response
//!     │ <────── Notification ────────┤ ─ milestones, fps, loop state
//! ```
//!
//! ## Methods
//!
//! - `get_fps`: smoothed frame rate
//! - `get_narrative_state`: loop state, manifest flag, portal clicks and stage, scroll offset
//! - `render_loop`: `{ "action": "start" | "stop" | "dispose" }`
//! - `portal_click`: same as clicking the portal overlay
//! - `scroll_changed`: `{ "scroll_y": f32 }` for hosts that scroll around the canvas
//!
//! ## Notifications
//!
//! `fps_update`, `manifest_activated`, `portal_opened`, `transmission_initiated`,
//! `transmission_requested`, `render_loop_state`.
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//!
//! Malformed messages are logged and dropped.

/// JSON-RPC message routing and the outgoing queue.
pub mod web_rpc;

/// Page scroll and pagehide listeners.
pub mod host_events;
