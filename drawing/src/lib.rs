//! Shared drawing board state machine for the Skysite portfolio.
//!
//! This crate is pure: it owns the stroke document model, the client-side
//! draw session (pending strokes, bounded undo history, optimistic merge
//! with polled server state), and the deterministic render plan. It never
//! performs I/O. The `server` crate reuses the document merge rule; the
//! `cli` crate drives a [`session::DrawSession`] over HTTP.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`stroke`] | Point and stroke types plus their wire format |
//! | [`doc`] | The shared board document and the append-merge rule |
//! | [`history`] | Bounded ring of undo snapshots |
//! | [`session`] | The client draw session and its save/clear/undo protocol |
//! | [`render`] | Deterministic render plan for confirmed + pending strokes |

pub mod doc;
pub mod history;
pub mod render;
pub mod session;
pub mod stroke;
