//! # Session Client Library
//!
//! This library provides the client-side implementation for the turn-based
//! clue game. The client is non-authoritative by construction: it holds a
//! read-only replica of the session state and converges on whatever the
//! server broadcasts, no matter how its own requests were handled.
//!
//! ## Architecture Overview
//!
//! ### Fire-and-forget Requests
//! Every client action (joining the roster, seeding the first clue-giver,
//! advancing a phase) is a request with no return value. The server
//! validates it and silently drops anything invalid; the client learns the
//! outcome only from subsequent broadcasts, or from their absence.
//!
//! ### Replica Convergence
//! Two broadcast streams feed the replica. Event packets announce each
//! state change as a self-contained payload, and a full `StateSync`
//! snapshot arrives every server tick. Snapshots are version-gated so a
//! reordered or stale snapshot can never roll observable state backwards;
//! a missed event is corrected by the next snapshot.
//!
//! ### Latency Tolerance
//! The network layer can simulate round-trip latency (`--fake-ping`) to
//! exercise convergence under delay. Nothing in the client depends on
//! broadcasts arriving promptly or in order.
//!
//! ## Module Organization
//!
//! ### Replica Module (`replica`)
//! The converging state copy: applies events and snapshots, tracks the
//! local identifier, and answers "is it my turn to give the clue?".
//!
//! ### Network Module (`network`)
//! UDP communication: the connect handshake, heartbeats that keep the
//! connection alive through the server's timeout sweep, request sending,
//! and the console command loop.

pub mod network;
pub mod replica;
