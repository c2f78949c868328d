//! # Session Server Library
//!
//! This library provides the authoritative server implementation for a
//! turn-based multiplayer clue game. It owns the canonical session state:
//! the round phase machine, the participant roster with scores, and the
//! clue-giver turn pointer. Clients receive and conform to the server's
//! broadcasts; nothing a client sends can mutate state directly.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! All phase transitions, turn handoffs, score changes, and roster edits
//! happen here, on a single control task. Every mutation commits before its
//! broadcast is queued, so clients never observe an event for state the
//! server has not finished writing.
//!
//! ### Replication
//! Clients converge through two complementary channels: self-contained
//! event broadcasts fired on every state change, and a full `StateSync`
//! snapshot sent each tick. A replica that misses or reorders events still
//! converges from the next snapshot.
//!
//! ### Resilience
//! Invalid input never crashes the session. Requests from non-host
//! connections, unknown names or identifiers, and empty-roster edge cases
//! all degrade to silent no-ops or documented defaults (position 0, the
//! "no one" sentinel, a lobby reset).
//!
//! ## Module Organization
//!
//! ### Roster Module (`roster`)
//! Identity bookkeeping: the id-to-name roster in first-seen order and the
//! authority-only reverse name index with stale-unregister protection.
//!
//! ### Rotation Module (`rotation`)
//! The turn rotation engine: a deterministic order derived from the roster
//! (case-insensitive name sort), a wrapping cursor that skips blank slots,
//! the round counter, and the one-shot winner seeding.
//!
//! ### Session Module (`session`)
//! The round/phase orchestrator: phase progression with per-phase
//! deadlines polled once per tick, score awards with a zero floor and an
//! immediate win cutoff, join/leave handling with turn reassignment, and
//! the versioned event outbox.
//!
//! ### Client Manager Module (`client_manager`)
//! Connection lifecycle: stable identifier assignment, address tracking,
//! host designation and migration, and the timeout sweep.
//!
//! ### Network Module (`network`)
//! UDP transport in an event-driven shape: receiver, sender, and timeout
//! tasks feeding a `tokio::select!` main loop that multiplexes packet
//! handling with the session tick.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use shared::GameConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new(
//!         "127.0.0.1:8080",
//!         GameConfig::default(),
//!         Duration::from_millis(100), // 10Hz tick
//!         16,
//!         None,
//!     )
//!     .await?;
//!
//!     // Runs the main loop: processes client requests, polls phase
//!     // deadlines, and broadcasts events plus a per-tick state snapshot.
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod network;
pub mod roster;
pub mod rotation;
pub mod session;
