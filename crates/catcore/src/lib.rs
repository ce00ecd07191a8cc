// SPDX-License-Identifier: MIT

//! CAT (Computer-Aided Transceiver) protocol core.
//!
//! Layers, leaves first: wire-level codecs ([`codec`], [`civ`],
//! [`elecraft`]), the per-model command set ([`model`]) and capability
//! registry ([`capabilities`]), the serial session ([`session`]), the state
//! cache ([`cache`]), and the unified [`controller`] that composes all of
//! the above behind one model-agnostic operation API.

pub mod cache;
pub mod capabilities;
pub mod civ;
pub mod codec;
pub mod config;
pub mod controller;
pub mod elecraft;
pub mod error;
pub mod model;
pub mod session;

pub use cache::CacheStatistics;
pub use config::RigConfig;
pub use controller::{
    ConfigureRequest, Controller, ControllerState, DualReceiverHandle, MemoryChannel, RitState,
};
pub use error::{CatError, CatResult};
pub use model::{Mode, ModelId, Vfo};
pub use session::{Session, SessionState};
