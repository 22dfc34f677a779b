//! # Engine Surface
//!
//! The host-engine capability surface: the minimal set of identity, damage,
//! and world types the death pipeline consumes, plus the narrow adapter
//! traits it uses to reach back into the engine. Nothing here knows about
//! attribution; this crate is the contract between the host and the pipeline.
//!
//! ## Core Components
//!
//! - **entities**: entity/player ids, victim snapshots, resolved capabilities
//! - **damage**: the engine's damage-type tags and pre-damage payload
//! - **world**: session time and celestial bodies
//! - **host**: adapter traits (entity resolution, vitals, attacker probing,
//!   body catalog, clock) and the two hook observer interfaces

pub mod damage;
pub mod entities;
pub mod host;
pub mod world;

pub use damage::*;
pub use entities::*;
pub use host::*;
pub use world::*;
