//! World substrate for the Ameba simulation.
//!
//! Everything here is agnostic of organism behavior: pooled storage with
//! a reset contract, nutrient pellets, hazard walls, a minimal kinematic
//! integrator, and the spatial query trait the core perceives through.
//!
//! # Modules
//!
//! - [`pool`] -- Bounded `SlotMap` pool with the acquire/release/reset contract
//! - [`nutrient`] -- Nutrient pellets with a single-writer claim flag
//! - [`hazard`] -- Wall rectangles and nearest-boundary-point queries
//! - [`kinematics`] -- Damping, speed cap, integration and arena bounds
//! - [`spatial`] -- The `SpatialQuery` trait
//! - [`error`] -- Error types

pub mod error;
pub mod hazard;
pub mod kinematics;
pub mod nutrient;
pub mod pool;
pub mod spatial;

pub use error::WorldError;
pub use hazard::{Hazard, WallContact};
pub use kinematics::{Bounds, Motion};
pub use nutrient::{NUTRIENT_RADIUS, Nutrient, NutrientSeed};
pub use pool::{Placement, Pool, Resettable};
pub use spatial::SpatialQuery;
