//! Simulation clock, ecosystem, tick cycle and runner for the Ameba
//! simulation.
//!
//! This crate owns the fixed-order tick cycle that moves every organism
//! through perception, behavior, combat, digestion, death and mitosis,
//! and the loop that drives it under operator control.
//!
//! # Modules
//!
//! - [`balance`] -- Periodic nutrient replenishment and population floor.
//! - [`clock`] -- Fixed-step simulated clock with checked tick arithmetic.
//! - [`config`] -- Configuration loading from `ameba-config.yaml` into
//!   strongly-typed structs.
//! - [`ecosystem`] -- Organism and nutrient pools, walls, spawning and the
//!   spatial query the organisms perceive through.
//! - [`operator`] -- Stop flag, tick limit and tick interval.
//! - [`runner`] -- The async loop around [`run_tick`].
//! - [`tick`] -- The tick cycle itself.
//!
//! [`run_tick`]: tick::run_tick

pub mod balance;
pub mod clock;
pub mod config;
pub mod ecosystem;
pub mod operator;
pub mod runner;
pub mod tick;

pub use config::SimulationConfig;
pub use ecosystem::{Census, Ecosystem};
pub use operator::{OperatorState, SimulationEndReason};
pub use runner::{NoOpCallback, SimulationResult, TickCallback, run_simulation};
pub use tick::{SimulationState, TickSummary, run_tick};
