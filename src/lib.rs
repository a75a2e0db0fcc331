//! # Particle Engine
//!
//! A high-performance 2D particle simulation core built with Rust.
//!
//! ## Features
//!
//! - **Fixed-Capacity Pool**: Pre-allocated particle slots with O(1)
//!   compacting removal, zero allocation per frame
//! - **Draw Ordering**: Doubly linked ordering with Top/Bottom/Random
//!   insertion policies, traversed read-only by the host renderer
//! - **Emission Scheduling**: Rate accumulator with emitter lifetime
//!   countdown, plus explicit bursts via `emit`
//! - **Kinematics**: Radial/tangential/linear acceleration, spin
//!   interpolation, size and color keyframe curves over particle age
//! - **Deterministic Sampling**: Injectable, seedable random source for
//!   reproducible simulations
//! - **ECS Integration**: `bevy_ecs` component and update system
//!
//! ## Architecture Design
//!
//! The particle system is strictly single-threaded: all mutation happens
//! inside `update(dt)`, invoked once per simulation tick. The renderer
//! walks the draw order between updates and treats particle fields as
//! read-only snapshots.
//!
//! ### Example
//!
//! ```ignore
//! use particle_engine::render::particles::{EffectPreset, ParticleSystem};
//!
//! let mut system = ParticleSystem::new(1000)?;
//! system.set_config(EffectPreset::Fire.config())?;
//! system.start();
//! system.update(1.0 / 60.0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core engine functionality
//! - [`ecs`]: Entity Component System integration
//! - [`render`]: Particle simulation core
//! - [`config`]: Configuration system

/// Core engine functionality including error definitions
pub mod core;
/// Entity Component System integration
pub mod ecs;
/// Rendering-facing particle simulation core
pub mod render;
/// Configuration system
pub mod config;
