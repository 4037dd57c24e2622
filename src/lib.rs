//! # Volcano Viewer
//!
//! An interactive real-time 3D volcano rendered with wgpu.
//!
//! ## Features
//!
//! - **Procedural terrain**: a noisy cone with a crater, shaft and lava plane, flat-shaded
//! - **CPU particles**: ballistic lava with ground impacts and buoyant smoke, in fixed pools
//! - **Camera**: orbit rotation, zoom, free eye movement, perspective/orthographic
//! - **Input**: keyboard and mouse mapped to commands on the camera and the particle system
//! - **Configuration**: TOML/JSON files plus environment overrides
//!
//! ## Architecture Design
//!
//! A single [`core::App`] aggregates the [`scene::World`] (mesh + camera), the
//! [`render::particles::ParticleSystem`] and the [`input::InputController`]. Every frame the
//! app builds a GPU-independent [`render::RenderGraph`], which [`render::WgpuRenderer`]
//! executes.
//!
//! ### Example
//!
//! ```
//! use volcano_viewer::config::AppConfig;
//! use volcano_viewer::core::App;
//!
//! let mut config = AppConfig::default();
//! config.particles.seed = Some(1);
//! let mut app = App::new(&config);
//! app.update(1.0 / 60.0);
//! assert!(app.particles.alive_lava() > 0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: App aggregate, main loop and errors
//! - [`render`]: Terrain, particles and the wgpu backend
//! - [`scene`]: World and camera
//! - [`input`]: Command mapping
//! - [`platform`]: Window abstraction and winit event translation
//! - [`config`]: Configuration
//! - [`math`]: Vector and matrix helpers

/// App aggregate, main loop and error types
pub mod core;
/// Platform abstraction over winit
pub mod platform;
/// Terrain, particles and wgpu rendering
pub mod render;
/// Configuration system
pub mod config;
/// Scene: world and camera
pub mod scene;
/// Keyboard and mouse command mapping
pub mod input;
/// Math kernel over glam
pub mod math;
