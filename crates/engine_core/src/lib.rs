//! Core engine types and utilities for Frontier.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Time management
//! - Axis-aligned grid rectangles for world features

pub mod rect;
pub mod time;
pub mod transform;

pub use rect::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
