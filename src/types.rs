//! Core type definitions for the configuration core.
//!
//! This module defines the fundamental types used throughout topology
//! assembly and parameter validation.

/// Controller instance identity within its kind.
///
/// Versions are zero-based and densely assigned in declaration order,
/// one independent sequence per controller kind. Downstream topology
/// and addressing logic uses them to index per-core structures.
pub type Version = u32;

/// Cache line size in bytes.
///
/// Must be a power of two so that low-order address bits can serve as
/// the block offset.
pub type LineSize = u64;
