//! Wishlist Core - Shared types library.
//!
//! This crate provides the types shared by every wishlist component:
//! - `sync` - Shopify clients, the synchronization protocol and its surfaces
//! - `cli` - Operator tooling (metafield provisioning, wishlist inspection)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and lets the protocol be tested without a network.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, product records, money, the identifier list and settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
