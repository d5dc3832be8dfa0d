//! Host-side helpers for the `pivot-layout` crate.
//!
//! The `pivot-layout` crate is UI-agnostic and only decides what goes where. This crate provides
//! small, framework-neutral pieces most hosts end up writing:
//!
//! - A per-type view pool that several layouts can share
//! - An [`pivot_layout::ItemProvider`] that creates, binds and recycles views through that pool
//! - A controller that lays out on demand and paces smooth scrolls with an easing ramp
//!
//! This crate is intentionally framework-agnostic.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod pacer;
mod pool;
mod provider;


pub use controller::Controller;
pub use pacer::{Easing, ScrollPacer};
pub use pool::{SharedViewPool, ViewPool, ViewType};
pub use provider::{ItemSource, PoolStats, Pooled, PooledProvider};
