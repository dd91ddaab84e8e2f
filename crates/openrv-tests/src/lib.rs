//! Integration test crate for the OpenRV session engine.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core, color and session crates to verify they work
//! together through the public session surface.

#[cfg(test)]
mod color;


#[cfg(test)]
mod playback;

#[cfg(test)]
mod annotations;

#[cfg(test)]
mod driver;
