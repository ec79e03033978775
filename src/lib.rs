//! Terminal fireworks: rockets launch, burst into fading sparks and fall
//! under simple per-frame physics, with parameters tunable while running.
//!
//! [`sim`] holds the simulation core and knows nothing about terminals.
//! [`render`] rasterizes its primitives into half-block cells.

pub mod clock;
pub mod input;
pub mod render;
pub mod sim;
