// Simulation systems operating on a borrowed match state.

pub mod ai;
pub mod paddle;
pub mod physics;
pub mod scoring;
