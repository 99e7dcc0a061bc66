//! Animation parameters - the bridge between gameplay and animation playback.
//!
//! Gameplay code never drives clips directly. It writes named parameters
//! (bools, integers, layer weights, one-shot triggers) to an [`Animator`],
//! the same way a state-machine animator is fed. Playback reads them.

mod animator;
mod plugin;

pub use animator::*;
pub use plugin::AnimationPlugin;
