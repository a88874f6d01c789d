//! Operations module
//!
//! Coordinates the publish pipeline, its temporary artifacts and run timing

pub mod artifacts;
pub mod elapsed;
pub mod publish;

pub use artifacts::*;
pub use elapsed::*;
pub use publish::*;
