//! Maud editor core
//!
//! The editing session that ties the animation core to checkpoint history:
//! loading source and target models, editing the bone mapping, retargeting
//! animations, and undo/redo over all of it.

pub mod config;
pub mod model;
pub mod session;

pub use config::SessionConfig;
pub use model::{EditorModel, ModelAsset};
pub use session::Session;
