//! Opaque copies of editable model state.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// A deep copy of model state, held in serialized form so later edits to the
/// model can never reach into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot(serde_json::Value);

impl Snapshot {
    /// Capture any serde model.
    pub fn of<T: Serialize + ?Sized>(state: &T) -> Result<Self> {
        Ok(Self(serde_json::to_value(state)?))
    }

    /// Rebuild the captured state.
    pub fn restore_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.0)?)
    }
}

/// Capture/restore capability the history needs from the host model.
pub trait Snapshotting {
    fn capture(&self) -> Result<Snapshot>;
    fn restore(&mut self, snapshot: &Snapshot) -> Result<()>;
}
