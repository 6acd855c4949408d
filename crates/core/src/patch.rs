//! Presence-tagged fields for partial updates.
//!
//! A plain `Option<T>` cannot tell "leave this column alone" from "set this
//! column to NULL". [`Patch`] keeps the two apart: a missing JSON key
//! deserializes to [`Patch::Absent`], any present value (including `null`
//! when `T` is an `Option`) to [`Patch::Set`].

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value unchanged.
    #[default]
    Absent,
    /// Overwrite the stored value.
    Set(T),
}

// Fields must also carry `#[serde(default)]` so a missing key becomes `Absent`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}
