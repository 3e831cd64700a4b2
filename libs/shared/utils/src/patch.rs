//! Helpers for partial-update request bodies.

use serde::{Deserialize, Deserializer};

/// Tells an absent field apart from an explicit `null` in a patch body.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent gives `None`, `null` gives `Some(None)`, and a
/// value gives `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
