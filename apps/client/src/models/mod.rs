pub mod document;
pub mod history;
pub mod scan;
pub mod suggestions;

use serde::{Deserialize, Deserializer};

pub use document::DocumentHandle;
pub use history::HistoryEntry;
pub use scan::ScanResult;
pub use suggestions::AiSuggestionResult;

/// Decodes a missing or `null` sequence as empty. The service omits lists it
/// has nothing to say about, and some saved scans carry explicit nulls.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    null_as_default(deserializer)
}

/// Decodes a missing or `null` value as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
