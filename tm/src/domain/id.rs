//! Task ID generation and resolution
//!
//! New IDs are UUIDv7 strings. IDs loaded from storage are kept verbatim,
//! whatever their shape (the seed task uses `"1"`).

/// Number of characters shown for a short ID
const SHORT_LEN: usize = 8;

/// Opaque, stable task identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Get the full ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing characters of the ID, for display
    ///
    /// UUIDv7 IDs created close together share their leading timestamp bits,
    /// so the random tail is what tells them apart.
    pub fn short(&self) -> &str {
        let count = self.0.chars().count();
        if count <= SHORT_LEN {
            return &self.0;
        }
        match self.0.char_indices().nth(count - SHORT_LEN) {
            Some((start, _)) => &self.0[start..],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// ID resolution for partial matches
pub struct IdResolver<'a> {
    ids: Vec<&'a TaskId>,
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: impl IntoIterator<Item = &'a TaskId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match (an exact match always wins)
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<TaskId>, Vec<TaskId>> {
        if reference.is_empty() {
            return Ok(None);
        }

        if let Some(exact) = self.ids.iter().find(|id| id.as_str() == reference) {
            return Ok(Some((*exact).clone()));
        }

        let mut matches: Vec<TaskId> = self
            .ids
            .iter()
            .filter(|id| id.as_str().starts_with(reference) || id.as_str().ends_with(reference))
            .map(|id| (*id).clone())
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(matches),
        }
    }
}
