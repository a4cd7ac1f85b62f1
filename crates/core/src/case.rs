//! Read-only test-case input model.
//!
//! Cases are loaded once per process from a JSON file and indexed by id.
//! The engine never mutates them; generator plugins read the referenced
//! image paths directly.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One benchmark test case: an id plus generator-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Path to the scene template image the generators transform.
    #[serde(default)]
    pub template_image: Option<String>,
    /// Paths to avatar images, in swap order.
    #[serde(default)]
    pub avatars: Vec<String>,
    /// Free-form instruction text passed through to the generator.
    #[serde(default)]
    pub instructions: Option<String>,
}

impl TestCase {
    /// Minimal stand-in for a case whose metadata is missing.
    ///
    /// Execution does not stop on a missing case: the gateway receives
    /// this stub and surfaces the problem as a placeholder artifact.
    pub fn stub(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            template_image: None,
            avatars: Vec::new(),
            instructions: None,
        }
    }
}

/// An id-indexed, immutable set of test cases.
#[derive(Debug, Clone, Default)]
pub struct CaseSet {
    cases: HashMap<String, TestCase>,
    /// Ids in file order, for deterministic "all cases" resolution.
    order: Vec<String>,
}

impl CaseSet {
    /// Build a set from already-parsed cases. Later duplicates of an id
    /// replace earlier ones.
    pub fn new(cases: Vec<TestCase>) -> Self {
        let mut map = HashMap::with_capacity(cases.len());
        let mut order = Vec::with_capacity(cases.len());
        for case in cases {
            let id = case.id.clone();
            if map.insert(id.clone(), case).is_none() {
                order.push(id);
            }
        }
        Self { cases: map, order }
    }

    /// Load cases from a JSON array file. A missing file yields an empty
    /// set rather than an error, matching the behavior of running the
    /// benchmark before any dataset exists.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CaseLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CaseLoadError::Io(path.display().to_string(), e))?;
        let cases: Vec<TestCase> = serde_json::from_str(&raw)
            .map_err(|e| CaseLoadError::Parse(path.display().to_string(), e))?;
        Ok(Self::new(cases))
    }

    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cases.contains_key(id)
    }

    /// All case ids, in file order.
    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Failure reading or parsing the case file.
#[derive(Debug, thiserror::Error)]
pub enum CaseLoadError {
    #[error("failed to read case file {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("failed to parse case file {0}: {1}")]
    Parse(String, #[source] serde_json::Error),
}
