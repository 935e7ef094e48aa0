use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque handle to an externally managed image.
///
/// The core never inspects a handle; the number of handles in a sequence
/// only determines the animation cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// External collaborator supplying image sequences by category name.
pub trait ImageStore {
    /// The ordered image handles registered under `category`. An unknown
    /// category yields an empty sequence.
    fn get_images(&self, category: &str) -> Vec<ImageHandle>;
}

/// Map-backed [`ImageStore`] for tests and embedders without an asset
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: HashMap<String, Vec<ImageHandle>>,
}

impl MemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `images` under `category`, replacing any existing sequence.
    pub fn insert(&mut self, category: impl Into<String>, images: Vec<ImageHandle>) {
        self.images.insert(category.into(), images);
    }
}

impl ImageStore for MemoryImageStore {
    fn get_images(&self, category: &str) -> Vec<ImageHandle> {
        self.images.get(category).cloned().unwrap_or_default()
    }
}
