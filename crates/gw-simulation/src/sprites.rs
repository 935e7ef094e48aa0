use gw_core::images::{ImageHandle, ImageStore};

/// Image sequences for every entity kind.
///
/// Resolved once against the external image store when a simulation is
/// constructed; factories read from here instead of passing the store
/// around. Miners keep the same sequence across the full/not-full
/// transformation.
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    /// Frames for miners, carried across state transformations.
    pub miner: Vec<ImageHandle>,
    /// Frames for veins.
    pub vein: Vec<ImageHandle>,
    /// Frames for ore.
    pub ore: Vec<ImageHandle>,
    /// Frames for ore blobs.
    pub blob: Vec<ImageHandle>,
    /// Frames for quakes.
    pub quake: Vec<ImageHandle>,
    /// Frames for blacksmiths.
    pub blacksmith: Vec<ImageHandle>,
    /// Frames for obstacles.
    pub obstacle: Vec<ImageHandle>,
}

impl SpriteSet {
    /// Resolve every category name against `store`. Unknown categories
    /// yield empty sequences, which disables animation for that kind.
    pub fn load(store: &dyn ImageStore) -> Self {
        Self {
            miner: store.get_images("miner"),
            vein: store.get_images("vein"),
            ore: store.get_images("ore"),
            blob: store.get_images("blob"),
            quake: store.get_images("quake"),
            blacksmith: store.get_images("blacksmith"),
            obstacle: store.get_images("obstacle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_core::images::MemoryImageStore;

    #[test]
    fn load_resolves_known_categories() {
        let mut store = MemoryImageStore::new();
        store.insert("miner", vec![ImageHandle(1), ImageHandle(2)]);
        store.insert("quake", vec![ImageHandle(3)]);

        let sprites = SpriteSet::load(&store);
        assert_eq!(sprites.miner.len(), 2);
        assert_eq!(sprites.quake, vec![ImageHandle(3)]);
        assert!(sprites.vein.is_empty());
    }
}
