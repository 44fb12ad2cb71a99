//! The album image list shown in the workspace gallery.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    models::album_image::{AlbumImage, ImageId},
    store::Store,
};

#[derive(Debug, Clone, Default)]
pub struct AlbumStore {
    inner: Store<Vec<AlbumImage>>,
}

impl AlbumStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> Vec<AlbumImage> {
        self.inner.get()
    }

    pub fn len(&self) -> usize {
        self.inner.read(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.inner.read(|images| images.iter().any(|img| img.id == id))
    }

    pub fn find(&self, id: ImageId) -> Option<AlbumImage> {
        self.inner
            .read(|images| images.iter().find(|img| img.id == id).cloned())
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Vec<AlbumImage>> {
        self.inner.subscribe()
    }

    /// Replace the whole list. Later records repeating an id are dropped.
    pub fn set_images(&self, images: Vec<AlbumImage>) {
        self.inner.replace(dedup_by_id(images));
    }

    /// Append a page of results, skipping ids the list already holds.
    pub fn append_images(&self, images: Vec<AlbumImage>) -> usize {
        let mut added = 0;
        self.inner.update(|current| {
            let mut seen: HashSet<ImageId> = current.iter().map(|img| img.id).collect();
            for image in images {
                if seen.insert(image.id) {
                    current.push(image);
                    added += 1;
                }
            }
            added > 0
        });
        added
    }

    /// Put freshly generated images at the front, newest first.
    pub fn prepend_images(&self, images: Vec<AlbumImage>) -> usize {
        let mut added = 0;
        self.inner.update(|current| {
            let mut seen: HashSet<ImageId> = current.iter().map(|img| img.id).collect();
            let fresh: Vec<AlbumImage> = images
                .into_iter()
                .filter(|img| seen.insert(img.id))
                .collect();
            added = fresh.len();
            if added == 0 {
                return false;
            }
            let mut next = fresh;
            next.append(current);
            *current = next;
            true
        });
        added
    }

    pub fn add_image(&self, image: AlbumImage) -> bool {
        self.inner.update(|current| {
            if current.iter().any(|img| img.id == image.id) {
                return false;
            }
            current.push(image);
            true
        })
    }

    /// Drop the image with `id`. Unknown ids leave the list untouched.
    pub fn remove_image(&self, id: ImageId) -> bool {
        let removed = self.inner.update(|current| {
            let before = current.len();
            current.retain(|img| img.id != id);
            current.len() != before
        });
        if !removed {
            debug!(image_id = id, "remove_image: id not in album, ignoring");
        }
        removed
    }

    /// Swap in a newer copy of an image already in the list.
    pub fn update_image(&self, image: AlbumImage) -> bool {
        self.inner.update(|current| {
            match current.iter_mut().find(|img| img.id == image.id) {
                Some(slot) if *slot != image => {
                    *slot = image;
                    true
                }
                _ => false,
            }
        })
    }

    pub fn set_collected(&self, id: ImageId, collected: bool) -> bool {
        self.inner.update(|current| {
            match current.iter_mut().find(|img| img.id == id) {
                Some(img) if img.collected != collected => {
                    img.collected = collected;
                    true
                }
                _ => false,
            }
        })
    }

    /// Empty the album, e.g. on logout.
    pub fn clear(&self) {
        self.inner.update(|current| {
            if current.is_empty() {
                return false;
            }
            current.clear();
            true
        });
    }
}

fn dedup_by_id(images: Vec<AlbumImage>) -> Vec<AlbumImage> {
    let mut seen = HashSet::with_capacity(images.len());
    images.into_iter().filter(|img| seen.insert(img.id)).collect()
}
