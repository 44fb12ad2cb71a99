use crate::{
    album::AlbumStore, alert::AlertStore, dialog::DialogStore, generation::GenerationStore,
    model_options::ModelOptionsStore,
};

/// Composition root for all client state. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct AppStores {
    pub album: AlbumStore,
    pub alert: AlertStore,
    pub dialog: DialogStore,
    pub generation: GenerationStore,
    pub model_options: ModelOptionsStore,
}

impl AppStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop per-session state. Model options are account independent and kept.
    pub fn reset_session(&self) {
        self.album.clear();
        self.alert.close();
        self.dialog.close();
        self.generation.set_generating(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::album_image::AlbumImage;

    #[test]
    fn test_clones_share_state() {
        let stores = AppStores::new();
        let handle = stores.clone();

        handle.album.add_image(AlbumImage::new(1, "https://x.com/a.png"));
        handle.generation.set_generating(true);

        assert_eq!(stores.album.len(), 1);
        assert!(stores.generation.is_generating());

        stores.reset_session();
        assert!(handle.album.is_empty());
        assert!(!handle.generation.is_generating());
    }
}
