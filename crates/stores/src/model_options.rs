//! Size and variation-type choices for the design generator.
//!
//! Both lists are only ever replaced wholesale; there is no incremental merge.

use std::collections::HashSet;

use crate::{
    models::model_option::{ModelOption, ModelOptions},
    store::Store,
};

#[derive(Debug, Clone, Default)]
pub struct ModelOptionsStore {
    inner: Store<ModelOptions>,
}

impl ModelOptionsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> ModelOptions {
        self.inner.get()
    }

    pub fn sizes(&self) -> Vec<ModelOption> {
        self.inner.read(|options| options.sizes.clone())
    }

    pub fn variation_types(&self) -> Vec<ModelOption> {
        self.inner.read(|options| options.variation_types.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.inner
            .read(|options| !options.sizes.is_empty() || !options.variation_types.is_empty())
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ModelOptions> {
        self.inner.subscribe()
    }

    pub fn set_sizes(&self, sizes: Vec<ModelOption>) {
        let sizes = dedup_by_id(sizes);
        self.inner.update(|options| replace_if_changed(&mut options.sizes, sizes));
    }

    pub fn set_variation_types(&self, variation_types: Vec<ModelOption>) {
        let variation_types = dedup_by_id(variation_types);
        self.inner
            .update(|options| replace_if_changed(&mut options.variation_types, variation_types));
    }

    pub fn set_options(&self, options: ModelOptions) {
        let next = ModelOptions {
            sizes: dedup_by_id(options.sizes),
            variation_types: dedup_by_id(options.variation_types),
        };
        self.inner.update(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

fn replace_if_changed(slot: &mut Vec<ModelOption>, next: Vec<ModelOption>) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}

fn dedup_by_id(options: Vec<ModelOption>) -> Vec<ModelOption> {
    let mut seen = HashSet::with_capacity(options.len());
    options
        .into_iter()
        .filter(|option| seen.insert(option.id.clone()))
        .collect()
}
