//! Showcase gallery of dream/image pairs. New entries go to the front.

use serde::Serialize;
use std::collections::VecDeque;

pub const MAX_ITEMS: usize = 12;
const TITLE_CHARS: usize = 50;

/// Shown by the browser when a gallery image fails to load.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=600&fit=crop";

const SAMPLES: &[(&str, &str, &str)] = &[
    (
        "I was flying over a beautiful purple flower field with rainbow clouds",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=600&fit=crop",
        "2024-01-15",
    ),
    (
        "梦见我在一片紫色的花海中漫步，天空中有彩虹",
        "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=400&h=600&fit=crop",
        "2024-01-14",
    ),
    (
        "Soñé que estaba en un jardín mágico lleno de mariposas doradas",
        "https://images.unsplash.com/photo-1534796636912-3b95b3ab5986?w=400&h=600&fit=crop",
        "2024-01-13",
    ),
    (
        "梦见自己在星空下漫步，周围是闪烁的萤火虫",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=600&fit=crop",
        "2024-01-12",
    ),
    (
        "I dreamed of a crystal palace floating in the clouds",
        "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=400&h=600&fit=crop",
        "2024-01-11",
    ),
    (
        "梦见自己变成了一只蝴蝶，在花丛中自由飞翔",
        "https://images.unsplash.com/photo-1534796636912-3b95b3ab5986?w=400&h=600&fit=crop",
        "2024-01-10",
    ),
    (
        "Soñé que nadaba en un océano de estrellas brillantes",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=600&fit=crop",
        "2024-01-09",
    ),
    (
        "梦见自己在一个充满魔法森林的世界里探险",
        "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=400&h=600&fit=crop",
        "2024-01-08",
    ),
    (
        "I was walking through a corridor of mirrors reflecting infinite possibilities",
        "https://images.unsplash.com/photo-1534796636912-3b95b3ab5986?w=400&h=600&fit=crop",
        "2024-01-07",
    ),
    (
        "梦见自己坐在月亮上，俯瞰着整个地球",
        "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=600&fit=crop",
        "2024-01-06",
    ),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub title: String,
    pub dream: String,
    pub image_url: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DreamGallery {
    items: VecDeque<GalleryItem>,
}

impl DreamGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gallery seeded with the curated samples. Each sample is pushed in table
    /// order, so the last row leads and the showcase reads earliest date first.
    pub fn with_samples() -> Self {
        let mut gallery = Self::new();
        for (dream, image_url, date) in SAMPLES {
            gallery.push(dream, image_url, date);
        }
        gallery
    }

    /// Adds an entry at the front and drops the oldest past [`MAX_ITEMS`].
    pub fn push(&mut self, dream: &str, image_url: &str, date: &str) {
        self.items.push_front(GalleryItem {
            title: title_for(dream),
            dream: dream.to_string(),
            image_url: image_url.to_string(),
            date: date.to_string(),
        });
        self.items.truncate(MAX_ITEMS);
    }

    pub fn items(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn title_for(dream: &str) -> String {
    if dream.chars().count() > TITLE_CHARS {
        let head: String = dream.chars().take(TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        dream.to_string()
    }
}
