//! Product Model

use serde::{Deserialize, Serialize};

/// Number of secondary image slots on a product record.
pub const IMAGE_SLOT_COUNT: usize = 5;

/// Fixed-size list of secondary image URLs.
///
/// The storefront API expects exactly five entries; an empty string marks an
/// unset slot. Slots stay fully populated so a record round-trips without
/// dropping positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ImageSlots([String; IMAGE_SLOT_COUNT]);

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `url` into the slot at `index`. Returns `false` if the index is
    /// out of range.
    pub fn set(&mut self, index: usize, url: impl Into<String>) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = url.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Slots that actually hold a URL, in order. This is the display view;
    /// the wire view always carries all five.
    pub fn populated(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|url| !url.is_empty()).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for ImageSlots {
    fn default() -> Self {
        Self(std::array::from_fn(|_| String::new()))
    }
}

impl From<Vec<String>> for ImageSlots {
    fn from(urls: Vec<String>) -> Self {
        let mut slots = Self::default();
        for (slot, url) in slots.0.iter_mut().zip(urls) {
            *slot = url;
        }
        slots
    }
}

impl From<ImageSlots> for Vec<String> {
    fn from(slots: ImageSlots) -> Self {
        slots.0.to_vec()
    }
}

/// Codec for the enabled flag, which travels as 0/1 on the wire. Any nonzero
/// value decodes as enabled.
pub mod enabled_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(if *value { 1 } else { 0 })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}

/// Product entity as returned by the storefront API.
///
/// Records are never edited in place; changes go through a [`ProductDraft`]
/// and only replace the record after the server acknowledges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Pricing unit shown next to the sale price (e.g. "kg").
    pub unit: String,
    pub origin_price: u32,
    pub price: u32,
    pub description: String,
    pub content: String,
    /// 0=disabled, 1=enabled
    #[serde(with = "enabled_flag")]
    pub is_enabled: bool,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(rename = "imagesUrl", default)]
    pub images_url: ImageSlots,
}

/// Working copy bound to a create/edit form.
///
/// Same wire shape as [`Product`], but the id is absent until the server has
/// assigned one. Discarded on cancel; never stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub origin_price: u32,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// 0=disabled, 1=enabled
    #[serde(with = "enabled_flag")]
    pub is_enabled: bool,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(rename = "imagesUrl", default)]
    pub images_url: ImageSlots,
}

impl ProductDraft {
    /// Blank draft for the create form. New products start enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from an existing record, for the edit form.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            title: product.title.clone(),
            category: product.category.clone(),
            unit: product.unit.clone(),
            origin_price: product.origin_price,
            price: product.price,
            description: product.description.clone(),
            content: product.content.clone(),
            is_enabled: product.is_enabled,
            image_url: product.image_url.clone(),
            images_url: product.images_url.clone(),
        }
    }

    /// Update one secondary image slot. Returns `false` if the index is out
    /// of range; the slot count never changes.
    pub fn set_image(&mut self, index: usize, url: impl Into<String>) -> bool {
        self.images_url.set(index, url)
    }
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            category: String::new(),
            unit: String::new(),
            origin_price: 0,
            price: 0,
            description: String::new(),
            content: String::new(),
            is_enabled: true,
            image_url: String::new(),
            images_url: ImageSlots::new(),
        }
    }
}

/// Parse a numeric form field the way the admin form does: a cleared or
/// unparseable value is 0, never an error.
pub fn coerce_price(input: &str) -> u32 {
    input.trim().parse().unwrap_or(0)
}
