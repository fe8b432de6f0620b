//! Preprocessing passes shipped with this crate.

mod translate_attributes;

pub use translate_attributes::{TranslateAttributePass, TRANSLATE_ATTRIBUTE_PASS};
