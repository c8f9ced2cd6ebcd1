//! Loaded font families
//!
//! Families are looked up case-insensitively. A family that was never
//! loaded resolves to the fallback font instead of failing: the atlas
//! still bakes, just in a substitute face.

use fontdue::{Font, FontSettings};
use log::{info, warn};
use std::collections::HashMap;

use crate::error::{GridError, GridResult};

/// Family name -> parsed font, plus an optional fallback
#[derive(Default)]
pub struct FontBook {
    fonts: HashMap<String, Font>,
    fallback: Option<(String, Font)>,
}

fn family_key(family: &str) -> String {
    family.trim().to_ascii_lowercase()
}

fn parse_font(family: &str, data: &[u8]) -> GridResult<Font> {
    Font::from_bytes(data, FontSettings::default()).map_err(|e| GridError::Font {
        family: family.to_string(),
        reason: e.to_string(),
    })
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a family
    pub fn insert(&mut self, family: &str, data: &[u8]) -> GridResult<()> {
        let font = parse_font(family, data)?;
        info!("Font family registered: \"{}\"", family);
        self.fonts.insert(family_key(family), font);
        Ok(())
    }

    /// Parse and set the font used for unknown families
    pub fn set_fallback(&mut self, name: &str, data: &[u8]) -> GridResult<()> {
        let font = parse_font(name, data)?;
        info!("Fallback font: \"{}\"", name);
        self.fallback = Some((name.to_string(), font));
        Ok(())
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&family_key(family))
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Registered family keys (lowercase)
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Font for `family`, or the fallback font when the family is not loaded
    pub fn resolve(&self, family: &str) -> Option<&Font> {
        if let Some(font) = self.fonts.get(&family_key(family)) {
            return Some(font);
        }
        match &self.fallback {
            Some((name, font)) => {
                warn!(
                    "Font family \"{}\" not loaded, substituting \"{}\"",
                    family, name
                );
                Some(font)
            }
            None => None,
        }
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.fonts.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.as_ref().map(|(name, _)| name))
            .finish()
    }
}
