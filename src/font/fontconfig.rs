//! System font lookup through fontconfig (feature `system-fonts`)
//!
//! fontconfig answers every query with its closest match, so a lookup for
//! "Cabin Sketch" on a machine without it comes back as DejaVu Sans. Named
//! lookups therefore only succeed when the returned family name agrees with
//! the requested one; substitution is left to [`FontBook`](super::FontBook).

use fontconfig::Fontconfig;
use log::{debug, info, warn};
use std::path::PathBuf;

use super::loader::normalize_name;

/// Generic faces tried, in order, when a fallback is needed
const FALLBACK_FAMILIES: [&str; 4] = ["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial"];

/// Open fontconfig handle
pub struct SystemFonts {
    fc: Fontconfig,
}

impl SystemFonts {
    pub fn open() -> Option<Self> {
        match Fontconfig::new() {
            Some(fc) => Some(Self { fc }),
            None => {
                warn!("fontconfig unavailable, skipping system font lookup");
                None
            }
        }
    }

    /// File for `family`, only if fontconfig's answer is that family
    pub fn family_path(&self, family: &str) -> Option<PathBuf> {
        let found = self.fc.find(family, None)?;
        if same_family(family, &found.name) {
            info!(
                "fontconfig: \"{}\" -> {}",
                family,
                found.path.display()
            );
            Some(found.path)
        } else {
            debug!(
                "fontconfig: \"{}\" answered with \"{}\", ignoring",
                family, found.name
            );
            None
        }
    }

    /// First installed generic face
    pub fn fallback_path(&self) -> Option<PathBuf> {
        FALLBACK_FAMILIES
            .iter()
            .find_map(|family| self.family_path(family))
    }
}

/// The returned name must start with the requested one
///
/// "CabinSketch" matches "Cabin Sketch" and "Cabin" matches "Cabin Condensed",
/// but "Cabin" returned for "Cabin Sketch" is a substitute.
fn same_family(requested: &str, returned: &str) -> bool {
    let want = normalize_name(requested);
    !want.is_empty() && normalize_name(returned).starts_with(&want)
}

pub fn find_family_path(family: &str) -> Option<PathBuf> {
    SystemFonts::open()?.family_path(family)
}

pub fn find_fallback_path() -> Option<PathBuf> {
    SystemFonts::open()?.fallback_path()
}
