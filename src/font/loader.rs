//! Font loading
//!
//! Font files are located and read on a background thread. Each requested
//! family gets a one-shot [`FontReady`] that fires once the family is
//! available (or known to be unavailable). Callers await it before baking.
//!
//! Search order for a family:
//! 1. Explicit path in the request
//! 2. fontconfig (feature `system-fonts`)
//! 3. Font directories (system, user data dir)

use anyhow::{anyhow, Result};
use futures_util::future::join_all;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;

use super::book::FontBook;

/// Environment variable overriding the fallback font file
pub const FONT_ENV: &str = "GLYPHGRID_FONT";

/// Directory recursion limit when scanning font directories
const MAX_SCAN_DEPTH: usize = 4;

/// A family to load
#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    pub family: String,
    /// Font file to use instead of searching
    pub path: Option<PathBuf>,
}

impl FontRequest {
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Readiness notification payload
#[derive(Debug, Clone)]
pub struct FontActive {
    /// Requested family name
    pub family: String,
    /// File the data was read from
    pub source: Option<PathBuf>,
    /// Font file bytes (None = family unavailable)
    pub data: Option<Vec<u8>>,
}

impl FontActive {
    fn unavailable(family: &str) -> Self {
        Self {
            family: family.to_string(),
            source: None,
            data: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

/// One-shot readiness notification for a single family
#[derive(Debug)]
pub struct FontReady {
    family: String,
    rx: oneshot::Receiver<FontActive>,
}

impl FontReady {
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Wait for the family
    pub async fn wait(self) -> FontActive {
        match self.rx.await {
            Ok(active) => active,
            Err(_) => {
                warn!("Font loader stopped before \"{}\" was ready", self.family);
                FontActive::unavailable(&self.family)
            }
        }
    }

    /// Wait for the family from synchronous code
    ///
    /// Must not be called from inside an async runtime.
    pub fn blocking_wait(self) -> FontActive {
        match self.rx.blocking_recv() {
            Ok(active) => active,
            Err(_) => {
                warn!("Font loader stopped before \"{}\" was ready", self.family);
                FontActive::unavailable(&self.family)
            }
        }
    }
}

/// Background font loader
pub struct FontLoader;

impl FontLoader {
    /// Start loading; returns one notification per request, in request order
    pub fn load(requests: Vec<FontRequest>) -> Result<Vec<FontReady>> {
        let mut pending = Vec::with_capacity(requests.len());
        let mut readies = Vec::with_capacity(requests.len());
        for request in requests {
            let (tx, rx) = oneshot::channel();
            readies.push(FontReady {
                family: request.family.clone(),
                rx,
            });
            pending.push((request, tx));
        }

        std::thread::Builder::new()
            .name("glyphgrid-fonts".into())
            .spawn(move || {
                for (request, tx) in pending {
                    let active = load_request(&request);
                    if tx.send(active).is_err() {
                        debug!("Nobody waiting for \"{}\"", request.family);
                    }
                }
            })
            .map_err(|e| anyhow!("Failed to start font loader thread: {}", e))?;

        Ok(readies)
    }

    /// Load every request and wait for all of them
    pub async fn load_all(requests: Vec<FontRequest>) -> Result<Vec<FontActive>> {
        let readies = Self::load(requests)?;
        Ok(join_all(readies.into_iter().map(FontReady::wait)).await)
    }
}

/// Resolve and read one request (runs on the loader thread)
fn load_request(request: &FontRequest) -> FontActive {
    let Some(path) = resolve_family(request) else {
        warn!("Font family not found: \"{}\"", request.family);
        return FontActive::unavailable(&request.family);
    };
    match std::fs::read(&path) {
        Ok(data) => {
            info!(
                "Font loaded: \"{}\" ({}, {} bytes)",
                request.family,
                path.display(),
                data.len()
            );
            FontActive {
                family: request.family.clone(),
                source: Some(path),
                data: Some(data),
            }
        }
        Err(e) => {
            warn!("Failed to read font {}: {}", path.display(), e);
            FontActive::unavailable(&request.family)
        }
    }
}

/// Register every loaded family in `book`; returns how many were added
///
/// Unparseable files are skipped with a warning.
pub fn register(book: &mut FontBook, fonts: &[FontActive]) -> usize {
    let mut added = 0;
    for active in fonts {
        let Some(data) = &active.data else {
            continue;
        };
        match book.insert(&active.family, data) {
            Ok(()) => added += 1,
            Err(e) => warn!("{}", e),
        }
    }
    added
}

/// Locate a font file for a request
pub fn resolve_family(request: &FontRequest) -> Option<PathBuf> {
    if let Some(path) = &request.path {
        if path.exists() {
            return Some(path.clone());
        }
        warn!("Configured font path does not exist: {}", path.display());
    }

    #[cfg(feature = "system-fonts")]
    {
        if let Some(path) = super::fontconfig::find_family_path(&request.family) {
            return Some(path);
        }
    }

    find_in_dirs(&request.family, &font_dirs())
}

/// Load the font used for families that are not available
///
/// Search order:
/// 1. GLYPHGRID_FONT environment variable
/// 2. Known paths (hardcoded)
/// 3. fontconfig (feature `system-fonts`)
pub fn load_fallback_font() -> Option<(String, Vec<u8>)> {
    if let Ok(path) = std::env::var(FONT_ENV) {
        match std::fs::read(&path) {
            Ok(data) => {
                info!("Fallback font loaded: {} ({})", path, FONT_ENV);
                return Some((file_label(Path::new(&path)), data));
            }
            Err(e) => warn!("Failed to load {}: {} ({})", FONT_ENV, path, e),
        }
    }

    let candidates = [
        // Linux
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        // macOS (development/testing)
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ];

    for path in &candidates {
        if let Ok(data) = std::fs::read(path) {
            info!("Fallback font loaded: {}", path);
            return Some((file_label(Path::new(path)), data));
        }
    }

    #[cfg(feature = "system-fonts")]
    {
        if let Some(path) = super::fontconfig::find_fallback_path() {
            if let Ok(data) = std::fs::read(&path) {
                return Some((file_label(&path), data));
            }
        }
    }

    warn!("No fallback font found; missing families will render blank");
    None
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Font directories to scan, system first
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs_list = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
    ];
    if let Some(dir) = dirs::font_dir() {
        dirs_list.push(dir);
    }
    if let Some(dir) = dirs::data_dir() {
        dirs_list.push(dir.join("fonts"));
    }
    dirs_list
}

/// Lowercase alphanumerics only ("Cabin Sketch" -> "cabinsketch")
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the best-matching font file for `family` under `roots`
///
/// "CabinSketch-Regular.ttf" and "CabinSketch.ttf" beat "CabinSketch-Bold.ttf".
pub(crate) fn find_in_dirs(family: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    let want = normalize_name(family);
    if want.is_empty() {
        return None;
    }
    let mut best: Option<(u8, PathBuf)> = None;
    for root in roots {
        scan_dir(root, 0, &want, &mut best);
    }
    best.map(|(_, path)| path)
}

fn scan_dir(dir: &Path, depth: usize, want: &str, best: &mut Option<(u8, PathBuf)>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, depth + 1, want, best);
            continue;
        }
        let is_font = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
            .unwrap_or(false);
        if !is_font {
            continue;
        }
        let stem = normalize_name(&file_label(&path));
        let score = if stem == want || stem == format!("{}regular", want) {
            2
        } else if stem.starts_with(want) {
            1
        } else {
            continue;
        };
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            *best = Some((score, path));
        }
    }
}
