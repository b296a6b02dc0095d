//! Project Presenter
//!
//! Resolves what the display shows for one project: the text from `info.txt`
//! (or the folder name) and the icon from `icon.png` (or the default image).
//! Only one presentation exists at a time; showing a new one drops the old.

use crate::error::{LauncherError, Result};
use crate::registry::ProjectEntry;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PLACEHOLDER_SIZE: u32 = 256;

/// Built-in tile used when no default icon is configured or it fails to load
static PLACEHOLDER_ICON: Lazy<IconImage> = Lazy::new(|| {
    let pixels: Vec<u8> = (0..PLACEHOLDER_SIZE * PLACEHOLDER_SIZE)
        .flat_map(|_| [0x2A, 0x3B, 0x55, 0xFF])
        .collect();

    IconImage {
        source: IconSource::Default,
        width: PLACEHOLDER_SIZE,
        height: PLACEHOLDER_SIZE,
        rgba: pixels.into(),
    }
});

/// Where an icon came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Project(PathBuf),
    Default,
}

/// Decoded RGBA8 image ready for the display surface
#[derive(Debug, Clone)]
pub struct IconImage {
    pub source: IconSource,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl IconImage {
    /// Decode an image file into RGBA8
    ///
    /// The format is sniffed from the file contents, so a mislabeled
    /// `icon.png` still decodes.
    pub fn decode(path: &Path, source: IconSource) -> Result<Self> {
        let io_error = |e: std::io::Error| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let image = image::io::Reader::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()
            .map_err(|e| LauncherError::ImageDecode {
                path: path.to_path_buf(),
                source: e,
            })?;

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            source,
            width,
            height,
            rgba: rgba.into_raw().into(),
        })
    }

    pub fn is_default(&self) -> bool {
        self.source == IconSource::Default
    }
}

/// What the display shows for the current project
#[derive(Debug, Clone)]
pub struct Presentation {
    pub project_name: String,
    pub text: String,
    pub icon: IconImage,
}

/// Display text for a project: `info.txt` verbatim, or the folder name
pub fn resolve_text(entry: &ProjectEntry) -> String {
    let info_path = entry.info_path();

    if !info_path.is_file() {
        return entry.name().to_string();
    }

    match fs::read(&info_path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{:?} is not valid UTF-8, decoding lossily", info_path);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}", info_path, e);
            entry.name().to_string()
        }
    }
}

pub struct Presenter {
    default_icon: IconImage,
    current: Option<Presentation>,
    render_count: u64,
}

impl Presenter {
    /// Create a presenter, loading the configured default icon if there is one
    pub fn new(default_icon_path: Option<&Path>) -> Self {
        let default_icon = match default_icon_path {
            Some(path) => match IconImage::decode(path, IconSource::Default) {
                Ok(icon) => icon,
                Err(e) => {
                    tracing::warn!("Default icon unavailable, using placeholder: {}", e);
                    PLACEHOLDER_ICON.clone()
                }
            },
            None => PLACEHOLDER_ICON.clone(),
        };

        Self {
            default_icon,
            current: None,
            render_count: 0,
        }
    }

    /// Icon for a project; a present but unreadable `icon.png` is an error
    pub fn resolve_icon(&self, entry: &ProjectEntry) -> Result<IconImage> {
        match entry.icon_path() {
            Some(path) => IconImage::decode(path, IconSource::Project(path.to_path_buf())),
            None => Ok(self.default_icon.clone()),
        }
    }

    /// Build the presentation for a project
    ///
    /// Icon decode failures fall back to the default icon with a warning, the
    /// same as a missing `icon.png`.
    pub fn render(&self, entry: &ProjectEntry) -> Presentation {
        let text = entry.display_text_with(resolve_text).to_string();

        let icon = self.resolve_icon(entry).unwrap_or_else(|e| {
            tracing::warn!("{}; showing default icon", e);
            self.default_icon.clone()
        });

        Presentation {
            project_name: entry.name().to_string(),
            text,
            icon,
        }
    }

    /// Render `entry` and replace whatever is currently shown
    pub fn show(&mut self, entry: &ProjectEntry) -> &Presentation {
        tracing::debug!("Presenting project: {}", entry.name());
        let presentation = self.render(entry);
        self.render_count += 1;
        self.current.insert(presentation)
    }

    pub fn current(&self) -> Option<&Presentation> {
        self.current.as_ref()
    }

    /// Number of times the displayed project was replaced
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ICON_FILE, INFO_FILE};

    fn project(root: &Path, name: &str) -> ProjectEntry {
        let folder = root.join(name);
        fs::create_dir_all(&folder).unwrap();
        ProjectEntry::new(folder)
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_info_text_is_verbatim() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");
        fs::write(entry.folder_path().join(INFO_FILE), "Hello").unwrap();

        let presenter = Presenter::new(None);
        assert_eq!(presenter.render(&entry).text, "Hello");
    }

    #[test]
    fn test_info_text_keeps_trailing_whitespace() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");
        fs::write(entry.folder_path().join(INFO_FILE), "Pong\nby Ana  \n\n").unwrap();

        assert_eq!(resolve_text(&entry), "Pong\nby Ana  \n\n");
    }

    #[test]
    fn test_missing_info_uses_folder_name() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Space Race");

        let presenter = Presenter::new(None);
        assert_eq!(presenter.render(&entry).text, "Space Race");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");
        fs::write(entry.folder_path().join(INFO_FILE), [b'O', b'l', 0xE1]).unwrap();

        assert_eq!(resolve_text(&entry), "Ol\u{FFFD}");
    }

    #[test]
    fn test_project_icon_is_decoded() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");
        let icon_path = entry.folder_path().join(ICON_FILE);
        write_png(&icon_path, 4, 2);

        let icon = Presenter::new(None).render(&entry).icon;
        assert_eq!(icon.source, IconSource::Project(icon_path));
        assert_eq!((icon.width, icon.height), (4, 2));
        assert_eq!(icon.rgba.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_missing_icon_uses_default() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");

        let icon = Presenter::new(None).render(&entry).icon;
        assert!(icon.is_default());
        assert_eq!(icon.width, PLACEHOLDER_SIZE);
    }

    #[test]
    fn test_configured_default_icon() {
        let root = tempfile::tempdir().unwrap();
        let default_path = root.path().join("default.png");
        write_png(&default_path, 8, 8);
        let entry = project(root.path(), "Pong");

        let presenter = Presenter::new(Some(&default_path));
        let icon = presenter.render(&entry).icon;
        assert!(icon.is_default());
        assert_eq!(icon.width, 8);
    }

    #[test]
    fn test_corrupt_icon_is_error_and_falls_back() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");
        fs::write(entry.folder_path().join(ICON_FILE), b"definitely not a png").unwrap();

        let presenter = Presenter::new(None);
        assert!(matches!(
            presenter.resolve_icon(&entry),
            Err(LauncherError::ImageDecode { .. })
        ));
        assert!(presenter.render(&entry).icon.is_default());
    }

    #[test]
    fn test_icon_format_sniffed_from_contents() {
        let root = tempfile::tempdir().unwrap();
        let entry = project(root.path(), "Pong");
        let icon_path = entry.folder_path().join(ICON_FILE);
        image::RgbImage::from_pixel(6, 3, image::Rgb([0, 128, 255]))
            .save_with_format(&icon_path, image::ImageFormat::Jpeg)
            .unwrap();

        let icon = Presenter::new(None).resolve_icon(&entry).unwrap();
        assert_eq!(icon.source, IconSource::Project(icon_path));
        assert_eq!((icon.width, icon.height), (6, 3));
        assert_eq!(icon.rgba.len(), 6 * 3 * 4);
    }

    #[test]
    fn test_show_replaces_current() {
        let root = tempfile::tempdir().unwrap();
        let first = project(root.path(), "A");
        let second = project(root.path(), "B");

        let mut presenter = Presenter::new(None);
        assert!(presenter.current().is_none());

        presenter.show(&first);
        presenter.show(&second);
        assert_eq!(presenter.current().unwrap().project_name, "B");
        assert_eq!(presenter.render_count(), 2);
    }
}
