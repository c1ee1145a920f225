//! Side panel state machine: at most one of Info or Preview is shown, keyed
//! to the node (path) it was opened for.
//!
//! Both `show_*` calls close whatever is open first, then either toggle off
//! (same kind, same target) or try to open. A failed probe, read or decode
//! leaves the panel closed.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};

/// RFC 822 timestamp with a numeric zone offset (`02 Jan 06 15:04 +0000`).
const RFC822Z_FORMAT: &str = "%d %b %y %H:%M %z";

/// Metadata shown in the Info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileInfo {
    /// Stat `path` (following symlinks).
    pub fn probe(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self {
            name,
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let modified = self
            .modified
            .map(|t| DateTime::<Local>::from(t).format(RFC822Z_FORMAT).to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            format!("Name: {}", self.name),
            format!("Size: {} bytes", self.size),
            format!("Modified: {}", modified),
        ]
    }
}

/// What a Preview panel displays.
#[derive(Debug, Clone)]
pub enum PreviewContent {
    /// Directories have no preview; the panel is shown empty.
    Directory,
    /// File contents, verbatim (invalid UTF-8 replaced).
    Text(String),
    /// A decoded png/jpeg image.
    Image(RgbaImage),
}

/// The single side-panel slot.
#[derive(Debug, Clone, Default)]
pub enum SidePanel {
    #[default]
    None,
    Info {
        target: PathBuf,
        info: FileInfo,
    },
    Preview {
        target: PathBuf,
        content: PreviewContent,
    },
}

/// Image format for a file extension. Matching is exact and case-sensitive.
pub fn image_format_for(path: &Path) -> Option<ImageFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => Some(ImageFormat::Png),
        Some("jpg" | "jpeg") => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

fn decode_image(path: &Path, format: ImageFormat) -> image::ImageResult<RgbaImage> {
    let file = File::open(path)?;
    let img = image::load(BufReader::new(file), format)?;
    Ok(img.to_rgba8())
}

fn load_preview(path: &Path) -> Option<PreviewContent> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "preview probe failed");
            return None;
        }
    };
    if metadata.is_dir() {
        return Some(PreviewContent::Directory);
    }

    if let Some(format) = image_format_for(path) {
        return match decode_image(path, format) {
            Ok(img) => Some(PreviewContent::Image(img)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "image decode failed");
                None
            }
        };
    }

    match fs::read(path) {
        Ok(bytes) => Some(PreviewContent::Text(
            String::from_utf8_lossy(&bytes).into_owned(),
        )),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "preview read failed");
            None
        }
    }
}

impl SidePanel {
    /// Path the open panel belongs to, if any.
    pub fn target(&self) -> Option<&Path> {
        match self {
            SidePanel::None => None,
            SidePanel::Info { target, .. } | SidePanel::Preview { target, .. } => Some(target),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, SidePanel::None)
    }

    pub fn close(&mut self) {
        *self = SidePanel::None;
    }

    /// Toggle the Info panel for `path`.
    pub fn show_info(&mut self, path: &Path) {
        let previous = std::mem::take(self);
        if matches!(&previous, SidePanel::Info { target, .. } if target == path) {
            return;
        }
        match FileInfo::probe(path) {
            Ok(info) => {
                tracing::info!(path = %path.display(), "info panel opened");
                *self = SidePanel::Info {
                    target: path.to_path_buf(),
                    info,
                };
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "info probe failed");
            }
        }
    }

    /// Toggle the Preview panel for `path`. No-op for the root.
    pub fn show_preview(&mut self, path: &Path, root: &Path) {
        if path == root {
            return;
        }
        let previous = std::mem::take(self);
        if matches!(&previous, SidePanel::Preview { target, .. } if target == path) {
            return;
        }
        if let Some(content) = load_preview(path) {
            tracing::info!(path = %path.display(), "preview panel opened");
            *self = SidePanel::Preview {
                target: path.to_path_buf(),
                content,
            };
        }
    }

    /// Close the panel if its target is `removed` or lies beneath it.
    pub fn close_if_under(&mut self, removed: &Path) {
        if self.target().is_some_and(|t| t.starts_with(removed)) {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello\nworld").unwrap();
        fs::write(dir.path().join("other.txt"), "other").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        dir
    }

    fn write_png(path: &Path) {
        let img = RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn is_info(panel: &SidePanel) -> bool {
        matches!(panel, SidePanel::Info { .. })
    }

    fn is_preview(panel: &SidePanel) -> bool {
        matches!(panel, SidePanel::Preview { .. })
    }

    #[test]
    fn info_shows_name_and_size() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_info(&dir.path().join("notes.txt"));
        match &panel {
            SidePanel::Info { info, .. } => {
                assert_eq!(info.name, "notes.txt");
                assert_eq!(info.size, 11);
                let lines = info.lines();
                assert_eq!(lines[0], "Name: notes.txt");
                assert_eq!(lines[1], "Size: 11 bytes");
                assert!(lines[2].starts_with("Modified: "));
            }
            other => panic!("expected info panel, got {other:?}"),
        }
    }

    #[test]
    fn modified_time_uses_numeric_zone_offset() {
        let info = FileInfo {
            name: "a".to_string(),
            size: 0,
            modified: Some(SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(86_400 * 400)),
        };
        let line = info.lines().remove(2);
        let stamp = line.trim_start_matches("Modified: ");
        let parts: Vec<&str> = stamp.split(' ').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[2], "71");
        let zone = parts[4];
        assert_eq!(zone.len(), 5);
        assert!(zone.starts_with('+') || zone.starts_with('-'));
    }

    #[test]
    fn info_toggles_closed_for_same_node() {
        let dir = setup();
        let path = dir.path().join("notes.txt");
        let mut panel = SidePanel::default();
        panel.show_info(&path);
        assert!(is_info(&panel));
        panel.show_info(&path);
        assert!(!panel.is_open());
    }

    #[test]
    fn info_moves_to_another_node() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_info(&dir.path().join("notes.txt"));
        panel.show_info(&dir.path().join("other.txt"));
        assert_eq!(panel.target(), Some(dir.path().join("other.txt").as_path()));
    }

    #[test]
    fn info_probe_failure_leaves_panel_closed() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_preview(&dir.path().join("notes.txt"), dir.path());
        panel.show_info(&dir.path().join("missing"));
        assert!(!panel.is_open());
    }

    #[test]
    fn info_is_allowed_on_root() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_info(dir.path());
        assert!(is_info(&panel));
    }

    #[test]
    fn preview_of_text_is_verbatim() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_preview(&dir.path().join("notes.txt"), dir.path());
        match &panel {
            SidePanel::Preview {
                content: PreviewContent::Text(text),
                ..
            } => assert_eq!(text, "hello\nworld"),
            other => panic!("expected text preview, got {other:?}"),
        }
    }

    #[test]
    fn preview_of_directory_is_empty_panel() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_preview(&dir.path().join("sub"), dir.path());
        assert!(matches!(
            panel,
            SidePanel::Preview {
                content: PreviewContent::Directory,
                ..
            }
        ));
    }

    #[test]
    fn preview_of_root_is_noop() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_info(&dir.path().join("notes.txt"));
        panel.show_preview(dir.path(), dir.path());
        assert!(is_info(&panel));
    }

    #[test]
    fn preview_decodes_png() {
        let dir = setup();
        let path = dir.path().join("dot.png");
        write_png(&path);
        let mut panel = SidePanel::default();
        panel.show_preview(&path, dir.path());
        match &panel {
            SidePanel::Preview {
                content: PreviewContent::Image(img),
                ..
            } => assert_eq!(img.dimensions(), (4, 2)),
            other => panic!("expected image preview, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_image_closes_everything() {
        let dir = setup();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, "not a jpeg").unwrap();
        let mut panel = SidePanel::default();
        panel.show_info(&dir.path().join("notes.txt"));
        panel.show_preview(&path, dir.path());
        assert!(!panel.is_open());
    }

    #[test]
    fn uppercase_extension_is_shown_as_text() {
        let dir = setup();
        let path = dir.path().join("LOUD.PNG");
        fs::write(&path, "plain").unwrap();
        let mut panel = SidePanel::default();
        panel.show_preview(&path, dir.path());
        assert!(matches!(
            panel,
            SidePanel::Preview {
                content: PreviewContent::Text(_),
                ..
            }
        ));
    }

    #[test]
    fn image_format_matching_is_exact() {
        assert_eq!(image_format_for(Path::new("a.png")), Some(ImageFormat::Png));
        assert_eq!(image_format_for(Path::new("a.jpg")), Some(ImageFormat::Jpeg));
        assert_eq!(image_format_for(Path::new("a.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(image_format_for(Path::new("a.Jpg")), None);
        assert_eq!(image_format_for(Path::new("a.gif")), None);
        assert_eq!(image_format_for(Path::new("png")), None);
    }

    #[test]
    fn panels_are_mutually_exclusive() {
        let dir = setup();
        let notes = dir.path().join("notes.txt");
        let other = dir.path().join("other.txt");
        let mut panel = SidePanel::default();

        panel.show_info(&notes);
        assert!(is_info(&panel) && !is_preview(&panel));
        panel.show_preview(&notes, dir.path());
        assert!(is_preview(&panel));
        panel.show_info(&other);
        assert!(is_info(&panel));
        panel.show_preview(&other, dir.path());
        assert!(is_preview(&panel));
        panel.show_preview(&other, dir.path());
        assert!(!panel.is_open());
    }

    #[test]
    fn close_if_under_matches_descendants() {
        let dir = setup();
        let mut panel = SidePanel::default();
        panel.show_info(&dir.path().join("sub"));
        panel.close_if_under(&dir.path().join("notes.txt"));
        assert!(panel.is_open());
        panel.close_if_under(dir.path());
        assert!(!panel.is_open());
    }
}
