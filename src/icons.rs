use crate::utils;
use std::path::Path;

/// Small image shown next to a handler. In the terminal this is a single glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon(pub String);

impl Icon {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Image lookup capability. Failure means "no image", never an error.
pub trait IconProvider {
    fn lookup(&self, path: &Path) -> Option<Icon>;
}

/// Picks a glyph from the handler's file type.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlyphIcons;

impl IconProvider for GlyphIcons {
    fn lookup(&self, path: &Path) -> Option<Icon> {
        let meta = std::fs::symlink_metadata(path).ok()?;
        if meta.file_type().is_symlink() {
            return Some(Icon("↪".to_string()));
        }
        let name = path.file_name()?.to_string_lossy();
        let ext = utils::extension_of(&name).unwrap_or_default().to_lowercase();
        let glyph = match ext.as_str() {
            ".exe" | ".com" | ".app" | ".appimage" => "⚙",
            ".bat" | ".cmd" | ".ps1" | ".sh" | ".py" => "»",
            ".lnk" | ".desktop" | ".url" => "↪",
            _ if utils::is_executable(&meta) => "⚙",
            _ => "·",
        };
        Some(Icon(glyph.to_string()))
    }
}
