/// Decorative image assets.
///
/// Resolved once at start-up against `assets_dir`. A missing file never
/// stops anything: the view hides it or shows its placeholder text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::content::{content_for, ImageAsset, StageContent};
use crate::domain::stage::Stage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Available(PathBuf),
    Missing,
}

pub struct AssetCatalog {
    found: HashMap<&'static str, PathBuf>,
}

/// Every image referenced anywhere in the content table.
fn referenced_assets() -> Vec<ImageAsset> {
    Stage::ALL
        .iter()
        .flat_map(|&s| match content_for(s) {
            StageContent::BossRaid2(c) => vec![c.icon, c.screenshot],
            _ => Vec::new(),
        })
        .collect()
}

impl AssetCatalog {
    pub fn scan(dir: &Path) -> Self {
        let mut found = HashMap::new();
        for asset in referenced_assets() {
            let path = dir.join(asset.file);
            if path.is_file() {
                found.insert(asset.file, path);
            } else {
                debug!(file = asset.file, dir = %dir.display(), "asset missing; using fallback");
            }
        }
        AssetCatalog { found }
    }

    pub fn status(&self, asset: &ImageAsset) -> AssetStatus {
        match self.found.get(asset.file) {
            Some(p) => AssetStatus::Available(p.clone()),
            None => AssetStatus::Missing,
        }
    }
}

#[cfg(test)]
impl AssetCatalog {
    pub fn empty() -> Self {
        AssetCatalog { found: HashMap::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_finds_present_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recipesoup_icon.png"), b"\x89PNG").unwrap();
        let cat = AssetCatalog::scan(dir.path());

        let assets = referenced_assets();
        let icon = assets.iter().find(|a| a.file == "recipesoup_icon.png").unwrap();
        let shot = assets.iter().find(|a| a.file == "recipesoup_screenshot.png").unwrap();
        assert_eq!(cat.status(icon), AssetStatus::Available(dir.path().join("recipesoup_icon.png")));
        assert_eq!(cat.status(shot), AssetStatus::Missing);
    }

    #[test]
    fn missing_directory_is_fine() {
        let cat = AssetCatalog::scan(Path::new("/definitely/not/here"));
        for a in referenced_assets() {
            assert_eq!(cat.status(&a), AssetStatus::Missing);
        }
    }
}
