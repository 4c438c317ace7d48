//! AppImage resource - a single executable downloaded into the AppImage directory

use anyhow::{Context, Result};
use reconcile::{ApplyContext, Resource};
use std::fs;
use std::path::PathBuf;

use crate::fsops;
use crate::schema::AppImageConfig;
use crate::settings::Settings;

/// Maximum download size (512 MiB)
const MAX_DOWNLOAD_SIZE: u64 = 512 * 1024 * 1024;

const EXTENSION: &str = "AppImage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppImage {
    pub alias: String,
    /// Download source; unknown for discovered files
    pub url: Option<String>,
    dir: PathBuf,
}

impl AppImage {
    pub fn new(config: &AppImageConfig, settings: &Settings) -> Self {
        Self {
            alias: config.alias.clone(),
            url: Some(config.url.clone()),
            dir: settings.appimage_dir.clone(),
        }
    }

    /// `<appimage_dir>/<alias>.AppImage`
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", self.alias))
    }

    /// Find every `*.AppImage` file in the AppImage directory
    pub fn discover(settings: &Settings) -> Result<Vec<Self>> {
        let dir = &settings.appimage_dir;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

        let mut images = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(alias) = path.file_stem().and_then(|s| s.to_str()) {
                images.push(Self {
                    alias: alias.to_string(),
                    url: None,
                    dir: dir.clone(),
                });
            }
        }

        images.sort_by(|a, b| a.alias.cmp(&b.alias));
        log::debug!("discovered {} AppImages in {}", images.len(), dir.display());
        Ok(images)
    }
}

impl Resource for AppImage {
    fn resource_type(&self) -> &'static str {
        "appimage"
    }

    fn describe(&self) -> String {
        format!("appimage:{}", self.alias)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.alias == other.alias
    }

    fn create(&self, ctx: &ApplyContext) -> Result<()> {
        let url = self
            .url
            .as_deref()
            .with_context(|| format!("No download URL for {}", self.alias))?;

        let bytes = download(url)?;
        ctx.check_cancelled()?;

        // Stage next to the target so a partial download is never discovered
        let target = self.path();
        let partial = target.with_extension(format!("{EXTENSION}.part"));
        fsops::write_file(&partial, &bytes, 0o755)?;
        fs::rename(&partial, &target).with_context(|| {
            format!(
                "Failed to move {} to {}",
                partial.display(),
                target.display()
            )
        })
    }

    fn delete(&self, _ctx: &ApplyContext) -> Result<()> {
        fsops::remove_file(&self.path())
    }
}

/// Download a URL into memory
fn download(url: &str) -> Result<Vec<u8>> {
    log::info!("download {url}");
    let agent = ureq::Agent::new_with_defaults();

    let mut response = agent
        .get(url)
        .header("User-Agent", "sysman")
        .call()
        .with_context(|| format!("Failed to download {url}"))?;

    let bytes = response
        .body_mut()
        .with_config()
        .limit(MAX_DOWNLOAD_SIZE)
        .read_to_vec()
        .context("Failed to read response body")?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SettingsConfig;
    use reconcile::testing::check_identity_laws;
    use std::path::Path;
    use tempfile::TempDir;

    fn settings(home: &Path) -> Settings {
        Settings::with_home(home.to_path_buf(), &SettingsConfig::default())
    }

    fn image(alias: &str, settings: &Settings) -> AppImage {
        AppImage::new(
            &AppImageConfig {
                alias: alias.to_string(),
                url: format!("https://example.com/{alias}.AppImage"),
            },
            settings,
        )
    }

    #[test]
    fn test_path() {
        let settings = settings(Path::new("/home/op"));
        assert_eq!(
            image("krita", &settings).path(),
            PathBuf::from("/home/op/AppImages/krita.AppImage")
        );
    }

    #[test]
    fn test_discover_appimages_only() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        settings.ensure_dirs().unwrap();

        fs::write(settings.appimage_dir.join("krita.AppImage"), "elf").unwrap();
        fs::write(settings.appimage_dir.join("notes.txt"), "x").unwrap();
        fs::write(settings.appimage_dir.join("half.AppImage.part"), "x").unwrap();
        fs::create_dir(settings.appimage_dir.join("dir.AppImage")).unwrap();

        let found = AppImage::discover(&settings).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].alias, "krita");
        assert_eq!(found[0].url, None);

        // Discovered and configured images share identity
        assert!(found[0].same_identity(&image("krita", &settings)));
    }

    #[test]
    fn test_create_without_url_fails() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        let mut krita = image("krita", &settings);
        krita.url = None;

        let err = krita.create(&ApplyContext::default()).unwrap_err();
        assert!(err.to_string().contains("No download URL"));
        assert!(!krita.path().exists());
    }

    #[test]
    fn test_delete_removes_file() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        settings.ensure_dirs().unwrap();
        let krita = image("krita", &settings);
        fs::write(krita.path(), "elf").unwrap();

        krita.delete(&ApplyContext::default()).unwrap();
        assert!(!krita.path().exists());
        assert!(krita.delete(&ApplyContext::default()).is_err());
    }

    #[test]
    fn test_identity_laws() {
        let settings = settings(Path::new("/home/op"));
        let samples = [image("a", &settings), image("b", &settings), image("a", &settings)];
        assert_eq!(check_identity_laws(&samples), Ok(()));
    }
}
