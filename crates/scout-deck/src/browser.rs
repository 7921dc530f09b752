//! Browser acquisition: locate an executable, launch it headless with the
//! stealth profile, and hand back a connected `chromiumoxide::Browser`.
//!
//! Grounded on `docsend_client.py`'s `_init_chrome`/`_init_firefox`/
//! `_init_browser` fallback chain. `chromiumoxide` drives the browser over
//! the DevTools protocol directly, so there is no separate "driver" process
//! to locate the way Selenium needs `chromedriver`; the env-var -> PATH ->
//! fixed-path resolution order from the original is kept for locating the
//! browser binary itself instead.

use crate::error;
use crate::stealth::STEALTH_CHROME_ARGS;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use scout_types::PipelineError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chromium,
    Alternate,
}

fn macos_paths(kind: BrowserKind) -> &'static [&'static str] {
    match kind {
        BrowserKind::Chromium => &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ],
        BrowserKind::Alternate => &["/Applications/Firefox.app/Contents/MacOS/firefox", "/Applications/Firefox.app/Contents/MacOS/Firefox"],
    }
}

fn posix_binary_names(kind: BrowserKind) -> &'static [&'static str] {
    match kind {
        BrowserKind::Chromium => &["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"],
        BrowserKind::Alternate => &["firefox", "firefox-esr"],
    }
}

fn which(binary: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).map(|dir| dir.join(binary)).find(|candidate| candidate.is_file())
}

/// Locate an executable for `kind`: `CHROME_BIN` env var first, then fixed
/// macOS app-bundle paths, then a PATH search of known binary names.
pub fn locate_executable(kind: BrowserKind) -> Option<PathBuf> {
    if kind == BrowserKind::Chromium {
        if let Some(path) = std::env::var_os("CHROME_BIN").map(PathBuf::from) {
            if path.is_file() {
                return Some(path);
            }
        }
    }

    if cfg!(target_os = "macos") {
        if let Some(found) = macos_paths(kind).iter().map(Path::new).find(|p| p.is_file()) {
            return Some(found.to_path_buf());
        }
    }

    if let Some(found) = posix_binary_names(kind).iter().find_map(|name| which(name)) {
        return Some(found);
    }

    managed_install_dir(kind)
}

/// Third tier: a browser fetched by a managed installer into a well-known
/// cache directory, the Rust-side analogue of `webdriver_manager`'s
/// download cache (`~/.cache/scout/browsers/<kind>/`). This crate doesn't
/// perform the download itself; it only looks for one already placed
/// there by an operator or init container.
fn managed_install_dir(kind: BrowserKind) -> Option<PathBuf> {
    let cache = dirs::cache_dir()?.join("scout").join("browsers");
    let binary = match kind {
        BrowserKind::Chromium => cache.join("chromium").join("chrome"),
        BrowserKind::Alternate => cache.join("firefox").join("firefox"),
    };
    binary.is_file().then_some(binary)
}

/// Launch a headless, stealth-configured browser, trying Chromium first and
/// falling back to the alternate browser kind if configured.
pub async fn launch_with_fallback() -> Result<Browser, PipelineError> {
    let mut last_error = None;

    for kind in [BrowserKind::Chromium, BrowserKind::Alternate] {
        let Some(executable) = locate_executable(kind) else {
            last_error = Some(format!("{kind:?}: no executable found"));
            continue;
        };

        match launch(&executable).await {
            Ok(browser) => return Ok(browser),
            Err(e) => last_error = Some(format!("{kind:?}: {e}")),
        }
    }

    Err(error::browser_init_failed(last_error.unwrap_or_else(|| "no browser binaries available".to_string())))
}

async fn launch(executable: &Path) -> anyhow::Result<Browser> {
    let config = BrowserConfig::builder()
        .chrome_executable(executable)
        .args(STEALTH_CHROME_ARGS.iter().map(|a| a.to_string()))
        .no_sandbox()
        .build()
        .map_err(|e| anyhow::anyhow!(e))?;

    let (browser, mut handler) = Browser::launch(config).await?;

    tokio::spawn(async move { while handler.next().await.is_some() {} });

    Ok(browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn which_finds_known_unix_binary() {
        // `sh` exists on every POSIX CI runner PATH.
        assert!(which("sh").is_some());
    }

    #[test]
    fn which_rejects_unknown_binary() {
        assert!(which("definitely-not-a-real-binary-xyz").is_none());
    }
}
