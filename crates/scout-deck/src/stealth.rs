//! Page-load stealth script injected on every navigation (spec §4.4).
//!
//! Grounded on `docsend_client.py`'s `_init_chrome` post-launch
//! `execute_script` call: override `navigator.webdriver`, report a
//! plausible `navigator.languages`/`navigator.plugins`, patch the
//! permissions query for `notifications`, and pin `screen.availWidth`/
//! `availHeight` to a common desktop resolution.

pub const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
if (window.navigator.permissions && window.navigator.permissions.query) {
    const originalQuery = window.navigator.permissions.query;
    window.navigator.permissions.query = (parameters) => (
        parameters.name === 'notifications'
            ? Promise.resolve({ state: Notification.permission })
            : originalQuery(parameters)
    );
}
Object.defineProperty(screen, 'availWidth', { get: () => 1920 });
Object.defineProperty(screen, 'availHeight', { get: () => 1080 });
"#;

/// Chromium launch flags for the stealth headless profile (spec §4.4).
pub const STEALTH_CHROME_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--no-sandbox",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--window-size=1920,1080",
];
