//! # Scout Deck
//!
//! Headless-browser extraction of pitch-deck viewer pages (spec §4.4, C4):
//! drive a stealth-configured Chromium instance through an email/password
//! gate, screenshot each slide, and OCR the screenshots into text.
//!
//! Grounded on `docsend_client.py`'s state machine (load, form, password,
//! content, iterate) and `riptide-headless::launcher`'s pooled-browser
//! launch style, adapted to a single-checkout-per-extraction shape since
//! decks are processed one at a time rather than served concurrently.

mod browser;
pub mod error;
mod ocr;
pub mod progress;
mod selectors;
mod slides;
mod stealth;

pub use progress::{ProgressHandle, ProgressSnapshot};

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::{Element, Page};
use rand::Rng;
use scout_types::{AccessDeniedKind, PipelineError};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, instrument};

const CONTENT_WAIT: Duration = Duration::from_secs(15);
const PASSWORD_WAIT: Duration = Duration::from_secs(8);
const READY_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, serde::Serialize)]
pub struct SlideRecord {
    pub slide_number: u32,
    pub text: String,
    pub length: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DeckExtraction {
    pub text: String,
    pub slide_texts: Vec<SlideRecord>,
    pub metadata: serde_json::Value,
}

pub struct DeckExtractor {
    progress: ProgressHandle,
}

impl DeckExtractor {
    pub fn new(progress: ProgressHandle) -> Self {
        Self { progress }
    }

    #[instrument(skip(self, password), fields(deck_url = %deck_url))]
    pub async fn extract(&self, deck_url: &str, email: &str, password: Option<&str>) -> Result<DeckExtraction, PipelineError> {
        let start = Instant::now();
        validate_deck_url(deck_url)?;

        self.progress.set(0, "Initializing browser...");
        let browser = browser::launch_with_fallback().await?;
        let page = browser.new_page("about:blank").await.map_err(|e| error::browser_init_failed(e.to_string()))?;
        inject_stealth(&page).await?;

        self.progress.set(10, "Loading DocSend page...");
        load(&page, deck_url).await?;

        self.progress.set(15, "Entering email...");
        let combined = fill_form(&page, email, password, &self.progress).await?;

        sleep(jitter(3.0, 5.0)).await;

        if !combined {
            handle_separate_password(&page, password, &self.progress).await?;
        }

        self.progress.set(30, "Waiting for slide content...");
        wait_for_content(&page).await?;

        let total_slides = read_total_slides(&page).await;
        let mut slide_texts = Vec::with_capacity(total_slides as usize);
        let mut full_text = String::new();

        for i in 0..total_slides {
            if i > 0 {
                advance_slide(&page).await?;
                sleep(jitter(1.0, 2.0)).await;
            }

            let element = main_image_element(&page).await?;
            let png = element.screenshot(CaptureScreenshotFormat::Png).await.map_err(|e| error::transport(e.to_string()))?;
            let text = ocr::ocr_png(&png).await.map_err(|e| error::ocr_failed_slide(i as usize, e.to_string()))?;

            if !full_text.is_empty() {
                full_text.push(' ');
            }
            full_text.push_str(&text);

            slide_texts.push(SlideRecord { slide_number: i + 1, text: text.clone(), length: text.chars().count() });
            self.progress.set(progress::slide_progress(i, total_slides), format!("Processed slide {} of {}", i + 1, total_slides));

            sleep(jitter(0.5, 1.0)).await;
        }

        self.progress.set(95, "Finalizing...");
        let processing_time = start.elapsed().as_secs_f64();
        let slides_with_text = slide_texts.iter().filter(|s| s.length > 0).count();

        let metadata = json!({
            "source_type": "deck",
            "total_slides": total_slides,
            "processed_slides": slide_texts.len(),
            "slides_with_text": slides_with_text,
            "total_characters": full_text.chars().count(),
            "processing_time": processing_time,
            "url": deck_url,
        });

        self.progress.set(100, "Done");
        info!(total_slides, processing_time, "deck extraction complete");

        Ok(DeckExtraction { text: full_text, slide_texts, metadata })
    }
}

fn validate_deck_url(url: &str) -> Result<(), PipelineError> {
    let parsed = url::Url::parse(url).map_err(|_| error::invalid_deck_url(url))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(error::invalid_deck_url(url));
    }
    Ok(())
}

async fn inject_stealth(page: &Page) -> Result<(), PipelineError> {
    page.evaluate(stealth::STEALTH_SCRIPT).await.map_err(|e| error::browser_init_failed(e.to_string()))?;
    Ok(())
}

async fn load(page: &Page, url: &str) -> Result<(), PipelineError> {
    page.goto(url).await.map_err(|e| error::invalid_deck_url(&format!("{url}: {e}")))?;
    sleep(jitter(2.5, 4.0)).await;
    wait_document_ready(page).await
}

async fn wait_document_ready(page: &Page) -> Result<(), PipelineError> {
    let deadline = Instant::now() + READY_WAIT;
    loop {
        let ready = page
            .evaluate("document.readyState")
            .await
            .ok()
            .and_then(|r| r.into_value::<String>().ok())
            .unwrap_or_default();
        if ready == "complete" || Instant::now() > deadline {
            return Ok(());
        }
        sleep(Duration::from_millis(200)).await;
    }
}

/// Returns whether a password field was found and filled alongside the
/// email field (the "combined" flow from spec §4.4 FORM).
async fn fill_form(page: &Page, email: &str, password: Option<&str>, progress: &ProgressHandle) -> Result<bool, PipelineError> {
    let Some(email_el) = find_first_visible_enabled(page, selectors::EMAIL_SELECTORS).await? else {
        // No email gate on this deck; nothing to fill.
        return Ok(false);
    };

    type_with_jitter(&email_el, email).await?;

    let password_el = find_first_visible_enabled(page, selectors::PASSWORD_SELECTORS).await?;
    let combined = password_el.is_some();

    if let Some(pwd_el) = &password_el {
        let Some(password) = password else {
            return Err(error::password_required());
        };
        progress.set(18, "Entering password...");
        type_with_jitter(pwd_el, password).await?;
    }

    submit_form(page, &email_el).await?;
    Ok(combined)
}

async fn handle_separate_password(page: &Page, password: Option<&str>, progress: &ProgressHandle) -> Result<(), PipelineError> {
    let Some(password_el) = wait_for_password_field(page).await else {
        return Ok(());
    };

    let Some(password) = password else {
        return Err(error::password_required());
    };

    progress.set(20, "Entering password...");
    type_with_jitter(&password_el, password).await?;
    submit_form(page, &password_el).await?;
    sleep(jitter(3.0, 5.0)).await;
    Ok(())
}

async fn wait_for_password_field(page: &Page) -> Option<Element> {
    let deadline = Instant::now() + PASSWORD_WAIT;
    while Instant::now() < deadline {
        if let Ok(Some(el)) = find_first_visible_enabled(page, selectors::PASSWORD_SELECTORS).await {
            return Some(el);
        }
        sleep(Duration::from_millis(250)).await;
    }
    None
}

async fn submit_form(page: &Page, fallback_enter_target: &Element) -> Result<(), PipelineError> {
    if let Some(button) = find_first_visible_enabled(page, selectors::SUBMIT_SELECTORS).await? {
        button.click().await.map_err(|e| error::transport(e.to_string()))?;
        return Ok(());
    }

    if let Some(button) = find_submit_by_text(page).await? {
        button.click().await.map_err(|e| error::transport(e.to_string()))?;
        return Ok(());
    }

    fallback_enter_target.press_key("Enter").await.map_err(|e| error::transport(e.to_string()))?;
    Ok(())
}

async fn find_submit_by_text(page: &Page) -> Result<Option<Element>, PipelineError> {
    let elements = page.find_elements("button, input[type='submit'], input[type='button']").await.map_err(|e| error::transport(e.to_string()))?;

    let mut texts = Vec::with_capacity(elements.len());
    let mut candidates = Vec::with_capacity(elements.len());
    for el in &elements {
        texts.push(element_text(el).await);
        candidates.push((is_interactable(el).await, el));
    }
    let snapshot: Vec<selectors::Candidate<'_>> =
        candidates.iter().zip(&texts).map(|((displayed, _), text)| selectors::Candidate { displayed: *displayed, enabled: true, text }).collect();

    Ok(selectors::find_submit_by_text(&snapshot).map(|idx| elements[idx].clone()))
}

async fn wait_for_content(page: &Page) -> Result<(), PipelineError> {
    let deadline = Instant::now() + CONTENT_WAIT;
    loop {
        let count = page.find_elements("img").await.map(|v| v.len()).unwrap_or(0);
        if count > 0 {
            return Ok(());
        }
        if Instant::now() > deadline {
            return classify_access_denied_page(page).await;
        }
        sleep(Duration::from_millis(300)).await;
    }
}

async fn classify_access_denied_page(page: &Page) -> Result<(), PipelineError> {
    let source = page.content().await.unwrap_or_default().to_lowercase();
    let kind = selectors::classify_access_denied(&source).unwrap_or(AccessDeniedKind::Unknown);
    Err(error::access_denied(kind))
}

async fn read_total_slides(page: &Page) -> u32 {
    let body_text: String = page
        .evaluate("document.body.innerText")
        .await
        .ok()
        .and_then(|r| r.into_value::<String>().ok())
        .unwrap_or_default();
    slides::parse_slide_count(&body_text)
}

async fn main_image_element(page: &Page) -> Result<Element, PipelineError> {
    let images = page.find_elements("img").await.map_err(|e| error::transport(e.to_string()))?;
    let mut candidates = Vec::with_capacity(images.len());
    for el in &images {
        let bbox = el.bounding_box().await.ok();
        candidates.push(slides::ImageCandidate {
            displayed: bbox.as_ref().is_some_and(|b| b.width > 0.0 && b.height > 0.0),
            width: bbox.as_ref().map(|b| b.width as u32).unwrap_or(0),
            height: bbox.as_ref().map(|b| b.height as u32).unwrap_or(0),
            from_container_fallback: false,
        });
    }

    if let Some(idx) = slides::pick_main_image(&candidates) {
        return Ok(images[idx].clone());
    }

    for fallback_selector in selectors::SLIDE_CONTAINER_SELECTORS {
        if let Ok(mut found) = page.find_elements(*fallback_selector).await {
            if let Some(el) = found.pop() {
                return Ok(el);
            }
        }
    }
    Err(error::no_slides_found())
}

async fn advance_slide(page: &Page) -> Result<(), PipelineError> {
    for selector in selectors::NEXT_SLIDE_SELECTORS {
        if let Ok(mut elements) = page.find_elements(*selector).await {
            for el in elements.drain(..) {
                if is_interactable(&el).await {
                    el.click().await.map_err(|e| error::transport(e.to_string()))?;
                    return Ok(());
                }
            }
        }
    }

    page.evaluate("document.body.dispatchEvent(new KeyboardEvent('keydown', {key: 'ArrowRight', bubbles: true}))")
        .await
        .map_err(|e| error::transport(e.to_string()))?;
    Ok(())
}

async fn find_first_visible_enabled(page: &Page, selector_list: &[&str]) -> Result<Option<Element>, PipelineError> {
    for selector in selector_list {
        let elements = page.find_elements(*selector).await.map_err(|e| error::transport(e.to_string()))?;
        let mut flags = Vec::with_capacity(elements.len());
        for el in &elements {
            flags.push(is_interactable(el).await);
        }
        let candidates: Vec<selectors::Candidate<'_>> = flags.iter().map(|&displayed| selectors::Candidate { displayed, enabled: true, text: "" }).collect();
        if let Some(idx) = selectors::first_visible_enabled(&candidates) {
            return Ok(Some(elements[idx].clone()));
        }
    }
    Ok(None)
}

async fn is_interactable(el: &Element) -> bool {
    let displayed = el.bounding_box().await.map(|b| b.width > 0.0 && b.height > 0.0).unwrap_or(false);
    let disabled = el.attribute("disabled").await.ok().flatten().is_some();
    displayed && !disabled
}

async fn element_text(el: &Element) -> String {
    if let Ok(Some(value)) = el.attribute("value").await {
        if !value.is_empty() {
            return value;
        }
    }
    el.inner_text().await.ok().flatten().unwrap_or_default()
}

async fn type_with_jitter(el: &Element, text: &str) -> Result<(), PipelineError> {
    el.scroll_into_view().await.map_err(|e| error::transport(e.to_string()))?;
    el.click().await.ok();
    for ch in text.chars() {
        el.type_str(ch.to_string()).await.map_err(|e| error::transport(e.to_string()))?;
        sleep(jitter(0.05, 0.15)).await;
    }
    Ok(())
}

fn jitter(min: f64, max: f64) -> Duration {
    let secs = rand::thread_rng().gen_range(min..max);
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_scheme() {
        assert!(validate_deck_url("ftp://example.com/deck").is_err());
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(validate_deck_url("not a url").is_err());
    }

    #[test]
    fn accepts_https_deck_url() {
        assert!(validate_deck_url("https://docsend.com/view/abc123").is_ok());
    }
}
