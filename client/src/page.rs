//! Reads what the floor template renders into the page.

use spiral_shared::{
    AffineTransform, BackgroundMode, BackgroundSource, FitError, MarkerAnchor, MarkerPlacement,
    ScrollConfig, Size, parse_transform,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::console;

pub(crate) const CONTAINER_ID: &str = "background-container";
pub(crate) const VIDEO_PLAYER_ID: &str = "youtube-background-player";
pub(crate) const ARROWS_ROOT_ID: &str = "scroll-arrows-root";
const MARKER_SELECTOR: &str = ".floor-marker";

const ATTR_BACKGROUND_TYPE: &str = "data-background-type";
const ATTR_IMAGE_WIDTH: &str = "data-image-width";
const ATTR_IMAGE_HEIGHT: &str = "data-image-height";
const ATTR_SCROLL_CONFIG: &str = "data-scroll-config";

pub(crate) fn viewport_size() -> Size {
    let Some(window) = web_sys::window() else {
        return Size::default();
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    Size::new(w, h)
}

pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub(crate) fn document() -> Result<Document, FitError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(FitError::MissingElement("document"))
}

pub(crate) fn body(document: &Document) -> Result<HtmlElement, FitError> {
    document.body().ok_or(FitError::MissingElement("body"))
}

pub(crate) fn html_element_by_id(
    document: &Document,
    id: &'static str,
) -> Result<HtmlElement, FitError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(FitError::MissingElement(id))
}

/// Config override from `data-scroll-config`; falls back to defaults.
pub(crate) fn read_config(body: &Element) -> ScrollConfig {
    let raw = body.get_attribute(ATTR_SCROLL_CONFIG).unwrap_or_default();
    ScrollConfig::from_json(&raw).unwrap_or_else(|e| {
        console::warn(&format!("{e}; using defaults"));
        ScrollConfig::default()
    })
}

/// Background kind and natural size. Video mode measures the player.
pub(crate) fn read_source(
    document: &Document,
    body: &Element,
) -> Result<BackgroundSource, FitError> {
    let mode = BackgroundMode::from_attr(
        &body.get_attribute(ATTR_BACKGROUND_TYPE).unwrap_or_default(),
    );
    match mode {
        BackgroundMode::Image => {
            let width = parse_dimension(body.get_attribute(ATTR_IMAGE_WIDTH).as_deref());
            let height = parse_dimension(body.get_attribute(ATTR_IMAGE_HEIGHT).as_deref());
            Ok(BackgroundSource::image(width, height))
        }
        BackgroundMode::Video => {
            let player = html_element_by_id(document, VIDEO_PLAYER_ID)?;
            Ok(BackgroundSource::video(
                f64::from(player.offset_width()),
                f64::from(player.offset_height()),
            ))
        }
    }
}

/// Computed transform of the container, or identity when it can't be read.
pub(crate) fn read_transform(container: &Element) -> AffineTransform {
    let raw = web_sys::window()
        .and_then(|w| w.get_computed_style(container).ok().flatten())
        .and_then(|style| style.get_property_value("transform").ok())
        .unwrap_or_default();
    parse_transform(&raw).unwrap_or_else(|e| {
        console::warn(&format!("{e}; assuming identity"));
        AffineTransform::IDENTITY
    })
}

pub(crate) struct MarkerElement {
    pub id: String,
    pub anchor: MarkerAnchor,
    pub element: HtmlElement,
}

pub(crate) fn collect_markers(document: &Document) -> Vec<MarkerElement> {
    let Ok(nodes) = document.query_selector_all(MARKER_SELECTOR) else {
        return Vec::new();
    };
    let mut markers = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let Some(anchor) = parse_anchor(
            element.get_attribute("data-x").as_deref(),
            element.get_attribute("data-y").as_deref(),
            element.get_attribute("data-offset-x").as_deref(),
            element.get_attribute("data-offset-y").as_deref(),
        ) else {
            console::warn(&format!("marker #{index} has no usable data-x/data-y"));
            continue;
        };
        let id = marker_id(&element.id(), element.get_attribute("data-marker-id"), index);
        markers.push(MarkerElement {
            id,
            anchor,
            element,
        });
    }
    markers
}

/// Parses a pixel attribute such as `"1920"` or `"1920px"`. Missing or bad
/// values read as 0, which the overflow check reports as unmeasurable.
pub(crate) fn parse_dimension(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .map(|v| v.strip_suffix("px").unwrap_or(v))
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_percent(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    raw.strip_suffix('%')
        .unwrap_or(raw)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub(crate) fn parse_anchor(
    x: Option<&str>,
    y: Option<&str>,
    dx: Option<&str>,
    dy: Option<&str>,
) -> Option<MarkerAnchor> {
    let anchor = MarkerAnchor::percent(parse_percent(x?)?, parse_percent(y?)?);
    Some(anchor.with_pixels(parse_dimension(dx), parse_dimension(dy)))
}

fn marker_id(element_id: &str, data_id: Option<String>, index: u32) -> String {
    if !element_id.is_empty() {
        return element_id.to_string();
    }
    data_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("marker-{index}"))
}

/// Inline style properties for a placed marker.
pub(crate) fn marker_css(placement: &MarkerPlacement) -> [(&'static str, String); 3] {
    [
        ("left", format!("{:.3}%", placement.left_pct)),
        ("top", format!("{:.3}%", placement.top_pct)),
        (
            "transform",
            format!(
                "translate({:.2}px, {:.2}px)",
                placement.shift_x_px, placement.shift_y_px
            ),
        ),
    ]
}
