use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Convert a JS exception into an `anyhow::Error`.
#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{}", js_message(&e))
}

/// Best-effort human readable text for a thrown JS value.
pub fn js_message(e: &JsValue) -> String {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// Deserialize a plain JS object through JSON.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> anyhow::Result<T> {
    let json = js_sys::JSON::stringify(value).map_err(js_err)?;
    let json = json
        .as_string()
        .ok_or_else(|| anyhow::anyhow!("props are not serializable"))?;
    Ok(serde_json::from_str(&json)?)
}

pub fn create_element(document: &web::Document, tag: &str, class: &str) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element(tag)
        .map_err(js_err)?
        .dyn_into::<web::HtmlElement>()
        .map_err(|_| anyhow::anyhow!("<{}> is not an HtmlElement", tag))?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

pub fn create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("canvas element has unexpected type"))
}

#[inline]
pub fn set_style(el: &web::HtmlElement, prop: &str, value: &str) {
    _ = el.style().set_property(prop, value);
}

/// Container size in CSS pixels.
#[inline]
pub fn element_css_size(el: &web::Element) -> (f32, f32) {
    let rect = el.get_bounding_client_rect();
    (rect.width() as f32, rect.height() as f32)
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(0.1)
}

/// Match the canvas backing store to the container's CSS size times the
/// device pixel ratio, capped per axis. Returns the new backing size.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    container: &web::Element,
    max_dimension: u32,
) -> (u32, u32) {
    let dpr = device_pixel_ratio();
    let rect = container.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).clamp(1, max_dimension.max(1));
    let h_px = ((rect.height() * dpr) as u32).clamp(1, max_dimension.max(1));
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    (w_px, h_px)
}

/// Pointer position relative to `el`, in CSS pixels.
#[inline]
pub fn pointer_offset(ev: &web::MouseEvent, el: &web::Element) -> (f32, f32) {
    let rect = el.get_bounding_client_rect();
    (
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

/// Absolute URL for `src`, resolved against `base` or the document base URI.
pub fn resolve_url(src: &str, base: Option<&str>) -> anyhow::Result<String> {
    let base = match base {
        Some(b) => b.to_string(),
        None => window_document()
            .and_then(|d| d.base_uri().ok().flatten())
            .or_else(|| web::window().and_then(|w| w.location().href().ok()))
            .ok_or_else(|| anyhow::anyhow!("no base URL to resolve {}", src))?,
    };
    let url = web::Url::new_with_base(src, &base).map_err(js_err)?;
    Ok(url.href())
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
