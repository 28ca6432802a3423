//! Panorama image loading.
//!
//! `load_texture` fetches the image, decodes it, and draws it into an
//! off-screen canvas no wider than the requested maximum. The fast path is
//! `fetch` + `createImageBitmap`; any failure there falls through to an
//! `<img>` element. Only a failure of the element path is fatal.

use crate::core::load::{settle_failure, FetchErrorPolicy, LoadError};
use crate::core::raster::{fit_to_max_width, RasterImage};
use crate::dom::{self, js_message};
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

enum DecodeSource<'a> {
    Bitmap(&'a web::ImageBitmap),
    Element(&'a web::HtmlImageElement),
}

impl DecodeSource<'_> {
    fn size(&self) -> (u32, u32) {
        match self {
            DecodeSource::Bitmap(b) => (b.width(), b.height()),
            DecodeSource::Element(img) => (img.natural_width(), img.natural_height()),
        }
    }
}

/// Revokes an object URL when dropped, on every exit path.
struct ObjectUrl(String);

impl ObjectUrl {
    fn for_blob(blob: &web::Blob) -> Result<Self, LoadError> {
        web::Url::create_object_url_with_blob(blob)
            .map(ObjectUrl)
            .map_err(|e| LoadError::Decode(js_message(&e)))
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        _ = web::Url::revoke_object_url(&self.0);
    }
}

/// Load `url` (already absolute) into a raster at most `max_width` wide.
pub async fn load_texture(
    url: &str,
    max_width: u32,
    policy: FetchErrorPolicy,
) -> Result<RasterImage, LoadError> {
    let (blob, fetch_error) = match fetch_blob(url).await {
        Ok(blob) => (Some(blob), None),
        Err(e) => {
            log::warn!("[texture] fetch failed for {}: {}", url, e);
            (None, Some(e))
        }
    };

    if let Some(blob) = &blob {
        match decode_bitmap(blob, max_width).await {
            Ok(raster) => return Ok(raster),
            Err(e) => log::warn!("[texture] bitmap decode failed, using <img>: {}", e),
        }
    }

    decode_element(url, blob.as_ref(), max_width)
        .await
        .map_err(|decode| settle_failure(policy, fetch_error, decode))
}

async fn fetch_blob(url: &str) -> Result<web::Blob, LoadError> {
    let window = web::window().ok_or_else(|| LoadError::Network("no window".into()))?;
    let init = web::RequestInit::new();
    init.set_method("GET");
    init.set_cache(web::RequestCache::ForceCache);
    let request = web::Request::new_with_str_and_init(url, &init)
        .map_err(|e| LoadError::Network(js_message(&e)))?;
    let resp = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| LoadError::Network(js_message(&e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|_| LoadError::Network("fetch did not return a Response".into()))?;
    if !resp.ok() {
        return Err(LoadError::Http {
            status: resp.status(),
            reason: resp.status_text(),
        });
    }
    let blob = resp.blob().map_err(|e| LoadError::Network(js_message(&e)))?;
    let blob = JsFuture::from(blob)
        .await
        .map_err(|e| LoadError::Network(js_message(&e)))?;
    blob.dyn_into::<web::Blob>()
        .map_err(|_| LoadError::Network("response body is not a Blob".into()))
}

async fn decode_bitmap(blob: &web::Blob, max_width: u32) -> Result<RasterImage, LoadError> {
    let window = web::window().ok_or_else(|| LoadError::Decode("no window".into()))?;
    let promise = window
        .create_image_bitmap_with_blob(blob)
        .map_err(|e| LoadError::Decode(js_message(&e)))?;
    let bitmap = JsFuture::from(promise)
        .await
        .map_err(|e| LoadError::Decode(js_message(&e)))?
        .dyn_into::<web::ImageBitmap>()
        .map_err(|_| LoadError::Decode("not an ImageBitmap".into()))?;
    let raster = draw_scaled(DecodeSource::Bitmap(&bitmap), max_width);
    bitmap.close();
    raster
}

async fn decode_element(
    url: &str,
    blob: Option<&web::Blob>,
    max_width: u32,
) -> Result<RasterImage, LoadError> {
    let img = web::HtmlImageElement::new().map_err(|e| LoadError::Decode(js_message(&e)))?;
    let object_url = blob.map(ObjectUrl::for_blob).transpose()?;
    if object_url.is_none() {
        img.set_cross_origin(Some("anonymous"));
    }
    let src = object_url.as_ref().map(|u| u.0.as_str()).unwrap_or(url);

    let loaded = Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(src);
    let result = JsFuture::from(loaded).await;
    img.set_onload(None);
    img.set_onerror(None);
    result.map_err(|_| LoadError::Decode(format!("image element failed to load {}", url)))?;

    draw_scaled(DecodeSource::Element(&img), max_width)
}

fn draw_scaled(source: DecodeSource<'_>, max_width: u32) -> Result<RasterImage, LoadError> {
    let (src_w, src_h) = source.size();
    if src_w == 0 || src_h == 0 {
        return Err(LoadError::Decode("image has no pixels".into()));
    }
    let (w, h) = fit_to_max_width(src_w, src_h, max_width);
    if (w, h) != (src_w, src_h) {
        log::info!("[texture] downscaling {}x{} -> {}x{}", src_w, src_h, w, h);
    }

    let document = dom::window_document().ok_or_else(|| LoadError::Decode("no document".into()))?;
    let canvas = dom::create_canvas(&document).map_err(|e| LoadError::Decode(e.to_string()))?;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<web::CanvasRenderingContext2d>().ok())
        .ok_or_else(|| LoadError::Decode("2d context unavailable".into()))?;
    ctx.set_image_smoothing_enabled(true);
    let (dw, dh) = (w as f64, h as f64);
    let drawn = match source {
        DecodeSource::Bitmap(b) => ctx.draw_image_with_image_bitmap_and_dw_and_dh(b, 0.0, 0.0, dw, dh),
        DecodeSource::Element(img) => {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, dw, dh)
        }
    };
    drawn.map_err(|e| LoadError::Decode(js_message(&e)))?;

    let data = ctx
        .get_image_data(0.0, 0.0, dw, dh)
        .map_err(|e| LoadError::Decode(js_message(&e)))?;
    let pixels = data.data().0;
    // Release the backing store right away; large panoramas are hundreds of MB.
    canvas.set_width(0);
    canvas.set_height(0);
    Ok(RasterImage {
        width: w,
        height: h,
        pixels,
    })
}

