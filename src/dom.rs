use crate::constants::{STYLESHEET, STYLESHEET_ID};
use anyhow::anyhow;
use glass_core::{DisplacementTexture, Rect};
use std::cell::OnceCell;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys as web;

pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn create_div(document: &web::Document, class: &str) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("div")
        .map_err(js_err)?
        .dyn_into::<web::HtmlElement>()
        .map_err(|_| anyhow!("div is not an HtmlElement"))?;
    el.set_class_name(class);
    Ok(el)
}

/// Add the shared stylesheet once per document.
pub fn ensure_stylesheet(document: &web::Document) -> anyhow::Result<()> {
    if document.get_element_by_id(STYLESHEET_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style").map_err(js_err)?;
    style.set_id(STYLESHEET_ID);
    style.set_text_content(Some(STYLESHEET));
    let head = document
        .head()
        .ok_or_else(|| anyhow!("document has no <head>"))?;
    head.append_child(&style).map_err(js_err)?;
    Ok(())
}

/// Hidden holder for a panel's SVG definitions, appended to `<body>`.
pub fn insert_defs(document: &web::Document, markup: &str) -> anyhow::Result<web::HtmlElement> {
    let holder = create_div(document, "")?;
    _ = holder.set_attribute("aria-hidden", "true");
    holder.set_inner_html(markup);
    let body = document
        .body()
        .ok_or_else(|| anyhow!("document has no <body>"))?;
    body.append_child(&holder).map_err(js_err)?;
    Ok(holder)
}

pub fn bounding_rect(el: &web::Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

/// Bounds of `el`, or `None` once it has left the document.
pub fn connected_rect(el: &web::Element) -> Option<Rect> {
    el.is_connected().then(|| bounding_rect(el))
}

/// Move every child of `from` to the end of `to`.
pub fn move_children(from: &web::Node, to: &web::Node) -> anyhow::Result<()> {
    while let Some(child) = from.first_child() {
        to.append_child(&child).map_err(js_err)?;
    }
    Ok(())
}

fn encode_texture(document: &web::Document, texture: &DisplacementTexture) -> anyhow::Result<String> {
    let canvas = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow!("canvas element has the wrong type"))?;
    canvas.set_width(texture.width());
    canvas.set_height(texture.height());
    let ctx = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|_| anyhow!("2d context has the wrong type"))?;
    let image = web::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(texture.as_rgba8()),
        texture.width(),
        texture.height(),
    )
    .map_err(js_err)?;
    ctx.put_image_data(&image, 0.0, 0.0).map_err(js_err)?;
    canvas.to_data_url().map_err(js_err)
}

thread_local! {
    static TEXTURE_URI: OnceCell<Option<String>> = const { OnceCell::new() };
}

/// The shared texture as a PNG data URI, encoded once. `None` when no
/// canvas is available; panels then render without the glass filter.
pub fn texture_data_uri(document: &web::Document) -> Option<String> {
    TEXTURE_URI.with(|cell| {
        cell.get_or_init(|| {
            let texture = glass_core::texture::shared();
            match encode_texture(document, &texture) {
                Ok(uri) => {
                    log::info!("[texture] encoded data uri ({} bytes)", uri.len());
                    Some(uri)
                }
                Err(e) => {
                    log::warn!("[texture] unavailable, panels render unfiltered: {e}");
                    None
                }
            }
        })
        .clone()
    })
}
