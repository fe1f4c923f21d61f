//! Raster image collection: embedded objects and full-page renders.
//!
//! Two independent sources are deliberately both collected:
//!
//! * **Embedded images** catch photographs and diagrams placed as discrete
//!   objects, at their native resolution.
//! * **Rendered pages** catch content that is visually present but not an
//!   object — vector charts, text styled as an image, layered compositions.
//!
//! The overlap (an embedded photo also appears in its page render) is
//! acceptable: duplicate OCR text in `image_derived_text` is harmless prose,
//! while a missed chart is a wrong answer.
//!
//! ## Why cap pixels, not DPI?
//!
//! Page sizes vary wildly; capping the longest rendered edge keeps memory
//! bounded on oversized pages regardless of their physical dimensions.

use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

use crate::error::DocChatError;

/// Collect every embedded raster object, in page order and, within a page,
/// in listing order.
///
/// A single image that fails to decode is skipped — embedded imagery is
/// best-effort and one bad JPEG must not sink the upload.
pub fn embedded_images(document: &PdfDocument<'_>) -> Vec<DynamicImage> {
    let mut images = Vec::new();

    for (page_index, page) in document.pages().iter().enumerate() {
        for object in page.objects().iter() {
            if let PdfPageObject::Image(ref image_object) = object {
                match image_object.get_raw_image() {
                    Ok(image) => {
                        debug!(
                            "Page {}: embedded image {}x{} px",
                            page_index + 1,
                            image.width(),
                            image.height()
                        );
                        images.push(image);
                    }
                    Err(e) => {
                        warn!(
                            "Page {}: skipping undecodable embedded image: {:?}",
                            page_index + 1,
                            e
                        );
                    }
                }
            }
        }
    }

    images
}

/// Render every page as a full-page raster, longest edge capped at
/// `max_pixels`, in page order.
///
/// A page that fails to render is skipped with a warning; if *no* page
/// renders the whole collection fails, since a paginated document with zero
/// rasterisable pages means the rendering component itself is broken.
pub fn rendered_pages(
    document: &PdfDocument<'_>,
    max_pixels: u32,
) -> Result<Vec<DynamicImage>, DocChatError> {
    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let page_count = document.pages().len() as usize;
    let mut rendered = Vec::with_capacity(page_count);
    let mut first_error = None;

    for (page_index, page) in document.pages().iter().enumerate() {
        match page.render_with_config(&render_config) {
            Ok(bitmap) => {
                let image = bitmap.as_image();
                debug!(
                    "Rendered page {} → {}x{} px",
                    page_index + 1,
                    image.width(),
                    image.height()
                );
                rendered.push(image);
            }
            Err(e) => {
                warn!("Page {}: rasterisation failed: {:?}", page_index + 1, e);
                first_error.get_or_insert_with(|| format!("{:?}", e));
            }
        }
    }

    if rendered.is_empty() && page_count > 0 {
        return Err(DocChatError::RenderingFailed {
            detail: first_error.unwrap_or_else(|| "no pages rendered".to_string()),
        });
    }

    Ok(rendered)
}
