use pdf_writer::{Filter, Name, Pdf, Rect, Ref};

use super::canvas::PageSet;
use crate::error::Error;
use crate::fonts::FontCatalog;
use crate::model::{ChartImage, ImageFormat};

/// Handle to a staged image, resolvable to an XObject resource name on any
/// page of the assembled document.
#[derive(Clone, Copy, Debug)]
pub struct ImageHandle(pub(crate) usize);

impl ImageHandle {
    pub(crate) fn resource_name(self) -> String {
        format!("Im{}", self.0 + 1)
    }
}

enum StoredImage {
    Jpeg {
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
    Raster {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
        width: u32,
        height: u32,
    },
}

/// Staging area for raster assets. PNG data is decoded at insert time so a
/// bad asset surfaces as a skipped chart during layout, never as a dangling
/// XObject reference at assembly.
#[derive(Default)]
pub struct AssetStore {
    images: Vec<StoredImage>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, img: &ChartImage) -> Option<ImageHandle> {
        let stored = match img.format {
            ImageFormat::Jpeg => {
                if img.data.is_empty() || img.pixel_width == 0 || img.pixel_height == 0 {
                    log::warn!("skipping JPEG asset with no data or zero dimensions");
                    return None;
                }
                StoredImage::Jpeg {
                    data: img.data.clone(),
                    width: img.pixel_width,
                    height: img.pixel_height,
                }
            }
            ImageFormat::Png => {
                let cursor = std::io::Cursor::new(&img.data);
                let reader = image::ImageReader::with_format(
                    std::io::BufReader::new(cursor),
                    image::ImageFormat::Png,
                );
                let decoded = match reader.decode() {
                    Ok(d) => d,
                    Err(e) => {
                        log::warn!("skipping undecodable PNG asset: {e}");
                        return None;
                    }
                };
                let rgba: image::RgbaImage = decoded.to_rgba8();
                let (w, h) = (rgba.width(), rgba.height());
                let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
                let rgb: Vec<u8> = rgba
                    .pixels()
                    .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                    .collect();
                let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());
                StoredImage::Raster {
                    rgb,
                    alpha,
                    width: w,
                    height: h,
                }
            }
        };
        self.images.push(stored);
        Some(ImageHandle(self.images.len() - 1))
    }

    fn embed(&self, pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Vec<(String, Ref)> {
        self.images
            .iter()
            .enumerate()
            .map(|(i, stored)| {
                let xobj_ref = alloc();
                let pdf_name = format!("Im{}", i + 1);
                match stored {
                    StoredImage::Jpeg {
                        data,
                        width,
                        height,
                    } => {
                        let mut xobj = pdf.image_xobject(xobj_ref, data);
                        xobj.filter(Filter::DctDecode);
                        xobj.width(*width as i32);
                        xobj.height(*height as i32);
                        xobj.color_space().device_rgb();
                        xobj.bits_per_component(8);
                    }
                    StoredImage::Raster {
                        rgb,
                        alpha,
                        width,
                        height,
                    } => {
                        let smask_ref = alpha.as_ref().map(|alpha_data| {
                            let compressed =
                                miniz_oxide::deflate::compress_to_vec_zlib(alpha_data, 6);
                            let mask_ref = alloc();
                            let mut mask = pdf.image_xobject(mask_ref, &compressed);
                            mask.filter(Filter::FlateDecode);
                            mask.width(*width as i32);
                            mask.height(*height as i32);
                            mask.color_space().device_gray();
                            mask.bits_per_component(8);
                            mask_ref
                        });

                        let compressed_rgb =
                            miniz_oxide::deflate::compress_to_vec_zlib(rgb, 6);
                        let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
                        xobj.filter(Filter::FlateDecode);
                        xobj.width(*width as i32);
                        xobj.height(*height as i32);
                        xobj.color_space().device_rgb();
                        xobj.bits_per_component(8);
                        if let Some(mask_ref) = smask_ref {
                            xobj.s_mask(mask_ref);
                        }
                    }
                }
                (pdf_name, xobj_ref)
            })
            .collect()
    }
}

/// Merge the three page sets into one document: cover, then the TOC pages,
/// then body pages 2..N (body page 1 is the cover-duplicate placeholder).
/// Content streams are copied verbatim; every page shares one font and
/// XObject resource dictionary. All validation happens before the first
/// byte is written, so a failure never leaves a partial document.
pub fn merge(
    fonts: &FontCatalog,
    assets: &AssetStore,
    page_size: (f32, f32),
    cover: &PageSet,
    toc: &PageSet,
    body: &PageSet,
) -> Result<Vec<u8>, Error> {
    if cover.pages.len() != 1 {
        return Err(Error::Assembly(format!(
            "cover must be exactly one page, got {}",
            cover.pages.len()
        )));
    }
    if toc.pages.is_empty() {
        return Err(Error::Assembly(
            "table of contents pass produced no pages".to_string(),
        ));
    }
    if body.pages.len() < 2 {
        return Err(Error::Assembly(format!(
            "body pass produced {} page(s); expected the cover placeholder plus content",
            body.pages.len()
        )));
    }

    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let font_pairs = fonts.register(&mut pdf, &mut alloc);
    let image_pairs = assets.embed(&mut pdf, &mut alloc);

    let ordered: Vec<&[u8]> = std::iter::once(cover.pages[0].as_slice())
        .chain(toc.pages.iter().map(|p| p.as_slice()))
        .chain(body.pages[1..].iter().map(|p| p.as_slice()))
        .collect();

    let page_ids: Vec<Ref> = ordered.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = ordered.iter().map(|_| alloc()).collect();

    for (i, raw) in ordered.iter().enumerate() {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw, 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(ordered.len() as i32);

    for i in 0..ordered.len() {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_size.0, page_size.1))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (name, font_ref) in &font_pairs {
                font_dict.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_pairs.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_pairs {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    log::debug!(
        "merged {} pages ({} images) in {:.1}ms",
        ordered.len(),
        image_pairs.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
