//! Image XObject construction for the replacement logo
//!
//! Baseline JPEGs with one or three components are embedded as-is with
//! `DCTDecode`. Everything else is decoded to 8-bit gray or RGB samples;
//! an alpha channel becomes a separate `/SMask` image. Sample data is left
//! unfiltered here and deflated when the document is saved.

use image::{ColorType, DynamicImage, ImageFormat};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::replacement::ReplacementImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
}

impl ColorSpace {
    fn pdf_name(self) -> &'static [u8] {
        match self {
            ColorSpace::DeviceGray => b"DeviceGray",
            ColorSpace::DeviceRgb => b"DeviceRGB",
        }
    }
}

/// Image ready to be written into a document
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    /// `Some("DCTDecode")` for passthrough JPEG, `None` for raw samples
    pub filter: Option<&'static str>,
    pub data: Vec<u8>,
    /// 8-bit soft mask, omitted when the image is fully opaque
    pub alpha: Option<Vec<u8>>,
}

/// An image XObject that has been added to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
}

impl ImageXObject {
    pub fn from_replacement(logo: &ReplacementImage) -> Self {
        if logo.format() == Some(ImageFormat::Jpeg) {
            if let Some(xobject) = Self::from_jpeg(logo.bytes(), logo.image()) {
                return xobject;
            }
        }
        Self::from_pixels(logo.image())
    }

    /// Passthrough for JPEGs whose component count maps onto a device space
    fn from_jpeg(bytes: &[u8], image: &DynamicImage) -> Option<Self> {
        let color_space = match jpeg_components(bytes)? {
            1 => ColorSpace::DeviceGray,
            3 => ColorSpace::DeviceRgb,
            _ => return None,
        };
        Some(Self {
            width: image.width(),
            height: image.height(),
            color_space,
            filter: Some("DCTDecode"),
            data: bytes.to_vec(),
            alpha: None,
        })
    }

    fn from_pixels(image: &DynamicImage) -> Self {
        let color = image.color();
        let gray = matches!(
            color,
            ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
        );

        let (data, color_space) = if gray {
            (image.to_luma8().into_raw(), ColorSpace::DeviceGray)
        } else {
            (image.to_rgb8().into_raw(), ColorSpace::DeviceRgb)
        };

        let alpha = if color.has_alpha() {
            let mask: Vec<u8> = image
                .to_rgba8()
                .pixels()
                .map(|pixel| pixel.0[3])
                .collect();
            mask.iter().any(|&a| a != u8::MAX).then_some(mask)
        } else {
            None
        };

        Self {
            width: image.width(),
            height: image.height(),
            color_space,
            filter: None,
            data,
            alpha,
        }
    }

    /// Add the image (and its soft mask) to `doc`
    pub fn embed(&self, doc: &mut Document) -> EmbeddedImage {
        let mut dict = self.base_dict(self.color_space);
        if let Some(filter) = self.filter {
            dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
        }
        if let Some(alpha) = &self.alpha {
            let mask = Stream::new(self.base_dict(ColorSpace::DeviceGray), alpha.clone());
            let mask_id = doc.add_object(mask);
            dict.set("SMask", Object::Reference(mask_id));
        }

        let mut stream = Stream::new(dict, self.data.clone());
        // DCT data is already compressed
        if self.filter.is_some() {
            stream.allows_compression = false;
        }
        let id = doc.add_object(stream);

        EmbeddedImage {
            id,
            width: self.width,
            height: self.height,
        }
    }

    fn base_dict(&self, color_space: ColorSpace) -> Dictionary {
        Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(i64::from(self.width))),
            ("Height", Object::Integer(i64::from(self.height))),
            ("ColorSpace", Object::Name(color_space.pdf_name().to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
        ])
    }
}

/// Number of color components declared in a JPEG's start-of-frame segment
fn jpeg_components(data: &[u8]) -> Option<u8> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return Some(data[i + 9]);
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            return None;
        }
        i += 2 + length;
    }
    None
}
