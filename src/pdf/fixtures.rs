//! In-memory documents and images shared by the unit tests

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

pub const PAGE_TEXT: &str = "Quarterly Report";

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn font_resources(doc: &mut Document) -> ObjectId {
    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", name("Font")),
        ("Subtype", name("Type1")),
        ("BaseFont", name("Helvetica")),
    ]));
    doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]))
}

fn text_content() -> Vec<u8> {
    Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![name("F1"), Object::Integer(12)]),
            Operation::new("Td", vec![Object::Integer(20), Object::Integer(40)]),
            Operation::new("Tj", vec![Object::string_literal(PAGE_TEXT)]),
            Operation::new("ET", vec![]),
        ],
    }
    .encode()
    .unwrap()
}

fn finish(mut doc: Document, pages_id: ObjectId, kids: Vec<ObjectId>) -> Document {
    let count = kids.len() as i64;
    let pages = Dictionary::from_iter([
        ("Type", name("Pages")),
        (
            "Kids",
            Object::Array(kids.into_iter().map(Object::Reference).collect()),
        ),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", name("Catalog")),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

/// Text-only document with one page per `(width, height)`
pub fn text_pdf(sizes: &[(f64, f64)]) -> Vec<u8> {
    save(text_document(sizes))
}

pub fn text_document(sizes: &[(f64, f64)]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = font_resources(&mut doc);

    let mut kids = Vec::new();
    for &(width, height) in sizes {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), text_content()));
        kids.push(doc.add_object(Dictionary::from_iter([
            ("Type", name("Page")),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width as f32),
                    Object::Real(height as f32),
                ]),
            ),
        ])));
    }
    finish(doc, pages_id, kids)
}

/// Single page whose MediaBox and Resources live on the Pages node
pub fn inherited_media_box_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = font_resources(&mut doc);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), text_content()));
    let page_id = doc.add_object(Dictionary::from_iter([
        ("Type", name("Page")),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let mut doc = finish(doc, pages_id, vec![page_id]);
    let pages = doc.get_dictionary_mut(pages_id).unwrap();
    pages.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(10),
            Object::Integer(20),
            Object::Integer(410),
            Object::Integer(520),
        ]),
    );
    pages.set("Resources", Object::Reference(resources_id));
    doc
}

/// One 612x792 page drawing a 2x2 image XObject named `/Im0` at `placement`
/// (`[width, height, x, y]` of the `cm` operator). Returns the document and
/// the image's object id.
pub fn embedded_image_document(placement: [f64; 4]) -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        Dictionary::from_iter([
            ("Type", name("XObject")),
            ("Subtype", name("Image")),
            ("Width", Object::Integer(2)),
            ("Height", Object::Integer(2)),
            ("ColorSpace", name("DeviceGray")),
            ("BitsPerComponent", Object::Integer(8)),
        ]),
        vec![0, 64, 128, 255],
    ));

    let [w, h, x, y] = placement;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(w as f32),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(h as f32),
                    Object::Real(x as f32),
                    Object::Real(y as f32),
                ],
            ),
            Operation::new("Do", vec![name("Im0")]),
            Operation::new("Q", vec![]),
        ],
    }
    .encode()
    .unwrap();
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let resources = Dictionary::from_iter([(
        "XObject",
        Object::Dictionary(Dictionary::from_iter([("Im0", Object::Reference(image_id))])),
    )]);
    let page_id = doc.add_object(Dictionary::from_iter([
        ("Type", name("Page")),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Dictionary(resources)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
    ]));

    (finish(doc, pages_id, vec![page_id]), image_id)
}

pub fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, alpha]));
    encode(DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([20, 90, 200]));
    encode(DynamicImage::ImageRgb8(image), ImageFormat::Jpeg)
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}
