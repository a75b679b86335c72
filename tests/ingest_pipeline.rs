//! End-to-end ingestion through the public API with the real `image` backend.

use folio_ingest::config::{IngestConfig, NamingPolicy};
use folio_ingest::ingest::{IngestError, Pipeline, handle_upload};
use folio_ingest::types::{Category, TargetSize, UploadedImage};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn pipeline(root: &Path) -> Pipeline {
    let config = IngestConfig {
        upload_root: root.join("static/uploads"),
        ..IngestConfig::default()
    };
    let pipeline = Pipeline::new(config);
    pipeline.store().ensure_layout().unwrap();
    pipeline
}

/// Encode a `width`x`height` test card. Quadrant colors make crops visible.
fn encode(width: u32, height: u32, format: ImageFormat, with_alpha: bool) -> Vec<u8> {
    let rgba = RgbaImage::from_fn(width, height, |x, y| {
        let left = x < width / 2;
        let top = y < height / 2;
        let alpha = if with_alpha && left { 0 } else { 255 };
        match (left, top) {
            (true, true) => Rgba([255, 0, 0, alpha]),
            (false, true) => Rgba([0, 255, 0, alpha]),
            (true, false) => Rgba([0, 0, 255, alpha]),
            (false, false) => Rgba([255, 255, 0, alpha]),
        }
    });
    let img = if with_alpha {
        DynamicImage::ImageRgba8(rgba)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
    };
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn solid_png(color: [u8; 3]) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb(color)));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn stored_image(pipeline: &Pipeline, category: Category, name: &str) -> DynamicImage {
    let path = pipeline.store().category_dir(category).join(name);
    image::open(&path).unwrap_or_else(|e| panic!("cannot open {}: {e}", path.display()))
}

#[test]
fn landscape_png_with_alpha_becomes_exact_rgb() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());

    let upload = UploadedImage::new("team.png", encode(800, 400, ImageFormat::Png, true));
    let path = pipeline.ingest(Category::Projects, &upload).unwrap();
    assert_eq!(path.as_str(), "uploads/projects/team.png");

    let stored = stored_image(&pipeline, Category::Projects, "team.png");
    assert_eq!((stored.width(), stored.height()), (450, 350));
    assert!(!stored.color().has_alpha());
}

#[test]
fn portrait_jpeg_becomes_exact_size() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());

    let upload = UploadedImage::new("Team.JPG", encode(400, 800, ImageFormat::Jpeg, false));
    let path = pipeline.ingest(Category::Clients, &upload).unwrap();
    assert_eq!(path.as_str(), "uploads/clients/Team.JPG");

    let stored = stored_image(&pipeline, Category::Clients, "Team.JPG");
    assert_eq!((stored.width(), stored.height()), (450, 350));
}

#[test]
fn gif_upload_is_stored_as_gif() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());

    let upload = UploadedImage::new("logo.gif", encode(90, 90, ImageFormat::Gif, false));
    pipeline.ingest(Category::Clients, &upload).unwrap();

    let path = pipeline.store().category_dir(Category::Clients).join("logo.gif");
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..3], b"GIF");
    let stored = image::load_from_memory(&bytes).unwrap();
    assert_eq!((stored.width(), stored.height()), (450, 350));
}

#[test]
fn content_type_is_sniffed_not_trusted() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());

    // PNG bytes under a .jpg name decode fine and are re-encoded as JPEG.
    let upload = UploadedImage::new("photo.jpg", encode(300, 300, ImageFormat::Png, false));
    pipeline.ingest(Category::Projects, &upload).unwrap();

    let bytes =
        std::fs::read(pipeline.store().category_dir(Category::Projects).join("photo.jpg")).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn center_crop_keeps_the_middle() {
    let tmp = TempDir::new().unwrap();
    let config = IngestConfig {
        upload_root: tmp.path().join("static/uploads"),
        categories: folio_ingest::config::CategoriesConfig {
            projects: TargetSize::new(100, 100),
            clients: TargetSize::new(100, 100),
        },
        ..IngestConfig::default()
    };
    let pipeline = Pipeline::new(config);
    pipeline.store().ensure_layout().unwrap();

    // 400x100 card cropped to a square keeps x in 150..250: the boundary
    // between the red/blue and green/yellow halves sits in the middle.
    let upload = UploadedImage::new("wide.png", encode(400, 100, ImageFormat::Png, false));
    pipeline.ingest(Category::Projects, &upload).unwrap();

    let stored = stored_image(&pipeline, Category::Projects, "wide.png").to_rgb8();
    assert_eq!(stored.get_pixel(5, 5).0, [255, 0, 0]);
    assert_eq!(stored.get_pixel(94, 5).0, [0, 255, 0]);
    assert_eq!(stored.get_pixel(5, 94).0, [0, 0, 255]);
    assert_eq!(stored.get_pixel(94, 94).0, [255, 255, 0]);
}

#[test]
fn reingest_is_idempotent_and_overwrites() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());
    let upload = UploadedImage::new("team.png", encode(640, 480, ImageFormat::Png, false));
    let file = pipeline.store().category_dir(Category::Projects).join("team.png");

    pipeline.ingest(Category::Projects, &upload).unwrap();
    let first = std::fs::read(&file).unwrap();
    pipeline.ingest(Category::Projects, &upload).unwrap();
    let second = std::fs::read(&file).unwrap();

    assert_eq!(first, second);
    let entries = std::fs::read_dir(pipeline.store().category_dir(Category::Projects))
        .unwrap()
        .count();
    assert_eq!(entries, 1);
}

#[test]
fn same_name_different_content_replaces_previous() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());
    let file = pipeline.store().category_dir(Category::Clients).join("a.png");

    pipeline
        .ingest(Category::Clients, &UploadedImage::new("a.png", solid_png([200, 10, 10])))
        .unwrap();
    pipeline
        .ingest(Category::Clients, &UploadedImage::new("a.png", solid_png([10, 10, 200])))
        .unwrap();

    let stored = image::open(&file).unwrap().to_rgb8();
    let [r, _, b] = stored.get_pixel(200, 150).0;
    assert!(r < 50 && b > 150, "expected the second upload, got {r},{b}");
}

#[test]
fn content_hash_naming_keeps_both_versions() {
    let tmp = TempDir::new().unwrap();
    let mut config = IngestConfig {
        upload_root: tmp.path().join("static/uploads"),
        ..IngestConfig::default()
    };
    config.output.naming = NamingPolicy::ContentHash;
    let pipeline = Pipeline::new(config);
    pipeline.store().ensure_layout().unwrap();

    let a = pipeline
        .ingest(
            Category::Projects,
            &UploadedImage::new("a.png", encode(100, 100, ImageFormat::Png, false)),
        )
        .unwrap();
    let b = pipeline
        .ingest(
            Category::Projects,
            &UploadedImage::new("a.png", encode(120, 100, ImageFormat::Png, false)),
        )
        .unwrap();

    assert_ne!(a, b);
    assert!(a.as_str().starts_with("uploads/projects/a-"));
    assert!(a.as_str().ends_with(".png"));
}

#[test]
fn rejection_scenarios() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());

    let exe = pipeline.ingest(Category::Projects, &UploadedImage::new("malware.exe", vec![1, 2]));
    assert!(matches!(exe, Err(IngestError::Validation(_))));

    let bare = pipeline.ingest(Category::Projects, &UploadedImage::new("photo", vec![1, 2]));
    assert!(matches!(bare, Err(IngestError::Validation(_))));

    let noise: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    let junk = pipeline.ingest(Category::Projects, &UploadedImage::new("a.png", noise));
    assert!(matches!(junk, Err(IngestError::Decode(_))));

    let dir = pipeline.store().category_dir(Category::Projects);
    assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
}

#[test]
fn boundary_reports_structured_outcomes() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());

    let ok = handle_upload(
        &pipeline,
        Category::Clients,
        Some(&UploadedImage::new("ceo.jpeg", encode(500, 700, ImageFormat::Jpeg, false))),
    );
    assert!(ok.success);
    assert_eq!(ok.path.unwrap().as_str(), "uploads/clients/ceo.jpeg");

    let missing = handle_upload(&pipeline, Category::Clients, None);
    assert_eq!(missing.message, "No image uploaded");

    let invalid = handle_upload(
        &pipeline,
        Category::Clients,
        Some(&UploadedImage::new("", vec![1])),
    );
    assert_eq!(invalid.message, "Invalid file");
}

#[test]
fn concurrent_ingests_of_distinct_names() {
    let tmp = TempDir::new().unwrap();
    let pipeline = pipeline(tmp.path());
    let data = encode(200, 150, ImageFormat::Png, true);

    std::thread::scope(|scope| {
        for i in 0..4 {
            let pipeline = &pipeline;
            let data = data.clone();
            scope.spawn(move || {
                let upload = UploadedImage::new(format!("img{i}.png"), data);
                pipeline.ingest(Category::Projects, &upload).unwrap();
            });
        }
    });

    for i in 0..4 {
        let stored = stored_image(&pipeline, Category::Projects, &format!("img{i}.png"));
        assert_eq!((stored.width(), stored.height()), (450, 350));
    }
}
