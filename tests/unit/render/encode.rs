use super::*;

fn composite(w: u32, h: u32, premul: [u8; 4]) -> CompositeImage {
    CompositeImage {
        width: w,
        height: h,
        rgba8_premul: premul.repeat((w * h) as usize),
    }
}

#[test]
fn file_name_uses_job_id_when_present() {
    assert_eq!(suggested_file_name(Some("job-42")), "mini-me-job-42.png");
    assert_eq!(suggested_file_name(None), "mini-me-customized.png");
    assert_eq!(suggested_file_name(Some("  ")), "mini-me-customized.png");
}

#[test]
fn png_round_trips_dimensions_and_unpremultiplies() {
    let img = composite(3, 2, [64, 0, 0, 128]);
    let blob = to_blob(&img, None).unwrap();
    assert_eq!((blob.width, blob.height), (3, 2));
    assert_eq!(
        image::guess_format(&blob.bytes).unwrap(),
        image::ImageFormat::Png
    );
    let decoded = image::load_from_memory(&blob.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    let px = decoded.get_pixel(1, 1).0;
    assert_eq!(px[3], 128);
    assert!(px[0].abs_diff(128) <= 1, "{px:?}");
}

#[test]
fn short_buffers_are_render_errors() {
    let img = CompositeImage {
        width: 4,
        height: 4,
        rgba8_premul: vec![0; 8],
    };
    assert!(matches!(encode_png(&img), Err(EditorError::Render(_))));
}

#[test]
fn write_png_creates_file() {
    let dir = std::env::temp_dir().join(format!("avatar-editor-encode-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("out.png");
    write_png(&composite(2, 2, [0, 0, 0, 255]), &path).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2, 2));
    let _ = std::fs::remove_dir_all(&dir);
}
