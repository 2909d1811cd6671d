use std::io::Cursor;

use super::*;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn parse_distinguishes_urls_from_paths() {
    assert_eq!(
        ImageSource::parse("https://cdn.example.com/a.png"),
        ImageSource::Url("https://cdn.example.com/a.png".to_owned())
    );
    assert_eq!(
        ImageSource::parse("photos/a.png"),
        ImageSource::Path(PathBuf::from("photos/a.png"))
    );
}

#[test]
fn load_pair_returns_both_images_in_their_slots() {
    let bg = ImageSource::from(png(8, 4, [10, 20, 30, 255]));
    let fg = ImageSource::from(png(2, 3, [200, 0, 0, 255]));
    let pair = load_pair(&bg, &fg, Duration::from_secs(10)).unwrap();
    assert_eq!((pair.background.width, pair.background.height), (8, 4));
    assert_eq!((pair.overlay.width, pair.overlay.height), (2, 3));
}

#[test]
fn missing_overlay_fails_the_pair_with_load_error() {
    let bg = ImageSource::from(png(4, 4, [0, 0, 0, 255]));
    let fg = ImageSource::Path(PathBuf::from("target/definitely/missing/avatar.png"));
    let err = load_pair(&bg, &fg, Duration::from_secs(10)).unwrap_err();
    assert!(matches!(err, EditorError::Load(_)), "{err}");
}

#[test]
fn undecodable_background_fails_the_pair() {
    let bg = ImageSource::from(b"<html>404</html>".to_vec());
    let fg = ImageSource::from(png(4, 4, [0, 0, 0, 255]));
    let err = load_pair(&bg, &fg, Duration::from_secs(10)).unwrap_err();
    assert!(matches!(err, EditorError::Load(_)), "{err}");
    assert!(err.to_string().contains("<16 bytes>"));
}

#[cfg(not(feature = "http"))]
#[test]
fn url_sources_need_http_feature() {
    let err = ImageSource::parse("https://example.com/a.png")
        .fetch()
        .unwrap_err();
    assert!(err.to_string().contains("'http' feature"));
}

#[cfg(unix)]
fn fifo(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("loader_fifo");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    let status = std::process::Command::new("mkfifo")
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());
    path
}

#[cfg(unix)]
#[test]
fn stalled_source_times_out_instead_of_hanging() {
    let path = fifo("stalled.png");
    let bg = ImageSource::from(png(4, 4, [0, 0, 0, 255]));
    let fg = ImageSource::Path(path.clone());

    let started = Instant::now();
    let err = load_pair(&bg, &fg, Duration::from_millis(200)).unwrap_err();
    let elapsed = started.elapsed();
    assert!(matches!(err, EditorError::Timeout(_)), "{err}");
    assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");

    // Unblock the abandoned reader.
    drop(std::fs::OpenOptions::new().write(true).open(&path).unwrap());
}

#[cfg(unix)]
#[test]
fn pending_load_resumes_after_timeout() {
    let path = fifo("resumed.png");
    let bg = ImageSource::from(png(6, 2, [0, 0, 0, 255]));
    let fg = ImageSource::Path(path.clone());

    let mut pending = PendingLoad::spawn(&bg, &fg).unwrap();
    let err = pending.wait(Duration::from_millis(100)).unwrap_err();
    assert!(matches!(err, EditorError::Timeout(_)), "{err}");

    std::fs::write(&path, png(3, 5, [255, 0, 0, 255])).unwrap();
    let pair = pending.wait(Duration::from_secs(10)).unwrap();
    assert_eq!((pair.background.width, pair.background.height), (6, 2));
    assert_eq!((pair.overlay.width, pair.overlay.height), (3, 5));
}
