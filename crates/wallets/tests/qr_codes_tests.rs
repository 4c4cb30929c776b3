//! Tests for the key QR sheet.

use neo_wallets::*;
use parking_lot::Mutex;

/// Encodes by prefixing the content, enough to tell images apart
struct TaggingEncoder;

impl QrEncoder for TaggingEncoder {
    fn encode(&self, content: &str) -> Result<Vec<u8>, QrError> {
        Ok(format!("qr:{}", content).into_bytes())
    }
}

struct FailingEncoder;

impl QrEncoder for FailingEncoder {
    fn encode(&self, _content: &str) -> Result<Vec<u8>, QrError> {
        Err(QrError::Encoding("data too long".to_string()))
    }
}

#[derive(Default)]
struct FakeClipboard {
    fail: bool,
    copies: Mutex<Vec<(Vec<u8>, String)>>,
}

#[async_trait::async_trait]
impl ImageClipboard for FakeClipboard {
    async fn copy_image(&self, image: &[u8], name: &str) -> Result<(), QrError> {
        if self.fail {
            return Err(QrError::Clipboard("clipboard unavailable".to_string()));
        }
        self.copies.lock().push((image.to_vec(), name.to_string()));
        Ok(())
    }
}

fn material() -> KeyMaterial {
    KeyMaterial::new(
        "NZNovmGd2YMHaB3XGR3sB2vuGBeAJFmyut",
        "KxDgvEKzgSBPPfuVfw67oPQBSjidEiqTHURKSDL1R7yGaGYAeYnr",
        "6PYM7jHL4GmS8Aw2iEFpuaHTCUKjhT4mwVqdoozGU6sUE25BjV4ePXDdLz",
    )
}

#[test]
fn test_render_all_codes() {
    let sheet = KeyQrSheet::render(&material(), &TaggingEncoder).unwrap();

    assert_eq!(
        sheet.image(QrKind::Public).unwrap(),
        b"qr:NZNovmGd2YMHaB3XGR3sB2vuGBeAJFmyut"
    );
    assert!(sheet.image(QrKind::Private).unwrap().starts_with(b"qr:Kx"));
    assert!(sheet.image(QrKind::Encrypted).unwrap().starts_with(b"qr:6PY"));
    for kind in QrKind::ALL {
        assert!(!sheet.is_copied(kind));
    }
}

#[test]
fn test_render_rejects_missing_key() {
    let material = KeyMaterial::new("NZNovmGd2YMHaB3XGR3sB2vuGBeAJFmyut", "", "6PY");
    assert_eq!(
        KeyQrSheet::render(&material, &TaggingEncoder).unwrap_err(),
        QrError::EmptyContent(QrKind::Private)
    );
}

#[test]
fn test_render_propagates_encoder_error() {
    assert!(matches!(
        KeyQrSheet::render(&material(), &FailingEncoder),
        Err(QrError::Encoding(_))
    ));
}

#[test]
fn test_debug_redacts_secrets() {
    let debug = format!("{:?}", material());
    assert!(debug.contains("NZNovmGd2YMHaB3XGR3sB2vuGBeAJFmyut"));
    assert!(!debug.contains("KxDgvEKz"));
    assert!(!debug.contains("6PYM7jHL"));
}

#[tokio::test]
async fn test_copy_marks_only_latest_code() {
    let mut sheet = KeyQrSheet::render(&material(), &TaggingEncoder).unwrap();
    let clipboard = FakeClipboard::default();

    sheet.copy(QrKind::Private, &clipboard).await.unwrap();
    assert!(sheet.is_copied(QrKind::Private));
    assert!(!sheet.is_copied(QrKind::Public));

    sheet.copy(QrKind::Public, &clipboard).await.unwrap();
    assert!(sheet.is_copied(QrKind::Public));
    assert!(!sheet.is_copied(QrKind::Private));

    let copies = clipboard.copies.lock();
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].1, "private-key");
    assert_eq!(copies[1].1, "public-address");
    assert_eq!(copies[1].0, b"qr:NZNovmGd2YMHaB3XGR3sB2vuGBeAJFmyut".to_vec());
}

#[tokio::test]
async fn test_failed_copy_is_not_marked() {
    let mut sheet = KeyQrSheet::render(&material(), &TaggingEncoder).unwrap();
    let clipboard = FakeClipboard {
        fail: true,
        ..FakeClipboard::default()
    };

    let err = sheet.copy(QrKind::Encrypted, &clipboard).await.unwrap_err();
    assert!(matches!(err, QrError::Clipboard(_)));
    assert!(!sheet.is_copied(QrKind::Encrypted));
}

#[tokio::test]
async fn test_reset_copied() {
    let mut sheet = KeyQrSheet::render(&material(), &TaggingEncoder).unwrap();
    sheet.copy(QrKind::Encrypted, &FakeClipboard::default()).await.unwrap();
    sheet.reset_copied();
    assert!(!sheet.is_copied(QrKind::Encrypted));
}

#[test]
fn test_image_names() {
    assert_eq!(QrKind::Private.image_name(), "private-key");
    assert_eq!(QrKind::Encrypted.image_name(), "encrypted-key");
    assert_eq!(QrKind::Public.image_name(), "public-address");
}
