//! QR codes of an account's key material.
//!
//! The wallet shows the private key (WIF), the NEP-2 encrypted key and the
//! public address as QR images that can be copied to the clipboard one at a
//! time. Encoding and clipboard access are external.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrError {
    #[error("Nothing to encode for the {0} code")]
    EmptyContent(QrKind),

    #[error("QR encoding failed: {0}")]
    Encoding(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("No {0} code has been rendered")]
    NotRendered(QrKind),
}

/// Which key a code encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QrKind {
    Private,
    Encrypted,
    Public,
}

impl QrKind {
    pub const ALL: [QrKind; 3] = [QrKind::Private, QrKind::Encrypted, QrKind::Public];

    /// Name given to the copied image
    pub fn image_name(&self) -> &'static str {
        match self {
            QrKind::Private => "private-key",
            QrKind::Encrypted => "encrypted-key",
            QrKind::Public => "public-address",
        }
    }
}

impl fmt::Display for QrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrKind::Private => write!(f, "private key"),
            QrKind::Encrypted => write!(f, "encrypted key"),
            QrKind::Public => write!(f, "public key"),
        }
    }
}

/// Key material of one account. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    pub address: String,
    pub wif: String,
    pub encrypted_wif: String,
}

impl KeyMaterial {
    pub fn new(
        address: impl Into<String>,
        wif: impl Into<String>,
        encrypted_wif: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            wif: wif.into(),
            encrypted_wif: encrypted_wif.into(),
        }
    }

    fn content(&self, kind: QrKind) -> &str {
        match kind {
            QrKind::Private => &self.wif,
            QrKind::Encrypted => &self.encrypted_wif,
            QrKind::Public => &self.address,
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("address", &self.address)
            .field("wif", &"<redacted>")
            .field("encrypted_wif", &"<redacted>")
            .finish()
    }
}

/// Turns text into image bytes
pub trait QrEncoder: Send + Sync {
    fn encode(&self, content: &str) -> Result<Vec<u8>, QrError>;
}

/// Places an image on the system clipboard
#[async_trait]
pub trait ImageClipboard: Send + Sync {
    async fn copy_image(&self, image: &[u8], name: &str) -> Result<(), QrError>;
}

/// The three rendered codes plus which one was copied last
#[derive(Debug, Default)]
pub struct KeyQrSheet {
    images: BTreeMap<QrKind, Vec<u8>>,
    last_copied: Option<QrKind>,
    copied: bool,
}

impl KeyQrSheet {
    /// Renders every code of `material`
    pub fn render(material: &KeyMaterial, encoder: &dyn QrEncoder) -> Result<Self, QrError> {
        let mut images = BTreeMap::new();
        for kind in QrKind::ALL {
            let content = material.content(kind);
            if content.trim().is_empty() {
                return Err(QrError::EmptyContent(kind));
            }
            images.insert(kind, encoder.encode(content)?);
        }
        debug!("Rendered key QR codes for {}", material.address);
        Ok(Self {
            images,
            last_copied: None,
            copied: false,
        })
    }

    pub fn image(&self, kind: QrKind) -> Option<&[u8]> {
        self.images.get(&kind).map(Vec::as_slice)
    }

    /// Copies one code to the clipboard
    pub async fn copy(&mut self, kind: QrKind, clipboard: &dyn ImageClipboard) -> Result<(), QrError> {
        let image = self.images.get(&kind).ok_or(QrError::NotRendered(kind))?;
        self.last_copied = Some(kind);
        self.copied = false;
        match clipboard.copy_image(image, kind.image_name()).await {
            Ok(()) => {
                self.copied = true;
                Ok(())
            }
            Err(err) => {
                warn!("Failed to copy {} code: {}", kind, err);
                Err(err)
            }
        }
    }

    /// True only for the most recently copied code, and only if that copy succeeded
    pub fn is_copied(&self, kind: QrKind) -> bool {
        self.copied && self.last_copied == Some(kind)
    }

    /// Clears the copied marker
    pub fn reset_copied(&mut self) {
        self.copied = false;
    }
}
