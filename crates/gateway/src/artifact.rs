//! The generation result payload.

/// A generator's output: encoded PNG bytes.
///
/// Every artifact is well-formed regardless of whether the underlying
/// generation succeeded -- failures are represented by placeholder
/// artifacts, not by absent ones.
#[derive(Debug, Clone)]
pub struct Artifact {
    png: Vec<u8>,
}

impl Artifact {
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png_bytes(self) -> Vec<u8> {
        self.png
    }
}
