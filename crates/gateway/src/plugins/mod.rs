//! Bundled generator plugins.

pub mod remote_faceswap;

pub use remote_faceswap::RemoteFaceSwap;
