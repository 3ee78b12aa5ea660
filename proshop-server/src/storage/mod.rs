//! Object storage (Cloudflare R2 over the S3 PUT protocol)

pub mod r2;
pub mod sigv4;

pub use r2::{ObjectStore, R2Credentials, StorageError, product_image_key};
