//! Mod portal client
//!
//! Publishes release archives and replaces the gallery images of a mod
//! through the portal's two-step upload API: an authenticated `init` call
//! hands out a one-time upload URL, which then receives the file as a
//! multipart form.

pub mod client;
pub mod error;

pub use client::{api_key_from_env, ModPortal, DEFAULT_IMAGES_URL, DEFAULT_UPLOAD_URL};
pub use error::{PortalError, Result};
