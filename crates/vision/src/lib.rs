//! Vision provider adapters: image bytes in, normalized labels out.
//!
//! Three interchangeable services sit behind [`VisionProvider`]:
//! - `google`: Google Cloud Vision (labels, OCR, dominant colors, objects)
//! - `clarifai`: Clarifai general concept model (labels only)
//! - `azure`: Azure Computer Vision, credential is `endpoint|key`

pub mod error;
pub mod providers;
pub mod registry;
pub mod types;

pub use {
    error::VisionError,
    providers::{AzureVision, ClarifaiVision, GoogleVision},
    registry::ProviderRegistry,
    types::{AnalyzeRequest, Label, VisionOutput, VisionProvider},
};
