mod azure;
mod clarifai;
mod google;

pub use {azure::AzureVision, clarifai::ClarifaiVision, google::GoogleVision};
