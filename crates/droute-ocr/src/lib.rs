//! Text recognition client for DashRoute.
//!
//! The recognition engine is an external capability: given an image and a
//! language/accuracy configuration it returns ranked text candidates. This
//! crate defines that seam ([`TextRecognizer`]) and ships a Tesseract CLI
//! implementation.

pub mod error;
pub mod recognizer;
pub mod tesseract;

pub use error::{OcrError, OcrResult};
pub use recognizer::{RecognitionAccuracy, RecognitionConfig, TextCandidate, TextRecognizer};
pub use tesseract::TesseractRecognizer;
