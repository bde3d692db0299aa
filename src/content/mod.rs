//! Content payloads and the write-side rules shared by the admin form and the
//! browser extension.

pub mod capture;
pub mod data;
pub mod draft;
pub mod video;

pub use capture::{Capture, CaptureSubmission, CapturedPage};
pub use data::{ContentData, ImageData, LinkData, QuoteData, TextData, VideoData};
pub use draft::{ContentDraft, NewContent, ValidationError};
