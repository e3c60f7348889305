//! Upload adapters

mod http;

pub use http::{HttpUploadClient, REQUEST_ID_HEADER};
