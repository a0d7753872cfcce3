pub mod extractor_utils;
pub mod request_utils;
