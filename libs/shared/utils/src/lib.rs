pub mod extractor;
pub mod jwt;
pub mod patch;
pub mod test_utils;
