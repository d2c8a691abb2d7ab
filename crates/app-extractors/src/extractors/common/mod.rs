pub mod extracted_media;
pub mod extraction_error;
pub mod extraction_result;
pub mod media_link;
