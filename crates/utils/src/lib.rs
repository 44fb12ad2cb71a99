pub mod image_url;
pub mod logging;
pub mod response;
