pub mod album_image;
pub mod alert;
pub mod dialog;
pub mod model_option;
