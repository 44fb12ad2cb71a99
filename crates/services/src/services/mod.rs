pub mod album;
pub mod config;
pub mod delete_image;
pub mod generation;
pub mod http_client;
pub mod image;
pub mod model_options;
pub mod payment;
pub mod paypal;
pub mod paypal_checkout;

#[cfg(test)]
pub(crate) mod test_support;
