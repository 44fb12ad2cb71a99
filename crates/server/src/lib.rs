use std::sync::Arc;

use services::services::paypal_checkout::PaypalClient;

pub mod config;
pub mod error;
pub mod routes;

use config::CheckoutSettings;

#[derive(Clone)]
pub struct AppState {
    paypal: PaypalClient,
    checkout: Arc<CheckoutSettings>,
}

impl AppState {
    pub fn new(paypal: PaypalClient, checkout: CheckoutSettings) -> Self {
        Self {
            paypal,
            checkout: Arc::new(checkout),
        }
    }

    pub fn paypal(&self) -> &PaypalClient {
        &self.paypal
    }

    pub fn checkout(&self) -> &CheckoutSettings {
        &self.checkout
    }
}
