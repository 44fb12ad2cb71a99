use std::{env, fs, path::PathBuf};

use server::routes::{
    orders::{CreateOrderRequest, CreatedOrder},
    subscriptions::{CreateSubscriptionRequest, CreatedSubscription},
};
use services::services::{
    album::{AlbumPage, AlbumQuery},
    http_client::BackendResponse,
    image::{GenerationRequest, GenerationStatus, GenerationTask, TaskStatus, UploadedImage},
    payment::{CreditPurchase, Plan, PurchaseReceipt, SubscriptionPurchase},
    paypal::PaypalToken,
    paypal_checkout::{ClientToken, Link, Money, Order, OrderCapture, PurchaseUnit, Subscription},
};
use stores::models::{
    album_image::AlbumImage,
    alert::{AlertKind, AlertOptions, AlertState},
    model_option::{ModelOption, ModelOptions},
};
use ts_rs::TS;
use utils::response::ApiResponse;

fn generate_types_content() -> String {
    let decls = [
        ApiResponse::<()>::decl(),
        BackendResponse::<()>::decl(),
        AlbumImage::decl(),
        AlertKind::decl(),
        AlertOptions::decl(),
        AlertState::decl(),
        ModelOption::decl(),
        ModelOptions::decl(),
        AlbumQuery::decl(),
        AlbumPage::decl(),
        GenerationRequest::decl(),
        GenerationStatus::decl(),
        GenerationTask::decl(),
        TaskStatus::decl(),
        UploadedImage::decl(),
        SubscriptionPurchase::decl(),
        CreditPurchase::decl(),
        PurchaseReceipt::decl(),
        Plan::decl(),
        PaypalToken::decl(),
        Money::decl(),
        PurchaseUnit::decl(),
        Link::decl(),
        Order::decl(),
        OrderCapture::decl(),
        Subscription::decl(),
        ClientToken::decl(),
        CreateOrderRequest::decl(),
        CreatedOrder::decl(),
        CreateSubscriptionRequest::decl(),
        CreatedSubscription::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|decl| format!("export {}", decl.trim_start_matches("export ")))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "// This file was generated by `cargo run --bin generate_types`. Do not edit it by hand.\n\n{body}\n"
    )
}

fn main() {
    let out: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("failed to create {}: {e}", parent.display());
            std::process::exit(1);
        }
    }
    if let Err(e) = fs::write(&out, generate_types_content()) {
        eprintln!("failed to write {}: {e}", out.display());
        std::process::exit(1);
    }
    println!("wrote {}", out.display());
}
