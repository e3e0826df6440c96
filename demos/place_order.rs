//! End-to-end run: log in, fill the cart, redeem a voucher, place an order
//! and write the payslip.
//!
//! Requires `SUNSHINE_EMAIL` and `SUNSHINE_PASSWORD`, plus optionally
//! `SUNSHINE_API_URL`, `SUNSHINE_PRODUCT_ID` and `SUNSHINE_VOUCHER`.
//!
//! Run: `cargo run --example place_order --features cli`

use core::num::NonZeroU32;
use std::process::ExitCode;

use sunshine_shop::checkout::Checkout;
use sunshine_shop::models::{CartLine, PaymentMethod, ProductId, ShippingInfo};
use sunshine_shop::pricing::format_amount;
use sunshine_shop::receipt::{PAYSLIP_FILE_NAME, Receipt};
use sunshine_shop::session::InMemoryTokenStore;
use sunshine_shop::shop::ShopBlocking;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _dotenv = dotenvy::dotenv();

    let email = std::env::var("SUNSHINE_EMAIL").map_err(|_| "SUNSHINE_EMAIL not set")?;
    let password = std::env::var("SUNSHINE_PASSWORD").map_err(|_| "SUNSHINE_PASSWORD not set")?;
    let product = std::env::var("SUNSHINE_PRODUCT_ID").unwrap_or_else(|_| "demo-shirt".to_owned());

    let mut builder = ShopBlocking::builder().token_store(InMemoryTokenStore::new());
    if let Ok(url) = std::env::var("SUNSHINE_API_URL") {
        builder = builder.base_url(url);
    }
    let shop = builder.build()?;

    shop.login(&email, &password)?;
    println!("Logged in, cart has {} line(s)", shop.cart().len());

    shop.add_to_cart(&CartLine {
        product_id: ProductId::new(product),
        name: "Demo shirt".to_owned(),
        image: String::new(),
        price: 40.0,
        size: "M".to_owned(),
        quantity: NonZeroU32::new(2).ok_or("zero quantity")?,
    })?;

    let shipping = ShippingInfo {
        first_name: "Rahim".to_owned(),
        last_name: "Uddin".to_owned(),
        email,
        phone: "01700000000".to_owned(),
        address: "House 12".to_owned(),
        street: "Road 5".to_owned(),
        city: "Dhaka".to_owned(),
        district: "Dhaka".to_owned(),
        postal_code: "1207".to_owned(),
    };
    let mut checkout = Checkout::new(shipping, PaymentMethod::MobileBanking);

    if let Ok(code) = std::env::var("SUNSHINE_VOUCHER") {
        match shop.apply_voucher(&mut checkout, &code) {
            Ok(discount) => println!("Voucher applied: {} off", format_amount(discount)),
            Err(err) => println!("Voucher rejected: {}", err.user_message("redeem failed")),
        }
    }

    let pricing = shop.pricing(&checkout);
    println!(
        "Subtotal {}  Delivery {}  Discount {}  Total {}",
        format_amount(pricing.subtotal),
        format_amount(pricing.delivery_charge),
        format_amount(pricing.discount_amount),
        format_amount(pricing.total),
    );

    let id = shop.place_order(&mut checkout)?;
    println!("Order placed: {id}");

    let today = chrono::Local::now().date_naive();
    if let Some(receipt) = Receipt::from_checkout(&checkout, today) {
        receipt.save(PAYSLIP_FILE_NAME)?;
        println!("Payslip written to {PAYSLIP_FILE_NAME}");
    }
    Ok(())
}
