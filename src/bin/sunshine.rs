//! CLI binary for shopping at the Sunshine storefront.

use core::num::NonZeroU32;
use std::io::{self, BufRead as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use sunshine_shop::checkout::Checkout;
use sunshine_shop::error::ShopError;
use sunshine_shop::models::{
    CartLine, MembershipStatus, Order, OrderId, PaymentMethod, ProductId, ShippingInfo,
    UserVoucher, Voucher, VoucherId,
};
use sunshine_shop::notification::{Notification, NotificationKind};
use sunshine_shop::pricing::{PricingSnapshot, format_amount};
use sunshine_shop::receipt::{PAYSLIP_FILE_NAME, Receipt};
use sunshine_shop::session::{FileTokenStore, TokenStore};
use sunshine_shop::shop::ShopBlocking;

/// Environment variable naming the API base URL.
const API_URL_ENV: &str = "SUNSHINE_API_URL";

/// Environment variable holding the login password.
const PASSWORD_ENV: &str = "SUNSHINE_PASSWORD";

/// Sunshine storefront CLI: cart, vouchers, checkout and payslips.
#[derive(Debug, Parser)]
#[command(name = "sunshine", version, about)]
struct Cli {
    /// API base URL (default: $SUNSHINE_API_URL or http://localhost:5000).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Override the session directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and remember the session.
    Login {
        /// Account email.
        email: String,
        /// Password (default: $SUNSHINE_PASSWORD, otherwise prompted).
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the cart.
    Cart,
    /// Add a product to the cart.
    Add(AddArgs),
    /// Set the quantity of a cart line.
    SetQuantity {
        /// Product identifier.
        product_id: String,
        /// Size variant.
        size: String,
        /// New quantity (at least 1).
        quantity: NonZeroU32,
    },
    /// Remove a line from the cart.
    Remove {
        /// Product identifier.
        product_id: String,
        /// Size variant.
        size: String,
    },
    /// List vouchers on offer and the ones you own.
    Vouchers {
        /// Show owned voucher codes instead of masking them.
        #[arg(long)]
        reveal: bool,
    },
    /// Buy a voucher with loyalty points.
    BuyVoucher {
        /// Voucher identifier.
        voucher_id: String,
    },
    /// Show loyalty membership status and points.
    Membership,
    /// Place an order for the current cart.
    Checkout(CheckoutArgs),
    /// Show a placed order.
    Order {
        /// Order identifier.
        id: String,
        /// Also write the payslip PDF (default file: payslip.pdf).
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = PAYSLIP_FILE_NAME)]
        payslip: Option<PathBuf>,
    },
}

/// Arguments for the `add` subcommand.
#[derive(Debug, Args)]
struct AddArgs {
    /// Product identifier.
    product_id: String,
    /// Size variant, e.g. M or XL.
    #[arg(long)]
    size: String,
    /// Product name shown in the cart.
    #[arg(long)]
    name: String,
    /// Unit price.
    #[arg(long)]
    price: f64,
    /// Number of units.
    #[arg(long, default_value = "1")]
    quantity: NonZeroU32,
    /// Image URL.
    #[arg(long, default_value = "")]
    image: String,
}

impl AddArgs {
    /// Builds the cart line to send.
    fn to_line(&self) -> CartLine {
        CartLine {
            product_id: ProductId::from(self.product_id.as_str()),
            name: self.name.clone(),
            image: self.image.clone(),
            price: self.price,
            size: self.size.clone(),
            quantity: self.quantity,
        }
    }
}

/// Payment method choices on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PaymentArg {
    /// Cash on delivery.
    Cash,
    /// Mobile banking.
    Mobile,
    /// Internet banking or card.
    Internet,
}

impl From<PaymentArg> for PaymentMethod {
    #[inline]
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Cash => Self::CashOnDelivery,
            PaymentArg::Mobile => Self::MobileBanking,
            PaymentArg::Internet => Self::InternetBanking,
        }
    }
}

/// Arguments for the `checkout` subcommand.
#[derive(Debug, Args)]
struct CheckoutArgs {
    /// First name.
    #[arg(long)]
    first_name: String,
    /// Last name.
    #[arg(long)]
    last_name: String,
    /// Contact email.
    #[arg(long)]
    email: String,
    /// Contact phone.
    #[arg(long)]
    phone: String,
    /// House or flat.
    #[arg(long)]
    address: String,
    /// Street.
    #[arg(long)]
    street: String,
    /// City; decides the delivery charge.
    #[arg(long)]
    city: String,
    /// District.
    #[arg(long)]
    district: String,
    /// Postal code.
    #[arg(long)]
    postal_code: String,
    /// Payment method.
    #[arg(long, value_enum, default_value_t = PaymentArg::Cash)]
    payment: PaymentArg,
    /// Voucher code to redeem for a discount.
    #[arg(long)]
    voucher: Option<String>,
    /// Also write the payslip PDF (default file: payslip.pdf).
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = PAYSLIP_FILE_NAME)]
    payslip: Option<PathBuf>,
}

impl CheckoutArgs {
    /// Collects the shipping form.
    fn shipping(&self) -> ShippingInfo {
        ShippingInfo {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

/// Picks the API base URL: the flag first, then `lookup(API_URL_ENV)`.
fn resolve_api_url<F>(flag: Option<String>, lookup: F) -> Option<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    flag.or_else(|| lookup(API_URL_ENV))
        .filter(|url| !url.trim().is_empty())
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let api_url = resolve_api_url(cli.api_url, |key| std::env::var(key).ok());

    let store = match create_token_store(cli.data_dir) {
        Ok(store) => store,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to open session storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let shop = match build_shop(api_url, store) {
        Ok(shop) => shop,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&shop, cli.command)
}

/// Creates the token store, using `data_dir` if provided or the default
/// XDG data directory otherwise.
fn create_token_store(data_dir: Option<PathBuf>) -> sunshine_shop::error::Result<FileTokenStore> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileTokenStore::default_dir()?,
    };
    FileTokenStore::new(dir)
}

/// Builds the shop over `store`, pointing it at `api_url` when given.
fn build_shop<T: TokenStore>(
    api_url: Option<String>,
    store: T,
) -> sunshine_shop::error::Result<ShopBlocking<T>> {
    let mut builder = ShopBlocking::builder().token_store(store);
    if let Some(url) = api_url {
        builder = builder.base_url(url);
    }
    builder.build()
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<T: TokenStore>(shop: &ShopBlocking<T>, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Login { email, password } => cmd_login(shop, &email, password),
        Command::Logout => cmd_logout(shop),
        Command::Cart => cmd_cart(shop),
        Command::Add(args) => cmd_add(shop, &args),
        Command::SetQuantity {
            product_id,
            size,
            quantity,
        } => cmd_set_quantity(shop, &ProductId::from(product_id), &size, quantity),
        Command::Remove { product_id, size } => {
            cmd_remove(shop, &ProductId::from(product_id), &size)
        }
        Command::Vouchers { reveal } => cmd_vouchers(shop, reveal),
        Command::BuyVoucher { voucher_id } => cmd_buy_voucher(shop, &VoucherId::from(voucher_id)),
        Command::Membership => cmd_membership(shop),
        Command::Checkout(args) => cmd_checkout(shop, &args),
        Command::Order { id, payslip } => cmd_order(shop, &OrderId::from(id), payslip.as_deref()),
    }
}

/// Prints a notification, errors and warnings to stderr.
fn print_notification(note: &Notification) -> io::Result<()> {
    match note.kind {
        NotificationKind::Success => {
            writeln!(io::stdout().lock(), "{} {note}", "ok:".green().bold())
        }
        NotificationKind::Info => writeln!(io::stdout().lock(), "{} {note}", "info:".cyan().bold()),
        NotificationKind::Warning => {
            writeln!(io::stderr().lock(), "{} {note}", "warning:".yellow().bold())
        }
        NotificationKind::Error => writeln!(io::stderr().lock(), "{} {note}", "error:".red().bold()),
    }
}

/// Reports a failed operation and returns the failure exit code.
fn fail(err: &ShopError, fallback: &str) -> io::Result<ExitCode> {
    print_notification(&Notification::from_error(err, fallback))?;
    if err.is_auth() {
        writeln!(
            io::stderr().lock(),
            "  {} run `sunshine login <email>` first",
            "hint:".cyan()
        )?;
    }
    Ok(ExitCode::FAILURE)
}

/// Reads a password line from stdin.
fn prompt_password() -> io::Result<String> {
    write!(io::stderr().lock(), "Password: ")?;
    io::stderr().flush()?;
    let mut line = String::new();
    _ = io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Executes the `login` subcommand.
fn cmd_login<T: TokenStore>(
    shop: &ShopBlocking<T>,
    email: &str,
    password: Option<String>,
) -> io::Result<ExitCode> {
    let password = match password.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        Some(password) => password,
        None => prompt_password()?,
    };

    let spinner = make_spinner("Logging in...");
    let result = shop.login(email, &password);
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            print_notification(&Notification::success("Logged in."))?;
            print_cart_table(&shop.cart_lines())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Login failed."),
    }
}

/// Executes the `logout` subcommand.
fn cmd_logout<T: TokenStore>(shop: &ShopBlocking<T>) -> io::Result<ExitCode> {
    match shop.logout() {
        Ok(()) => {
            print_notification(&Notification::success("Logged out."))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Logout failed."),
    }
}

/// Executes the `cart` subcommand.
fn cmd_cart<T: TokenStore>(shop: &ShopBlocking<T>) -> io::Result<ExitCode> {
    match shop.fetch_cart() {
        Ok(()) => {
            print_cart_table(&shop.cart_lines())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to load cart."),
    }
}

/// Executes the `add` subcommand.
fn cmd_add<T: TokenStore>(shop: &ShopBlocking<T>, args: &AddArgs) -> io::Result<ExitCode> {
    match shop.add_to_cart(&args.to_line()) {
        Ok(()) => {
            print_notification(&Notification::success("Added to cart."))?;
            print_cart_table(&shop.cart_lines())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to add to cart."),
    }
}

/// Executes the `set-quantity` subcommand.
fn cmd_set_quantity<T: TokenStore>(
    shop: &ShopBlocking<T>,
    product_id: &ProductId,
    size: &str,
    quantity: NonZeroU32,
) -> io::Result<ExitCode> {
    match shop.update_quantity(product_id, size, quantity) {
        Ok(()) => {
            print_cart_table(&shop.cart_lines())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to update quantity."),
    }
}

/// Executes the `remove` subcommand.
fn cmd_remove<T: TokenStore>(
    shop: &ShopBlocking<T>,
    product_id: &ProductId,
    size: &str,
) -> io::Result<ExitCode> {
    match shop.remove_from_cart(product_id, size) {
        Ok(()) => {
            print_notification(&Notification::success("Removed from cart."))?;
            print_cart_table(&shop.cart_lines())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to remove from cart."),
    }
}

/// Executes the `vouchers` subcommand.
fn cmd_vouchers<T: TokenStore>(shop: &ShopBlocking<T>, reveal: bool) -> io::Result<ExitCode> {
    let available = match shop.available_vouchers() {
        Ok(vouchers) => vouchers,
        Err(err) => return fail(&err, "Failed to load vouchers."),
    };
    let owned = match shop.my_vouchers() {
        Ok(vouchers) => vouchers,
        Err(err) => return fail(&err, "Failed to load your vouchers."),
    };
    print_vouchers_table(&available)?;
    print_owned_vouchers_table(&owned, reveal)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `buy-voucher` subcommand.
fn cmd_buy_voucher<T: TokenStore>(
    shop: &ShopBlocking<T>,
    voucher_id: &VoucherId,
) -> io::Result<ExitCode> {
    match shop.purchase_voucher(voucher_id) {
        Ok(purchase) => {
            let message = purchase
                .message
                .unwrap_or_else(|| "Voucher purchased.".to_owned());
            print_notification(&Notification::success(message))?;
            match purchase.owned {
                Some(owned) => print_owned_vouchers_table(&owned, false)?,
                None => print_notification(&Notification::new(
                    NotificationKind::Warning,
                    "Failed to fetch vouchers.",
                ))?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to purchase voucher."),
    }
}

/// Executes the `membership` subcommand.
fn cmd_membership<T: TokenStore>(shop: &ShopBlocking<T>) -> io::Result<ExitCode> {
    match shop.membership_status() {
        Ok(status) => {
            print_membership(&status)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to load membership status."),
    }
}

/// Executes the `checkout` subcommand: redeems the voucher, shows the
/// pricing and places the order.
fn cmd_checkout<T: TokenStore>(shop: &ShopBlocking<T>, args: &CheckoutArgs) -> io::Result<ExitCode> {
    let mut checkout = Checkout::new(args.shipping(), args.payment.into());
    if let Err(err) = checkout.validate() {
        return fail(&err, "Invalid shipping details.");
    }
    if let Err(err) = shop.fetch_cart() {
        return fail(&err, "Failed to load cart.");
    }

    if let Some(code) = args.voucher.as_deref() {
        match shop.apply_voucher(&mut checkout, code) {
            Ok(discount) => print_notification(&Notification::success(format!(
                "Voucher applied: {} off.",
                format_amount(discount)
            )))?,
            Err(err) => return fail(&err, "Failed to redeem voucher."),
        }
    }

    print_cart_table(&shop.cart_lines())?;
    print_pricing(&shop.pricing(&checkout))?;

    let spinner = make_spinner("Placing order...");
    let result = shop.place_order(&mut checkout);
    spinner.finish_and_clear();

    match result {
        Ok(id) => {
            print_notification(&Notification::success(format!(
                "Your order has been received! Order {id}"
            )))?;
            match args.payslip.as_deref() {
                Some(path) => write_payslip(Receipt::from_checkout(&checkout, today()), path),
                None => Ok(ExitCode::SUCCESS),
            }
        }
        Err(err) => fail(&err, "Failed to place order."),
    }
}

/// Executes the `order` subcommand.
fn cmd_order<T: TokenStore>(
    shop: &ShopBlocking<T>,
    id: &OrderId,
    payslip: Option<&Path>,
) -> io::Result<ExitCode> {
    match shop.order(id) {
        Ok(order) => {
            print_order(&order)?;
            match payslip {
                Some(path) => write_payslip(Some(Receipt::from_order(&order, today())), path),
                None => Ok(ExitCode::SUCCESS),
            }
        }
        Err(err) => fail(&err, "Failed to load order."),
    }
}

/// Writes the payslip PDF, warning when the order details are missing.
fn write_payslip(receipt: Option<Receipt>, path: &Path) -> io::Result<ExitCode> {
    let Some(receipt) = receipt else {
        print_notification(&Notification::new(
            NotificationKind::Warning,
            "Order details are unavailable; payslip not written.",
        ))?;
        return Ok(ExitCode::SUCCESS);
    };
    match receipt.save(path) {
        Ok(()) => {
            print_notification(&Notification::success(format!(
                "Payslip saved to {}",
                path.display()
            )))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, "Failed to write payslip."),
    }
}

/// Today's date in local time.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Creates a right-aligned cell.
fn amount_cell(amount: f64) -> Cell {
    Cell::new(format_amount(amount)).set_alignment(CellAlignment::Right)
}

/// Prints cart lines in a table.
fn print_cart_table(lines: &[CartLine]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if lines.is_empty() {
        writeln!(out, "{}", "Your cart is empty.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Product").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Size").fg(Color::Cyan),
        Cell::new("Qty").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
        Cell::new("Total").fg(Color::Cyan),
    ]);

    for line in lines {
        _ = table.add_row(vec![
            Cell::new(&line.product_id),
            Cell::new(&line.name),
            Cell::new(&line.size),
            Cell::new(line.quantity).set_alignment(CellAlignment::Right),
            amount_cell(line.price),
            amount_cell(line.line_total()),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Cart".green().bold(),
        format_args!("({})", lines.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the pricing summary.
fn print_pricing(pricing: &PricingSnapshot) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "  {:<10} {}", "Subtotal", format_amount(pricing.subtotal))?;
    writeln!(
        out,
        "  {:<10} {}",
        "Delivery",
        format_amount(pricing.delivery_charge)
    )?;
    if pricing.discount_amount > 0.0 {
        writeln!(
            out,
            "  {:<10} -{}",
            "Discount",
            format_amount(pricing.discount_amount)
        )?;
    }
    writeln!(
        out,
        "  {:<10} {}",
        "Total".bold(),
        format_amount(pricing.total).bold()
    )?;
    Ok(())
}

/// Prints vouchers on offer in a table.
fn print_vouchers_table(vouchers: &[Voucher]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if vouchers.is_empty() {
        writeln!(out, "{}", "No vouchers on offer.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Voucher").fg(Color::Cyan),
        Cell::new("Discount").fg(Color::Cyan),
        Cell::new("Points").fg(Color::Cyan),
    ]);

    for voucher in vouchers.iter().filter(|voucher| voucher.is_active) {
        _ = table.add_row(vec![
            Cell::new(&voucher.id),
            amount_cell(voucher.discount_amount),
            Cell::new(voucher.points_cost).set_alignment(CellAlignment::Right),
        ]);
    }

    writeln!(out, "{}", "Vouchers on offer".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints owned vouchers in a table, masking codes unless `reveal`.
fn print_owned_vouchers_table(vouchers: &[UserVoucher], reveal: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if vouchers.is_empty() {
        writeln!(out, "{}", "You have no vouchers.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Code").fg(Color::Cyan),
        Cell::new("Discount").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);

    for voucher in vouchers {
        let code = if reveal {
            voucher.code.clone()
        } else {
            voucher.masked_code()
        };
        let discount = voucher
            .discount_amount()
            .map_or_else(|| Cell::new("\u{2014}"), amount_cell);
        let status = if voucher.is_redeemed {
            Cell::new("Redeemed").fg(Color::DarkGrey)
        } else {
            Cell::new("Available").fg(Color::Green)
        };
        _ = table.add_row(vec![Cell::new(code), discount, status]);
    }

    writeln!(
        out,
        "{} {}",
        "My vouchers".green().bold(),
        format_args!("({})", vouchers.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints membership status and balance.
fn print_membership(status: &MembershipStatus) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{} {}", "Membership:".bold(), status.status)?;
    if let Some(name) = status.name.as_deref() {
        writeln!(out, "  {} {name}", "Name:".bold())?;
    }
    if status.is_member() {
        writeln!(
            out,
            "  {} {}",
            "Points:".bold(),
            status.points.unwrap_or_default()
        )?;
    }
    Ok(())
}

/// Prints an order with its lines and charges.
fn print_order(order: &Order) -> io::Result<()> {
    {
        let mut out = io::stdout().lock();
        writeln!(out, "{} {}", "Order".green().bold(), order.id)?;
        if let Some(customer) = order.customer_profile() {
            writeln!(out, "  {} {} <{}>", "Customer:".bold(), customer.name, customer.email)?;
        }
        writeln!(out, "  {} {}", "Ship to:".bold(), order.shipping_address)?;
        if let Some(method) = order.payment_method {
            writeln!(out, "  {} {method}", "Payment:".bold())?;
        }
        writeln!(out)?;
    }
    print_cart_table(&order.items)?;
    print_pricing(&PricingSnapshot {
        subtotal: order.items_subtotal(),
        delivery_charge: order.shipping_price,
        discount_amount: order.discount_amount,
        total: order.total_amount,
    })
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
