//! Data models for the Sunshine storefront API.
//!
//! Wire types for carts, vouchers, orders, login and membership, newtype
//! ID wrappers, and enumeration types for constrained values. JSON field
//! names are camelCase and Mongo `_id` keys map to `id`.

mod auth;
mod cart;
mod enums;
mod ids;
mod membership;
mod order;
mod voucher;

pub use auth::{LoginRequest, LoginResponse};
pub use cart::{CartLine, CartResponse, UpdateQuantityRequest};
pub use enums::{MembershipState, PaymentMethod};
pub use ids::{OrderId, ProductId, UserId, UserVoucherId, VoucherId};
pub use membership::MembershipStatus;
pub use order::{
    CreateOrderRequest, CreateOrderResponse, CreatedOrder, Customer, Order, OrderCustomer,
    OrderResponse, ShippingInfo,
};
pub use voucher::{
    MessageResponse, MyVoucherListResponse, PurchaseVoucherRequest, RedeemVoucherRequest,
    RedeemVoucherResponse, UserVoucher, Voucher, VoucherListResponse, VoucherPurchase,
};
