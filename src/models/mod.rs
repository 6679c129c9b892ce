//! Data models mirrored from the backend REST API.

pub mod auth;
pub mod checkout;
pub mod coupon;
pub mod employee;
pub mod order;
pub mod permission;
pub mod product;
pub mod role;
pub mod stock;
pub mod timestamp;
pub mod vacation;

pub use auth::{LoginRequest, PasswordUpdate, SignupRequest};
pub use checkout::{CheckoutProduct, CheckoutSession};
pub use coupon::{Coupon, CouponDuration, NewCoupon};
pub use employee::Employee;
pub use order::Order;
pub use permission::AccessRights;
pub use product::{BestSellingProduct, PriceHistory, Product};
pub use role::Role;
pub use stock::Stock;
pub use vacation::{VacationRequest, VacationStatus};
