//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod coupon_panel;
pub mod dashboard;
pub mod employee_panel;
pub mod finance_panel;
pub mod kassa_panel;
pub mod login_panel;
pub mod product_panel;
pub mod role_panel;
pub mod settings_panel;
pub mod setup_wizard;
pub mod vacation_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
