//! Shared UI crate for Feedback Radar: radar charts, exports, batch runs and
//! the Dioxus views both platforms mount.

pub mod batch;
pub mod core;
pub mod export;
pub mod i18n;
pub mod radar;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
