//! Menu adapters.

mod static_menu;

pub use static_menu::StaticMenuValidator;
