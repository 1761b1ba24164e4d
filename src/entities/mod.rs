pub mod menu_category;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod restaurant_settings;
pub mod restaurant_table;

pub use order::OrderStatus;
pub use payment::{PaymentMethod, PaymentStatus};
pub use restaurant_table::TableStatus;
