// Floor and menu
pub mod menu;
pub mod tables;

// POS and kitchen
pub mod order_status;
pub mod orders;
pub mod payments;

// Restaurant profile
pub mod settings;

// Analytics and reporting
pub mod analytics;
pub mod insights;
