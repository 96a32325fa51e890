//! HTTP handlers, grouped by API area

pub mod health;
pub mod marketplace;
pub mod payments;
pub mod transactions;
pub mod wallet;

pub use health::health_check;
pub use marketplace::{
    create_item, deactivate_item, get_items, get_seller_items, purchase_item,
};
pub use payments::{pay_bill, recharge_phone};
pub use transactions::{create_transaction, get_transactions};
pub use wallet::{create_wallet, get_wallet, update_balance};
