pub mod coupons;
pub mod order_queries;
pub mod orders;
pub mod payment_gateway;
pub mod stock;
