pub mod admin;
pub mod auth;
pub mod coupon;
pub mod credit;
pub mod cron;
pub mod draft;
pub mod health;
pub mod payment;
pub mod plan;
pub mod post;
pub mod scheduled_post;
pub mod user;
