pub mod app;
pub mod broker;
pub mod core;
pub mod dispatch;
pub mod handler;
pub mod message;
pub mod receiver;
