pub mod app;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod referrals;
pub mod repository;
