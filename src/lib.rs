pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod faq;
pub mod i18n;
pub mod retry;
pub mod security;
pub mod state;
pub mod translation;
