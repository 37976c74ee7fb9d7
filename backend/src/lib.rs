pub mod api;
pub mod config;
pub mod db_utils;
pub mod server;
