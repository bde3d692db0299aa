pub mod content;
pub mod db;
pub mod feed;
pub mod server;
pub mod version;
pub mod web;
