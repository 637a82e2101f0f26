pub mod blocks;
pub mod config;
pub mod dates;
pub mod http_client;
pub mod import;
pub mod logging;
pub mod model;
pub mod names;
pub mod report;
pub mod rest;
pub mod sheet;
