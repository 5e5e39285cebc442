pub mod config;
pub mod logging;

pub mod catalog;
pub mod downloader;
pub mod error;
pub mod http;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod storage;
