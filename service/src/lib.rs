#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod admin;
pub mod build_info;
pub mod capabilities;
pub mod config;
pub mod http;
pub mod rest;
pub mod rpc;
