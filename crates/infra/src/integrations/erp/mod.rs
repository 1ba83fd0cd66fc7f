//! ERP integration

pub mod client;

pub use client::ODataErpClient;
