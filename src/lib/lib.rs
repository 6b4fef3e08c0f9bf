#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Compose emails and deliver them through Gmail's SMTP relay

pub mod domain;
pub mod infrastructure;

pub use infrastructure::email::smtp::send_simple_email;
