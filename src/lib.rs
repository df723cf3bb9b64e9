//! panechat - multi-pane conversation orchestration for a terminal chat client.
//!
//! The library holds the orchestration layer ([`panes`], [`execution`],
//! [`composer`], [`lifecycle`], [`input`]) tied together by [`app::ChatApp`],
//! plus the collaborator [`traits`] and their [`adapters`]. The binary wires
//! it to a terminal.

pub mod adapters;
pub mod app;
pub mod composer;
pub mod error;
pub mod execution;
pub mod input;
pub mod lifecycle;
pub mod models;
pub mod notifications;
pub mod panes;
pub mod startup;
pub mod terminal;
pub mod traits;
pub mod ui;
