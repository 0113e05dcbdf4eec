//! Create Asana tasks from lines of markdown files.
//!
//! The pieces are wired together by [`flow::run_flow`]: a [`remote::TaskTracker`]
//! supplies workspaces, projects and sections, a [`picker::Picker`] lets the
//! user choose among them, and [`link`] writes the created task's link back
//! into the [`document::Document`].

pub mod cli;
pub mod document;
pub mod flow;
pub mod link;
pub mod models;
pub mod picker;
pub mod remote;
pub mod settings;
