//! Docpress Server Library
//!
//! A document conversion service: authenticated clients upload DOCX files,
//! the server extracts their paragraph text, renders it to PDF through an
//! external engine, and publishes the result for download.
//!
//! # Modules
//!
//! - `convert`: The conversion pipeline (validate, extract, render, publish)
//! - `storage`: Staging area and artifact store
//! - `auth`: Accounts, password hashing, and bearer-token sessions
//! - `routes`: HTTP surface

pub mod auth;
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
