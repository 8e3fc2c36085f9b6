// src/core/mod.rs

pub mod cache;
pub mod command_parser;
pub mod comparator;
pub mod enrichment;
pub mod install_ledger;
pub mod installer;
pub mod local_repository;
pub mod namespace;
pub mod paths;
pub mod remote_repository;
pub mod repository;
