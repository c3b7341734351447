//! Core library for jsonscrape
//!
//! This crate implements the **Functional Core** of the jsonscrape
//! application, following the Functional Core - Imperative Shell
//! architectural pattern.
//!
//! # Architecture Overview
//!
//! The jsonscrape project uses a two-crate architecture to enforce
//! separation of concerns:
//!
//! - **`jsonscrape_core`** (this crate): Pure transformation functions with zero I/O
//! - **`jsonscrape`**: HTTP, filesystem, and orchestration (the Imperative Shell)
//!
//! All functions in this crate are deterministic and perform no I/O, so
//! they are tested with simple fixture data and no mocking.
//!
//! # Module Organization
//!
//! - [`path`]: Dot-path lookup and flattening over JSON trees
//! - [`extract`]: Record extraction from page payloads
//! - [`transform`]: The declarative filter/map pipeline
//! - [`retry`]: Retry classification and backoff decisions
//! - [`settings`]: Typed settings parsed from the loosely-typed JSON document
//! - [`serialize`]: Output serializers (CSV, JSON, XML, HTML)
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use jsonscrape_core::transform::{transform_records, FilterRule, FilterOp, MappingRule};
//! use serde_json::json;
//!
//! let records = vec![json!({"id": 1, "user": {"name": "Alice"}, "active": true})];
//! let mapping = vec![MappingRule { from: "user.name".into(), to: "name".into() }];
//! let filters = vec![FilterRule {
//!     path: "active".into(),
//!     op: FilterOp::Eq,
//!     value: json!(true),
//! }];
//!
//! let output = transform_records(&records, &mapping, &filters);
//! assert_eq!(output.len(), 1);
//! ```

pub mod extract;
pub mod path;
pub mod retry;
pub mod serialize;
pub mod settings;
pub mod transform;
