//! Core library for the QXP marketing site.
//!
//! Holds the rule-governed parts of the site: the volume-discount pricing
//! calculator, fragment parsing and view selection for the hash router, the
//! solution persona catalog, and form draft persistence on top of a
//! `qxp-storage` backend. Nothing here renders markup; hosts (the HTTP
//! server, the CLI) decide how a selected view is presented.

pub mod catalog;
pub mod draft;
pub mod error;
pub mod form;
pub mod pricing;
pub mod route;
pub mod router;
pub mod view;
