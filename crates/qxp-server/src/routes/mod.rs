//! HTTP route modules.

pub mod drafts;
pub mod forms;
pub mod pricing;
pub mod site;
pub mod sys;
pub mod views;
