//! Wire messages for each control plane service.

pub mod availability;
pub mod integration;
pub mod pagerduty;
pub mod policyset;
pub mod selector;
pub mod slack;
pub mod webhook;
pub mod workflow;
