//! # Speech Feature
//!
//! Audible reminder delivery.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod notifier;

pub use notifier::{LogNotifier, Notifier, SpeechNotifier};
