//! # Stellar Structure
//!
//! Stellar interior models for [Twine](https://github.com/isentropic-dev/twine).
//!
//! A star is integrated outward from its centre with an adaptive
//! Runge-Kutta-Fehlberg 4(5) step, trimmed at its photosphere, and its
//! central density is bisected until the surface radiates like a blackbody.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! ## Logging
//!
//! Progress is reported through the [`log`] facade: step progress at `debug`,
//! converged searches at `info`, and failed trials or stars at `warn`.
//! Install any logger implementation to see it.

pub mod models;
pub mod support;
