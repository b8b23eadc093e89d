//! Telefilter - Narrowband Telephony Filter Bank
//!
//! µ-law codec, streaming filters with caller-owned state, call sessions and
//! spectral reporting, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod codec;
pub mod filters;
pub mod session;
pub mod spectrum;
pub mod wav;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use filters::{ConfigError, Filter, FilterConfig, FilterError, FilterState, StreamFilter, Topology};
pub use session::{CallSession, Recording, SessionError};
pub use spectrum::{BandReport, SpectrumAnalyzer};
