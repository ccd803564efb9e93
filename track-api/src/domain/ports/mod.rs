//! Hexagonal ports.
//!
//! Inbound ports are the use cases HTTP handlers invoke; outbound ports are
//! what the service layer needs from persistence and instrumentation.

pub mod inbound;
pub mod outbound;
