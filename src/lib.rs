//! Sea local-home bridge - local fulfillment for the sea sensor
//!
//! Translates smart-home platform intents into plain HTTP calls against the
//! sensor's embedded web server and maps the answers back:
//! - IDENTIFY synthesizes the sensor descriptor
//! - QUERY reads `/api/google/state` from each device
//! - EXECUTE forwards commands to `/api/google/homegraph`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Platform (local fulfillment)            │
//! └────────────────────┬────────────────────────────────┘
//!                      │ {requestId, inputs:[{intent, payload}]}
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Intent handlers                     │
//! │   Identify  │  Query  │  Execute  │  Aggregation     │
//! └────────────────────┬────────────────────────────────┘
//!                      │ resolve address, send per device
//! ┌────────────────────▼────────────────────────────────┐
//! │          Transport (plaintext HTTP + JSON)           │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Sea sensor (sea.local:80)               │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod devices;
pub mod error;
pub mod intents;
pub mod transport;

pub use config::Config;
pub use devices::{CustomData, DeviceRef, ResolvedAddress, resolve};
pub use error::{Error, Result};
pub use intents::{
    DeviceOutcome, ErrorCode, IntentHandler, IntentRequest, IntentResponse, PlatformRequest,
};
pub use transport::{HttpTransport, Method, Transport, TransportError};
