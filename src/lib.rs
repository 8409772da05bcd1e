#[cfg(feature = "blocking")]
pub mod blocking;
mod device;
mod diff;
mod encoding;
mod error;
mod logger;
mod mapper;
pub mod protocol;
mod transport;
mod types;

pub use device::{Device, DeviceBuilder, DEFAULT_TIMEOUT};
pub use encoding::{EncodingDetector, FixedEncoding, SniffingDetector};
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use mapper::{parse_device, unique_id_from_name};
pub use types::*;
