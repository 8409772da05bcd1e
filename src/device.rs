use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::encoding::{EncodingDetector, SniffingDetector};
use crate::logger::{MessageLogMode, MessageLogger};
use crate::mapper::parse_device;
use crate::protocol::{
    build_request, device_item, single_item, single_value, write_query, HOSTNAME, READ_PATH,
    SYSTEM_STATUS, TOTAL_DEVICES,
};
use crate::transport::Transport;
use crate::types::*;
use crate::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Parameter map keys.
const NAME: &str = "Name";
const TEMPERATURE: &str = "Temperature";
const SETPOINT: &str = "Setpoint";
const SETPOINT_MAX: &str = "Setpoint max";
const SETPOINT_MIN: &str = "Setpoint min";
const WEEK_PROGRAM: &str = "Week program";
const OPERATION_MODE: &str = "Operation mode";
const DEVICE_ID: &str = "Device ID";
const CONTROLLER_ID: &str = "Controller ID";

pub struct DeviceBuilder {
    base_url: String,
    index: u32,
    timeout: Duration,
    detector: Arc<dyn EncodingDetector>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl DeviceBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            index: 0,
            timeout: DEFAULT_TIMEOUT,
            detector: Arc::new(SniffingDetector),
            log_mode: None,
            log_path: None,
        }
    }

    /// Index of the thermostat on the controller, `0..device_count()`.
    pub fn device(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Deadline for every request, reads and writes alike.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn encoding_detector(mut self, detector: impl EncodingDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Device> {
        let transport = Transport::new(self.base_url, self.timeout, self.detector)?;

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        Ok(Device {
            index: self.index,
            transport,
            descriptors: &DESCRIPTORS,
            parameters: ParameterMap::new(),
            logger,
        })
    }
}

/// One thermostat behind a Touchline controller.
///
/// A handle performs one request per call and keeps the parameters of the
/// last successful [`update`](Device::update). Handles are independent of each
/// other; calls on a single handle need `&mut self` and are therefore serialized.
pub struct Device {
    index: u32,
    transport: Transport,
    descriptors: &'static [ParameterDescriptor],
    parameters: ParameterMap,
    logger: Option<MessageLogger>,
}

impl Device {
    pub fn builder(base_url: impl Into<String>) -> DeviceBuilder {
        DeviceBuilder::new(base_url)
    }

    /// Handle for device `index` with the default timeout.
    pub fn new(index: u32, base_url: impl Into<String>) -> Result<Self> {
        DeviceBuilder::new(base_url).device(index).build()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn descriptors(&self) -> &'static [ParameterDescriptor] {
        self.descriptors
    }

    /// Raw parameters from the last update, including the unique id.
    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.parameters.unique_id()
    }

    /// Number of thermostats registered with the controller.
    pub async fn device_count(&mut self) -> Result<u32> {
        let value = self.query_single(TOTAL_DEVICES).await?;
        value.trim().parse().map_err(|_| Error::InvalidValue {
            key: TOTAL_DEVICES.to_string(),
            value,
        })
    }

    pub async fn hostname(&mut self) -> Result<String> {
        self.query_single(HOSTNAME).await
    }

    pub async fn status(&mut self) -> Result<String> {
        self.query_single(SYSTEM_STATUS).await
    }

    /// Fetch all parameters of this device, replacing the previous set.
    pub async fn update(&mut self) -> Result<()> {
        let request = build_request(&[device_item(self.index, self.descriptors)]);
        let doc = self.read(&request).await?;
        let parameters = parse_device(&doc, self.descriptors);
        debug!(
            device = self.index,
            count = parameters.len(),
            unique_id = ?parameters.unique_id(),
            "device updated"
        );

        if let Some(ref mut logger) = self.logger {
            logger.log_parameters(self.index, &parameters);
        }
        self.parameters = parameters;
        Ok(())
    }

    /// Write `name=value` for this device and return the controller's raw answer.
    /// Requires a prior [`update`](Device::update) to learn the unique id.
    pub async fn write_parameter(&mut self, name: &str, value: &str) -> Result<Vec<u8>> {
        let unique_id = self.unique_id().ok_or(Error::NotUpdated)?;
        let query = write_query(unique_id, name, value);
        self.transport.write(&query).await
    }

    pub fn name(&self) -> Option<&str> {
        self.parameters.get(NAME)
    }

    pub async fn set_name(&mut self, value: &str) -> Result<bool> {
        self.write_confirmed("name", value.to_string()).await
    }

    pub fn current_temperature(&self) -> Result<Option<f64>> {
        self.temperature(TEMPERATURE)
    }

    pub fn target_temperature(&self) -> Result<Option<f64>> {
        self.temperature(SETPOINT)
    }

    pub async fn set_target_temperature(&mut self, celsius: f64) -> Result<bool> {
        self.write_confirmed("SollTemp", to_wire_temperature(celsius)).await
    }

    pub fn target_temperature_high(&self) -> Result<Option<f64>> {
        self.temperature(SETPOINT_MAX)
    }

    pub async fn set_target_temperature_high(&mut self, celsius: f64) -> Result<bool> {
        self.write_confirmed("SollTempMaxVal", to_wire_temperature(celsius)).await
    }

    pub fn target_temperature_low(&self) -> Result<Option<f64>> {
        self.temperature(SETPOINT_MIN)
    }

    pub async fn set_target_temperature_low(&mut self, celsius: f64) -> Result<bool> {
        self.write_confirmed("SollTempMinVal", to_wire_temperature(celsius)).await
    }

    pub fn week_program(&self) -> Result<Option<i64>> {
        self.integer(WEEK_PROGRAM)
    }

    pub async fn set_week_program(&mut self, program: i64) -> Result<bool> {
        self.write_confirmed("WeekProg", program.to_string()).await
    }

    pub fn operation_mode(&self) -> Result<Option<i64>> {
        self.integer(OPERATION_MODE)
    }

    pub async fn set_operation_mode(&mut self, mode: i64) -> Result<bool> {
        self.write_confirmed("OPMode", mode.to_string()).await
    }

    pub fn device_id(&self) -> Result<Option<i64>> {
        self.integer(DEVICE_ID)
    }

    pub fn controller_id(&self) -> Result<Option<i64>> {
        self.integer(CONTROLLER_ID)
    }

    async fn read(&mut self, request: &str) -> Result<xmltree::Element> {
        if let Some(ref mut logger) = self.logger {
            logger.log_request("POST", READ_PATH, Some(request));
        }
        self.transport.request_and_parse(request).await
    }

    async fn query_single(&mut self, name: &str) -> Result<String> {
        let request = build_request(&[single_item(name)]);
        let doc = self.read(&request).await?;
        single_value(&doc)
    }

    /// The controller echoes the stored value on success; anything else means
    /// the write was rejected.
    async fn write_confirmed(&mut self, name: &str, value: String) -> Result<bool> {
        let echo = self.write_parameter(name, &value).await?;
        let echo = String::from_utf8_lossy(&echo);
        let accepted = echo == value;
        if !accepted {
            debug!(parameter = name, sent = %value, echo = %echo, "write not confirmed");
        }

        if let Some(ref mut logger) = self.logger {
            let query = write_query(self.parameters.unique_id().unwrap_or_default(), name, &value);
            logger.log_write(self.index, &query, &echo, accepted);
        }
        Ok(accepted)
    }

    fn integer(&self, key: &str) -> Result<Option<i64>> {
        self.parameters
            .get(key)
            .map(|value| {
                value.trim().parse().map_err(|_| Error::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    fn temperature(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.integer(key)?.map(from_wire_temperature))
    }
}
