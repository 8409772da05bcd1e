//! Synchronous wrapper around [`crate::Device`].
//!
//! Each call drives the matching async method to completion on a private
//! current-thread runtime. Do not use from inside an async context.

use tokio::runtime::{Builder, Runtime};

use crate::types::{ParameterDescriptor, ParameterMap};
use crate::{DeviceBuilder, Result};

pub struct Device {
    inner: crate::Device,
    rt: Runtime,
}

impl Device {
    pub fn new(index: u32, base_url: impl Into<String>) -> Result<Self> {
        Self::from_builder(DeviceBuilder::new(base_url).device(index))
    }

    pub fn from_builder(builder: DeviceBuilder) -> Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: builder.build()?,
            rt,
        })
    }

    /// The async handle this wrapper drives.
    pub fn get_ref(&self) -> &crate::Device {
        &self.inner
    }

    pub fn index(&self) -> u32 {
        self.inner.index()
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn descriptors(&self) -> &'static [ParameterDescriptor] {
        self.inner.descriptors()
    }

    pub fn parameters(&self) -> &ParameterMap {
        self.inner.parameters()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.inner.unique_id()
    }

    pub fn device_count(&mut self) -> Result<u32> {
        self.rt.block_on(self.inner.device_count())
    }

    pub fn hostname(&mut self) -> Result<String> {
        self.rt.block_on(self.inner.hostname())
    }

    pub fn status(&mut self) -> Result<String> {
        self.rt.block_on(self.inner.status())
    }

    pub fn update(&mut self) -> Result<()> {
        self.rt.block_on(self.inner.update())
    }

    pub fn write_parameter(&mut self, name: &str, value: &str) -> Result<Vec<u8>> {
        self.rt.block_on(self.inner.write_parameter(name, value))
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    pub fn set_name(&mut self, value: &str) -> Result<bool> {
        self.rt.block_on(self.inner.set_name(value))
    }

    pub fn current_temperature(&self) -> Result<Option<f64>> {
        self.inner.current_temperature()
    }

    pub fn target_temperature(&self) -> Result<Option<f64>> {
        self.inner.target_temperature()
    }

    pub fn set_target_temperature(&mut self, celsius: f64) -> Result<bool> {
        self.rt.block_on(self.inner.set_target_temperature(celsius))
    }

    pub fn target_temperature_high(&self) -> Result<Option<f64>> {
        self.inner.target_temperature_high()
    }

    pub fn set_target_temperature_high(&mut self, celsius: f64) -> Result<bool> {
        self.rt.block_on(self.inner.set_target_temperature_high(celsius))
    }

    pub fn target_temperature_low(&self) -> Result<Option<f64>> {
        self.inner.target_temperature_low()
    }

    pub fn set_target_temperature_low(&mut self, celsius: f64) -> Result<bool> {
        self.rt.block_on(self.inner.set_target_temperature_low(celsius))
    }

    pub fn week_program(&self) -> Result<Option<i64>> {
        self.inner.week_program()
    }

    pub fn set_week_program(&mut self, program: i64) -> Result<bool> {
        self.rt.block_on(self.inner.set_week_program(program))
    }

    pub fn operation_mode(&self) -> Result<Option<i64>> {
        self.inner.operation_mode()
    }

    pub fn set_operation_mode(&mut self, mode: i64) -> Result<bool> {
        self.rt.block_on(self.inner.set_operation_mode(mode))
    }

    pub fn device_id(&self) -> Result<Option<i64>> {
        self.inner.device_id()
    }

    pub fn controller_id(&self) -> Result<Option<i64>> {
        self.inner.controller_id()
    }
}
