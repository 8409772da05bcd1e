use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::diff::diff_parameters;
use crate::types::ParameterMap;

pub enum MessageLogMode {
    Full,
    Diffed,
}

pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous: Option<ParameterMap>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            mode,
            file,
            previous: None,
        })
    }

    pub fn log_request(&mut self, method: &str, path: &str, body: Option<&str>) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "method": method,
            "path": path,
            "body": body,
        });
        self.write_line(&entry);
    }

    pub fn log_write(&mut self, device: u32, query: &str, echo: &str, accepted: bool) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "write",
            "device": device,
            "query": query,
            "echo": echo,
            "accepted": accepted,
        });
        self.write_line(&entry);
    }

    pub fn log_parameters(&mut self, device: u32, params: &ParameterMap) {
        let entry = match (&self.mode, &self.previous) {
            (MessageLogMode::Diffed, Some(prev)) => {
                let changes: Vec<Value> = diff_parameters(prev, params)
                    .into_iter()
                    .map(|c| json!({ "key": c.key, "old": c.old, "new": c.new }))
                    .collect();
                json!({
                    "ts": Utc::now().to_rfc3339(),
                    "dir": "params",
                    "device": device,
                    "changes": changes,
                })
            }
            (MessageLogMode::Diffed, None) => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "params",
                "device": device,
                "full": true,
                "params": params,
            }),
            (MessageLogMode::Full, _) => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "params",
                "device": device,
                "params": params,
            }),
        };
        self.write_line(&entry);
        self.previous = Some(params.clone());
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
