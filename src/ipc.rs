//! Request routing for a UI process
//!
//! A request names a channel, `<entity>:<operation>`, and carries its
//! arguments as a JSON array:
//!
//! ```text
//! {"channel": "class:update", "args": [3, {"name": "Grade 3", "monthly_fee": 9000}]}
//! ```
//!
//! Every request gets exactly one envelope back. [`IpcRouter::serve`] runs
//! the line-delimited loop used by `school ipc`.

use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::settings::Settings;
use crate::controller::{
    api_error, AdmissionController, ApiResponse, ClassController, MonthlyFeeController,
    PaymentController, StudentController,
};
use crate::error::SchoolResult;
use crate::storage::Storage;

/// One inbound request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcRequest {
    pub channel: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Positional arguments of a request
struct Args<'v> {
    values: &'v [Value],
}

impl Args<'_> {
    fn required<T: DeserializeOwned>(&self, index: usize) -> Result<T, String> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| format!("missing argument {}", index + 1))?;
        T::deserialize(value).map_err(|e| format!("argument {}: {}", index + 1, e))
    }

    fn optional<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, String> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.required(index).map(Some),
        }
    }
}

enum RouteError {
    UnknownChannel,
    BadArguments(String),
}

impl From<String> for RouteError {
    fn from(message: String) -> Self {
        Self::BadArguments(message)
    }
}

fn envelope<T: Serialize>(response: ApiResponse<T>) -> Value {
    serde_json::to_value(&response).unwrap_or_else(|e| {
        serde_json::json!({
            "ok": false,
            "message": format!("Unknown error while encoding response: {}", e),
        })
    })
}

/// Maps channels onto controller operations
pub struct IpcRouter<'a> {
    storage: &'a Storage,
    default_months: u32,
}

impl<'a> IpcRouter<'a> {
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            default_months: settings.default_admission_months,
        }
    }

    /// Run one request and return its envelope
    pub fn dispatch(&self, channel: &str, args: &[Value]) -> Value {
        let args = Args { values: args };
        let routed = match channel.split_once(':') {
            Some(("class", op)) => self.class(op, &args),
            Some(("student", op)) => self.student(op, &args),
            Some(("monthly_fee", op)) => self.monthly_fee(op, &args),
            Some(("admission", op)) => self.admission(op, &args),
            Some(("payment", op)) => self.payment(op, &args),
            _ => Err(RouteError::UnknownChannel),
        };

        match routed {
            Ok(value) => value,
            Err(RouteError::UnknownChannel) => {
                envelope(api_error::<()>(format!("Unknown channel: {}", channel)))
            }
            Err(RouteError::BadArguments(message)) => envelope(api_error::<()>(format!(
                "Invalid arguments for {}: {}",
                channel, message
            ))),
        }
    }

    /// Decode one JSON request line and encode the envelope
    pub fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<IpcRequest>(line) {
            Ok(request) => self.dispatch(&request.channel, &request.args),
            Err(e) => envelope(api_error::<()>(format!("Malformed request: {}", e))),
        };
        response.to_string()
    }

    /// Answer every request line from `reader` with one line on `writer`
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> SchoolResult<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            writeln!(writer, "{}", self.handle_line(&line))?;
            writer.flush()?;
        }
        Ok(())
    }

    fn class(&self, op: &str, args: &Args<'_>) -> Result<Value, RouteError> {
        let controller = ClassController::new(self.storage);
        Ok(match op {
            "create" => envelope(controller.create(args.required(0)?)),
            "update" => envelope(controller.update(args.required(0)?, args.required(1)?)),
            "delete" => envelope(controller.delete(args.required(0)?)),
            "list" => envelope(controller.list(args.optional(0)?)),
            "fetch" => envelope(controller.fetch(args.required(0)?)),
            _ => return Err(RouteError::UnknownChannel),
        })
    }

    fn student(&self, op: &str, args: &Args<'_>) -> Result<Value, RouteError> {
        let controller = StudentController::new(self.storage);
        Ok(match op {
            "create" => envelope(controller.create(args.required(0)?)),
            "update" => envelope(controller.update(args.required(0)?, args.required(1)?)),
            "delete" => envelope(controller.delete(args.required(0)?)),
            "list" => envelope(controller.list(args.optional(0)?)),
            "fetch" => envelope(controller.fetch(args.required(0)?)),
            "balance" => envelope(controller.balance(args.required(0)?)),
            _ => return Err(RouteError::UnknownChannel),
        })
    }

    fn monthly_fee(&self, op: &str, args: &Args<'_>) -> Result<Value, RouteError> {
        let controller = MonthlyFeeController::new(self.storage);
        Ok(match op {
            "create" => envelope(controller.create(args.required(0)?)),
            "generate" => envelope(controller.generate(args.required(0)?)),
            "update" => envelope(controller.update(args.required(0)?, args.required(1)?)),
            "delete" => envelope(controller.delete(args.required(0)?)),
            "list" => envelope(controller.list(args.optional(0)?)),
            "range" => envelope(controller.list_by_date_range(
                args.required(0)?,
                args.required(1)?,
                args.required(2)?,
            )),
            "fetch" => envelope(controller.fetch(args.required(0)?)),
            _ => return Err(RouteError::UnknownChannel),
        })
    }

    fn admission(&self, op: &str, args: &Args<'_>) -> Result<Value, RouteError> {
        let controller = AdmissionController::new(self.storage, self.default_months);
        Ok(match op {
            "create" => envelope(controller.create(args.required(0)?)),
            "update" => envelope(controller.update(args.required(0)?, args.required(1)?)),
            "delete" => envelope(controller.delete(args.required(0)?)),
            "list" => envelope(controller.list(args.optional(0)?)),
            "fetch" => envelope(controller.fetch(args.required(0)?)),
            _ => return Err(RouteError::UnknownChannel),
        })
    }

    fn payment(&self, op: &str, args: &Args<'_>) -> Result<Value, RouteError> {
        let controller = PaymentController::new(self.storage);
        Ok(match op {
            "create" => envelope(controller.create(args.required(0)?)),
            "update" => envelope(controller.update(args.required(0)?, args.required(1)?)),
            "delete" => envelope(controller.delete(args.required(0)?)),
            "list" => envelope(controller.list(args.optional(0)?)),
            "fetch" => envelope(controller.fetch(args.required(0)?)),
            _ => return Err(RouteError::UnknownChannel),
        })
    }
}
