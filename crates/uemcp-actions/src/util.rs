//! Logging and diagnostics actions. Registered as the `util_actions`
//! module.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use uemcp_bridge::{ActionModule, ActionOutput, ActionResult};
use uemcp_proto::ArgMap;

use crate::host::EditorHost;
use crate::params;

pub const MODULE_NAME: &str = "util_actions";

const DEFAULT_LOG_LINES: usize = 100;

pub fn module(host: Arc<dyn EditorHost>) -> ActionModule {
    let mut module = ActionModule::new(MODULE_NAME);
    crate::bind(&mut module, &host, "ue_print_message", print_message);
    crate::bind(&mut module, &host, "ue_get_output_log", get_output_log);
    module
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PrintMessageParams {
    message: String,
}

fn print_message(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: PrintMessageParams = params::parse(args)?;
    host.log_message(&p.message)?;
    ActionOutput::json(&json!({
        "success": true,
        "message": p.message,
    }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GetOutputLogParams {
    #[serde(default)]
    max_lines: Option<usize>,
}

fn get_output_log(host: &dyn EditorHost, args: &ArgMap) -> ActionResult {
    let p: GetOutputLogParams = params::parse(args)?;
    let lines = host.output_log_tail(p.max_lines.unwrap_or(DEFAULT_LOG_LINES))?;
    ActionOutput::json(&json!({
        "success": true,
        "lines": lines,
    }))
}
