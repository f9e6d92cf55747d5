//! ComponentB worker - line-delimited JSON calls in, results out.
//!
//! This demo demonstrates:
//! - Registering handlers lazily through a registration feed
//! - Handlers reading typed params and sending their own results
//! - Unknown actions being reported back on the result channel
//!
//! # Running
//!
//! ```sh
//! printf '%s\n' \
//!   '{"actionName":"login","callId":"c1","params":{"user":"billy"}}' \
//!   '{"actionName":"logout","callId":"c2"}' \
//!   | cargo run --example component_b
//! ```
//!
//! Results are written to stdout, one JSON object per line. Logs go to stderr.

use std::io::BufRead;

use action_dispatch::handler::{ActionHandler, CallContext, HandlerRegistry};
use action_dispatch::sink::JsonLineSink;
use action_dispatch::{logging, ActionDispatcher, Call, CallResult, Component};

/// Handler for the "login" action.
struct Login;

impl ActionHandler for Login {
    fn name(&self) -> &str {
        "login"
    }

    fn invoke(&self, cx: &CallContext<'_>) -> bool {
        let user: String = match cx.param("user") {
            Ok(Some(user)) => user,
            Ok(None) => {
                cx.send_result(CallResult::error("missing param: user"));
                return false;
            }
            Err(e) => {
                cx.send_result(CallResult::error(e.to_string()));
                return false;
            }
        };

        match CallResult::success_with("user", user) {
            Ok(result) => {
                cx.send_result(result);
                true
            }
            Err(e) => {
                cx.send_result(CallResult::error(e.to_string()));
                false
            }
        }
    }
}

fn register_actions(registry: &mut HandlerRegistry) {
    registry.register(Login);
    registry.register_fn("getInfo", |cx| {
        match CallResult::success_with("component", "ComponentB") {
            Ok(result) => {
                cx.send_result(result);
                true
            }
            Err(_) => false,
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let component = ActionDispatcher::builder()
        .name("ComponentB")
        .registrations(register_actions)
        .sink(JsonLineSink::stdout())
        .build();

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let call: Call = match serde_json::from_str(&line) {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!("Skipping malformed call: {}", e);
                continue;
            }
        };

        let handled = component.on_call(&call);
        tracing::info!(
            component = component.name(),
            action = call.action_name(),
            call_id = %call.call_id(),
            handled,
            "Call finished"
        );
    }

    Ok(())
}
