//! Integration tests for action-dispatch.
//!
//! These tests drive a dispatcher only through its public API, the way a
//! hosting framework would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use action_dispatch::handler::{ActionHandler, CallContext, HandlerRegistry};
use action_dispatch::result::{CODE_ERROR_BUSINESS, CODE_SUCCESS};
use action_dispatch::sink::{ChannelSink, JsonLineSink, ReportedResult};
use action_dispatch::{ActionDispatcher, Call, CallResult, Component};
use tokio::sync::mpsc::UnboundedReceiver;

/// Handler returning a fixed result and counting its invocations.
struct Counting {
    name: &'static str,
    result: bool,
    calls: Arc<AtomicUsize>,
}

impl ActionHandler for Counting {
    fn name(&self) -> &str {
        self.name
    }

    fn invoke(&self, _cx: &CallContext<'_>) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

fn drain(rx: &mut UnboundedReceiver<ReportedResult>) -> Vec<ReportedResult> {
    let mut out = Vec::new();
    while let Ok(reported) = rx.try_recv() {
        out.push(reported);
    }
    out
}

/// Registered "login" returning true: routed, no error report.
#[test]
fn test_login_routes_to_handler() {
    let (sink, mut rx) = ChannelSink::channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let component = ActionDispatcher::builder()
        .handler(Counting {
            name: "login",
            result: true,
            calls: calls.clone(),
        })
        .sink(sink)
        .build();

    assert!(component.on_call(&Call::new("login", "c1")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(drain(&mut rx).is_empty());
}

/// No handlers: "logout" fails with exactly one report to its call id.
#[test]
fn test_unknown_action_reports_once() {
    let (sink, mut rx) = ChannelSink::channel();
    let component = ActionDispatcher::builder().sink(sink).build();

    assert!(!component.on_call(&Call::new("logout", "c2")));

    let reports = drain(&mut rx);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].call_id.as_str(), "c2");
    assert_eq!(reports[0].result.code(), CODE_ERROR_BUSINESS);
    assert!(reports[0].result.error_message().unwrap().contains("logout"));
}

/// A handler that returns false is a handler failure, not a routing failure.
#[test]
fn test_handler_failure_is_forwarded_without_report() {
    let (sink, mut rx) = ChannelSink::channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let component = ActionDispatcher::builder()
        .handler(Counting {
            name: "ping",
            result: false,
            calls: calls.clone(),
        })
        .sink(sink)
        .build();

    assert!(!component.on_call(&Call::new("ping", "c3")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(drain(&mut rx).is_empty());
}

/// Each action reaches only its own handler.
#[test]
fn test_routing_selects_matching_handler() {
    let login_calls = Arc::new(AtomicUsize::new(0));
    let logout_calls = Arc::new(AtomicUsize::new(0));
    let component = ActionDispatcher::builder()
        .handler(Counting {
            name: "login",
            result: true,
            calls: login_calls.clone(),
        })
        .handler(Counting {
            name: "logout",
            result: false,
            calls: logout_calls.clone(),
        })
        .build();

    assert!(component.on_call(&Call::new("login", "c1")));
    assert!(component.on_call(&Call::new("login", "c2")));
    assert!(!component.on_call(&Call::new("logout", "c3")));

    assert_eq!(login_calls.load(Ordering::SeqCst), 2);
    assert_eq!(logout_calls.load(Ordering::SeqCst), 1);
}

/// Action names are matched exactly.
#[test]
fn test_action_names_are_exact() {
    let (sink, mut rx) = ChannelSink::channel();
    let component = ActionDispatcher::builder()
        .action("login", |_cx| true)
        .sink(sink)
        .build();

    assert!(!component.on_call(&Call::new("Login", "c1")));
    assert!(!component.on_call(&Call::new("", "c2")));

    let reports = drain(&mut rx);
    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports[1].result.error_message(),
        Some("has not support for action:")
    );
}

/// Many threads racing the first call populate the registry once.
#[test]
fn test_concurrent_first_calls_initialize_once() {
    const THREADS: usize = 16;

    let populations = Arc::new(AtomicUsize::new(0));
    let counter = populations.clone();
    let component = Arc::new(
        ActionDispatcher::builder()
            .registrations(move |registry: &mut HandlerRegistry| {
                counter.fetch_add(1, Ordering::SeqCst);
                // Widen the window for racing callers
                thread::sleep(Duration::from_millis(20));
                registry.register_fn("login", |_cx| true);
            })
            .build(),
    );
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let component = component.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                component.on_call(&Call::new("login", format!("c{}", i)))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(populations.load(Ordering::SeqCst), 1);

    // Later calls never repopulate
    for _ in 0..100 {
        assert!(component.on_call(&Call::new("login", "again")));
    }
    component.ensure_initialized();
    assert_eq!(populations.load(Ordering::SeqCst), 1);
}

/// Two handlers under one name: only the later one is reachable.
#[test]
fn test_duplicate_registration_last_wins() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let component = ActionDispatcher::builder()
        .handler(Counting {
            name: "login",
            result: true,
            calls: first.clone(),
        })
        .handler(Counting {
            name: "login",
            result: false,
            calls: second.clone(),
        })
        .build();

    assert!(!component.on_call(&Call::new("login", "c1")));
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(component.action_names(), vec!["login"]);
}

/// Handlers can read params and deliver their own result.
#[test]
fn test_handler_sends_own_result() {
    let (sink, mut rx) = ChannelSink::channel();
    let component = ActionDispatcher::builder()
        .action("greet", |cx| {
            let name: String = match cx.param("name") {
                Ok(Some(name)) => name,
                _ => return false,
            };
            match CallResult::success_with("greeting", format!("hello {}", name)) {
                Ok(result) => {
                    cx.send_result(result);
                    true
                }
                Err(_) => false,
            }
        })
        .sink(sink)
        .build();

    let call = Call::new("greet", "c5").with_param("name", "billy").unwrap();
    assert!(component.on_call(&call));
    assert!(!component.on_call(&Call::new("greet", "c6")));

    let reports = drain(&mut rx);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].call_id.as_str(), "c5");
    assert_eq!(reports[0].result.code(), CODE_SUCCESS);
    assert_eq!(
        reports[0].result.data::<String>("greeting").unwrap().as_deref(),
        Some("hello billy")
    );
}

/// Hosts can hold heterogeneous units behind the trait and find them by name.
#[test]
fn test_components_as_trait_objects() {
    let components: Vec<Box<dyn Component>> = vec![
        Box::new(
            ActionDispatcher::builder()
                .name("ComponentA")
                .action("showActivity", |_cx| true)
                .build(),
        ),
        Box::new(
            ActionDispatcher::builder()
                .name("ComponentB")
                .action("login", |_cx| true)
                .build(),
        ),
    ];

    let target = components
        .iter()
        .find(|c| c.name() == "ComponentB")
        .unwrap();
    assert!(target.on_call(&Call::new("login", "c1")));
    assert!(!target.on_call(&Call::new("showActivity", "c2")));
}

/// Fresh dispatchers never share registry state.
#[test]
fn test_dispatchers_are_isolated() {
    let a = ActionDispatcher::builder().action("login", |_cx| true).build();
    let b = ActionDispatcher::builder().build();

    assert!(a.on_call(&Call::new("login", "c1")));
    assert!(!b.on_call(&Call::new("login", "c1")));
    assert_eq!(b.handler_count(), 0);
}

/// Error reports written as JSON lines carry call id and message.
#[test]
fn test_json_line_sink_reports() {
    let sink = Arc::new(JsonLineSink::new(Vec::new()));
    let component = ActionDispatcher::builder().shared_sink(sink.clone()).build();

    assert!(!component.on_call(&Call::new("logout", "c2")));
    drop(component);

    let sink = Arc::try_unwrap(sink).ok().unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();
    let line: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();

    assert_eq!(line["callId"], "c2");
    assert_eq!(line["result"]["success"], false);
    assert_eq!(
        line["result"]["errorMessage"],
        "has not support for action:logout"
    );
}

/// Calls dispatched from blocking tokio tasks report to an async receiver.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_from_tokio_tasks() {
    let (sink, mut rx) = ChannelSink::channel();
    let component = Arc::new(
        ActionDispatcher::builder()
            .action("login", |cx| {
                cx.send_result(CallResult::success());
                true
            })
            .sink(sink)
            .build(),
    );

    let mut tasks = Vec::new();
    for i in 0..8 {
        let component = component.clone();
        let action = if i % 2 == 0 { "login" } else { "logout" };
        tasks.push(tokio::task::spawn_blocking(move || {
            component.on_call(&Call::new(action, format!("c{}", i)))
        }));
    }

    let mut routed = 0;
    for task in tasks {
        if task.await.unwrap() {
            routed += 1;
        }
    }
    assert_eq!(routed, 4);

    let mut successes = 0;
    let mut errors = 0;
    for _ in 0..8 {
        let reported = rx.recv().await.unwrap();
        if reported.result.is_success() {
            successes += 1;
        } else {
            assert!(reported.result.error_message().unwrap().contains("logout"));
            errors += 1;
        }
    }
    assert_eq!(successes, 4);
    assert_eq!(errors, 4);
}
