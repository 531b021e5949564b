//! Integration tests for the JSON logger
//!
//! These tests verify:
//! - Threshold filtering
//! - Merge precedence between logger, child and call-site contexts
//! - Reserved metadata keys
//! - Lazy value evaluation
//! - Typed value fidelity on the wire
//! - Call-site resolution against the live stack
//! - File sink output

use rust_json_logger::prelude::*;
use rust_json_logger::{context, info, LazyError, ValueProvider, MIN_CALLER_SKIP};
use serde_json::{json, Value};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn capture(level: Level) -> (MemorySink, Logger) {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level(level)
        .sink(sink.clone())
        .build()
        .expect("valid configuration");
    (sink, logger)
}

#[test]
fn test_threshold_info_drops_debug() {
    let (sink, logger) = capture(Level::INFO);

    logger.debug("debug", &[]);
    assert!(sink.is_empty(), "debug record must not pass an info threshold");

    logger.info("info", &[]);
    logger.error("error", &[]);
    assert_eq!(sink.records().len(), 2);
}

#[test]
fn test_threshold_fatal_only() {
    let (sink, logger) = capture(Level::FATAL);
    logger.debug("d", &[]);
    logger.info("i", &[]);
    logger.error("e", &[]);
    assert!(sink.is_empty());
    assert!(logger.enabled(Level::FATAL));
    assert!(!logger.enabled(Level::ERROR));
}

#[test]
fn test_merge_logger_and_call_contexts() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .context(context! { "bar" => "baz" })
        .sink(sink.clone())
        .build()
        .unwrap();

    logger.info("merged", &[context! { "foo" => "bar" }]);

    let record = &sink.records()[0];
    assert_eq!(record["bar"], "baz");
    assert_eq!(record["foo"], "bar");
}

#[test]
fn test_call_context_wins_on_collision() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .context(context! { "user" => "logger" })
        .sink(sink.clone())
        .build()
        .unwrap();

    logger.info("x", &[context! { "user" => "first" }, context! { "user" => "second" }]);
    assert_eq!(sink.records()[0]["user"], "second");
}

#[test]
fn test_message_key_in_context_is_ignored() {
    let (sink, logger) = capture(Level::INFO);

    logger.info("the real message", &[context! { "message" => "overridden?" }]);
    assert_eq!(sink.records()[0]["message"], "the real message");
}

#[test]
fn test_child_logger_independence() {
    let (sink, parent) = capture(Level::DEBUG);
    let child = parent
        .child(&context! { "bar" => "baz" })
        .build()
        .unwrap();

    child.info("child", &[context! { "foo" => "bar" }]);
    parent.info("parent", &[]);

    let records = sink.records();
    assert_eq!(records[0]["bar"], "baz");
    assert_eq!(records[0]["foo"], "bar");
    assert!(records[1].get("bar").is_none());
    assert!(records[1].get("foo").is_none());
}

#[test]
fn test_nested_children_accumulate() {
    let (sink, service) = capture(Level::INFO);
    let service = service.with_context(&context! { "service" => "billing" });
    let request = service.with_context(&context! { "request_id" => "r-1" });
    let step = request.with_context(&context! { "step" => 3, "service" => "billing-worker" });

    step.info("step done", &[]);

    let record = &sink.records()[0];
    assert_eq!(record["service"], "billing-worker");
    assert_eq!(record["request_id"], "r-1");
    assert_eq!(record["step"], 3);
}

#[test]
fn test_message_key_configuration() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .message_key("msg")
        .sink(sink.clone())
        .build()
        .unwrap();

    logger.info("hello", &[]);

    let record = &sink.records()[0];
    assert_eq!(record["msg"], "hello");
    assert!(record.get("message").is_none());
}

#[test]
fn test_caller_skip_below_minimum_fails() {
    let result = Logger::builder().caller_skip(MIN_CALLER_SKIP - 1).build();
    match result {
        Err(LoggerError::InvalidConfiguration { component, message }) => {
            assert_eq!(component, "caller_skip");
            assert!(message.contains(&MIN_CALLER_SKIP.to_string()));
        }
        other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_lazy_value_serialized_as_literal() {
    let (sink, logger) = capture(Level::INFO);
    let ctx = context! { "hello" => Lazy::new(|| "world") };

    logger.info("lazy", &[ctx]);
    assert_eq!(sink.records()[0]["hello"], "world");
}

#[test]
fn test_lazy_value_recomputed_per_record() {
    let sink = MemorySink::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let source = Arc::clone(&counter);
    let logger = Logger::builder()
        .context(context! {
            "seq" => Lazy::new(move || source.fetch_add(1, Ordering::SeqCst)),
        })
        .sink(sink.clone())
        .build()
        .unwrap();

    logger.info("one", &[]);
    logger.info("two", &[]);
    logger.debug("filtered", &[]);
    logger.info("three", &[]);

    let seqs: Vec<Value> = sink.records().iter().map(|r| r["seq"].clone()).collect();
    assert_eq!(seqs, vec![json!(0), json!(1), json!(2)]);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[test]
fn test_lazy_multiple_values_as_array() {
    let (sink, logger) = capture(Level::INFO);
    logger.info("multi", &[context! { "pair" => Lazy::many(|| vec![json!("a"), json!(2)]) }]);
    assert_eq!(sink.records()[0]["pair"], json!(["a", 2]));
}

#[test]
fn test_invalid_generator_drops_record() {
    struct TakesArgument;

    impl ValueProvider for TakesArgument {
        fn arity(&self) -> usize {
            1
        }

        fn evaluate(&self) -> std::result::Result<Vec<Value>, LazyError> {
            Ok(vec![Value::Null])
        }
    }

    let sink = MemorySink::new();
    let reported = Arc::new(AtomicUsize::new(0));
    let count = Arc::clone(&reported);
    let logger = Logger::builder()
        .sink(sink.clone())
        .on_error(Arc::new(move |err: &LoggerError| {
            assert!(err.to_string().contains("wrong arity"));
            count.fetch_add(1, Ordering::SeqCst);
        }))
        .build()
        .unwrap();

    logger.info("dropped", &[context! { "bad" => Lazy::from_provider(TakesArgument) }]);
    logger.info("kept", &[]);

    assert_eq!(reported.load(Ordering::SeqCst), 1);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["message"], "kept");
}

#[test]
fn test_typed_values_unquoted() {
    let (sink, logger) = capture(Level::INFO);
    logger.info(
        "types",
        &[context! {
            "int" => 987654321,
            "float" => 2.5,
            "bool" => true,
            "nested" => json!({"k": [1, 2]}),
        }],
    );

    let line = sink.lines().remove(0);
    assert!(line.contains("\"int\":987654321"), "{}", line);
    assert!(line.contains("\"float\":2.5"), "{}", line);
    assert!(line.contains("\"bool\":true"), "{}", line);
    assert!(line.contains("\"nested\":{\"k\":[1,2]}"), "{}", line);
}

#[test]
fn test_one_line_per_record() {
    let (sink, logger) = capture(Level::INFO);
    logger.info("line one\nstill line one", &[]);
    logger.info("line two", &[]);

    let contents = sink.contents();
    assert_eq!(contents.matches('\n').count(), 2);
    assert!(contents.ends_with('\n'));
    assert_eq!(sink.records()[0]["message"], "line one\nstill line one");
}

#[test]
fn test_identical_records_are_byte_identical() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .sink(sink.clone())
        .time_format(TimestampFormat::Custom("fixed".to_string()))
        .disable_caller()
        .build()
        .unwrap();

    for _ in 0..2 {
        logger.info("same", &[context! { "z" => 1, "a" => 2, "m" => 3 }]);
    }

    let lines = sink.lines();
    assert_eq!(lines[0], lines[1]);
    assert_eq!(
        lines[0],
        r#"{"a":2,"lvl":"info","m":3,"message":"same","ts":"fixed","z":1}"#
    );
}

#[test]
fn test_caller_reports_call_site() {
    let (sink, logger) = capture(Level::INFO);

    let line = line!() + 1;
    logger.info("where am I", &[]);

    let record = &sink.records()[0];
    assert_eq!(record["caller"], format!("integration_tests.rs:{}", line));
}

#[test]
fn test_caller_structured_format() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .sink(sink.clone())
        .caller_format(CallerFormat::Structured)
        .build()
        .unwrap();

    logger.error("structured", &[]);

    let caller = &sink.records()[0]["caller"];
    let function = caller["function"].as_str().expect("function name");
    assert!(function.ends_with("test_caller_structured_format"), "{}", function);
    assert!(caller["file"].as_str().unwrap().ends_with("tests/integration_tests.rs"));
    assert!(caller["line"].is_u64());
}

#[inline(never)]
fn log_through_helper(logger: &Logger, message: &str) {
    logger.info(message, &[]);
    // Keeps this frame live across the call
    std::hint::black_box(message);
}

#[test]
fn test_caller_skip_reports_helper_caller() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .sink(sink.clone())
        .caller_skip(MIN_CALLER_SKIP + 1)
        .caller_format(CallerFormat::Function)
        .build()
        .unwrap();

    log_through_helper(&logger, "via helper");

    assert_eq!(
        sink.records()[0]["caller"],
        "test_caller_skip_reports_helper_caller"
    );
}

#[test]
fn test_caller_for_each_entry_point() {
    let (sink, logger) = capture(Level::DEBUG);

    let first = line!() + 1;
    logger.debug("d", &[]);
    logger.info("i", &[]);
    logger.error("e", &[]);
    logger.log(Level::INFO, "l", &[]);

    let callers: Vec<Value> = sink.records().iter().map(|r| r["caller"].clone()).collect();
    let expected: Vec<Value> = (first..first + 4)
        .map(|line| json!(format!("integration_tests.rs:{}", line)))
        .collect();
    assert_eq!(callers, expected);
}

#[test]
fn test_macro_reports_call_site() {
    let (sink, logger) = capture(Level::INFO);

    let line = line!() + 1;
    info!(logger, "from a macro: {}", 1);

    assert_eq!(
        sink.records()[0]["caller"],
        format!("integration_tests.rs:{}", line)
    );
}

#[test]
fn test_file_sink_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.jsonl");

    let logger = Logger::builder()
        .sink(FileSink::new(&log_file).expect("Failed to open log file"))
        .level(Level::DEBUG)
        .build()
        .unwrap();

    for i in 0..5 {
        logger.debug(format!("Iteration {}", i), &[context! { "iteration" => i }]);
    }

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);

    for (i, line) in lines.iter().enumerate() {
        let parsed: Value = serde_json::from_str(line).expect("each line is a JSON object");
        assert_eq!(parsed["iteration"], i);
        assert_eq!(parsed["lvl"], "debug");
        assert!(parsed["ts"].is_string());
    }
}

#[test]
fn test_default_logger_free_functions() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level(Level::DEBUG)
        .sink(sink.clone())
        .build()
        .unwrap();
    assert!(set_default_logger(logger).is_ok());
    assert_eq!(default_logger().level(), Level::DEBUG);

    let line = line!() + 1;
    rust_json_logger::debug("via default", &[context! { "k" => "v" }]);
    rust_json_logger::error("second", &[]);

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["message"], "via default");
    assert_eq!(records[0]["lvl"], "debug");
    assert_eq!(records[0]["k"], "v");
    assert_eq!(records[0]["caller"], format!("integration_tests.rs:{}", line));
    assert_eq!(records[1]["lvl"], "error");

    assert!(set_default_logger(Logger::default()).is_err());
}
