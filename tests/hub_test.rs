//! Integration tests for the pipeline hub

mod common;

use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use anyhow::anyhow;
use common::{DataProcessor, NumberMultiplier, StringManipulator, square};
use pipehub::{Hub, Pipeline, PipelineError, Result, Stage, config::HubConfig};
use serde_json::{Value, json};

fn example_pipeline(pipeline: Pipeline<i64, i64>, value: i64) -> Result<i64> {
    pipeline
        .send(value)
        .through(vec![
            Stage::func(|x, next| next.run(x * 2)),
            Stage::func(|x, next| next.run(x + 1)),
        ])
        .then(Ok)
}

#[test]
fn test_hub_pipeline() {
    let hub = Hub::new();
    hub.register("example", example_pipeline);

    assert_eq!(hub.dispatch(5, Some("example")).unwrap(), 11);
}

#[test]
fn test_hub_defaults() {
    let hub = Hub::new();
    hub.register_default(|pipeline: Pipeline<i64, i64>, value| {
        pipeline
            .send(value)
            .through(vec![Stage::func(|x, next| next.run(x + 1))])
            .then(Ok)
    });

    assert_eq!(hub.dispatch(5, None).unwrap(), 6);
}

#[test]
fn test_hub_pipeline_with_on_failure() {
    let hub = Hub::new();
    hub.register("failing", |pipeline: Pipeline<i64, String>, value| {
        pipeline
            .send(value)
            .through(vec![Stage::func(|_x, _next| Err(anyhow!("Test exception")))])
            .on_failure(|passable, err| Ok(format!("Handled in hub: {}, {}", passable, err)))
            .then(|x| Ok(x.to_string()))
    });

    assert_eq!(
        hub.dispatch(5, Some("failing")).unwrap(),
        "Handled in hub: 5, Test exception"
    );
}

#[test]
fn test_hub_errors_pass_through_unchanged() {
    let hub: Hub<i64, i64> = Hub::new();
    hub.register("failing", |pipeline: Pipeline<i64, i64>, value| {
        pipeline
            .send(value)
            .through(Stage::func(|_x, _next| Err(anyhow!("Test exception"))))
            .then_return()
    });

    let err = hub.dispatch(5, Some("failing")).unwrap_err();
    assert_eq!(err.to_string(), "Test exception");
    assert!(err.downcast_ref::<PipelineError>().is_none());
}

#[test]
fn test_hub_with_object_pipelines() {
    let hub: Hub<Value, Value> = Hub::new();

    hub.register("string", |pipeline: Pipeline<Value, Value>, value| {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("expected a string, got {}", value))?
            .to_string();
        let words = Pipeline::new()
            .send(text)
            .via("process")
            .through(vec![
                Stage::object(StringManipulator),
                Stage::func(|text: String, _next| {
                    Ok(json!(text.split_whitespace().collect::<Vec<_>>()))
                }),
            ])
            .then(|text| Ok(json!(text)))?;
        pipeline.send(words).then_return()
    });

    hub.register("number", |pipeline: Pipeline<Value, Value>, value| {
        let number = value
            .as_i64()
            .ok_or_else(|| anyhow!("expected an integer, got {}", value))?;
        let result = Pipeline::new()
            .send(number)
            .through(vec![
                Stage::object(NumberMultiplier),
                Stage::object(DataProcessor::new(square)),
            ])
            .then_return()?;
        pipeline.send(json!(result)).then_return()
    });

    assert_eq!(
        hub.dispatch(json!("hello world"), Some("string")).unwrap(),
        json!(["HELLO", "WORLD"])
    );
    assert_eq!(hub.dispatch(json!(3), Some("number")).unwrap(), json!(36));

    let err = hub.dispatch(json!("three"), Some("number")).unwrap_err();
    assert_eq!(err.to_string(), "expected an integer, got \"three\"");
}

#[test]
fn test_hub_pipeline_not_found() {
    let hub: Hub<i64, i64> = Hub::new();
    let err = hub.dispatch(5, Some("non_existent")).unwrap_err();

    assert_eq!(err.to_string(), "Pipeline 'non_existent' not found");
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::NotFound { name }) => assert_eq!(name, "non_existent"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_reregistration_replaces_callback() {
    let hub = Hub::new();
    hub.register("example", example_pipeline);
    hub.register("example", |pipeline: Pipeline<i64, i64>, value| {
        pipeline.send(value).then(|x| Ok(x - 1))
    });

    assert_eq!(hub.len(), 1);
    assert_eq!(hub.dispatch(5, Some("example")).unwrap(), 4);
}

#[test]
fn test_each_dispatch_gets_fresh_pipeline() {
    let hub = Hub::new();
    hub.register("inspect", |pipeline: Pipeline<i64, i64>, value| {
        assert!(pipeline.traveler().is_none());
        assert!(pipeline.pipes().is_empty());
        assert!(!pipeline.has_failure_handler());
        pipeline
            .send(value)
            .through(Stage::func(|x, next| next.run(x * 3)))
            .on_failure(|x, _err| Ok(x))
            .then_return()
    });

    assert_eq!(hub.dispatch(1, Some("inspect")).unwrap(), 3);
    assert_eq!(hub.dispatch(2, Some("inspect")).unwrap(), 6);
}

#[test]
fn test_callback_may_reenter_hub() {
    let hub: Hub<i64, i64> = Hub::new();
    hub.register("example", example_pipeline);

    let inner = hub.clone();
    hub.register("nested", move |pipeline: Pipeline<i64, i64>, value| {
        let doubled = inner.dispatch(value, Some("example"))?;
        inner.register("late", example_pipeline);
        pipeline.send(doubled).then_return()
    });

    assert_eq!(hub.dispatch(5, Some("nested")).unwrap(), 11);
    assert!(hub.contains("late"));
    assert_eq!(hub.pipeline_names(), vec!["example", "late", "nested"]);
}

#[test]
fn test_concurrent_register_and_dispatch() {
    let hub: Hub<i64, i64> = Hub::new();
    hub.register("example", example_pipeline);
    let dispatched = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker in 0..4 {
            let hub = &hub;
            let dispatched = &dispatched;
            scope.spawn(move || {
                for i in 0..100 {
                    assert_eq!(hub.dispatch(i, Some("example")).unwrap(), i * 2 + 1);
                    dispatched.fetch_add(1, Ordering::SeqCst);
                }
                hub.register(format!("worker-{}", worker), example_pipeline);
            });
        }
    });

    assert_eq!(dispatched.load(Ordering::SeqCst), 400);
    assert_eq!(hub.len(), 5);
}

#[test]
fn test_hub_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"default_pipeline": "main", "pipeline": {{"method": "process"}}}}"#
    )
    .unwrap();

    let config = HubConfig::from_file(file.path()).unwrap();
    let hub = Hub::with_config(config);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    hub.register_default(move |pipeline: Pipeline<String, String>, value| {
        counter.fetch_add(1, Ordering::SeqCst);
        pipeline
            .send(value)
            .through(Stage::object(common::StringManipulator))
            .then_return()
    });

    assert!(hub.contains("main"));
    assert_eq!(hub.dispatch("hello".to_string(), None).unwrap(), "HELLO");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
