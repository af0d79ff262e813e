use anyhow::{ensure, Context, Result};
use colored::*;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::output::{print_event, TestResult};
use crate::sse_client::{self, Event};

const PATCH_ELEMENTS: &str = "datastar-patch-elements";
const PATCH_SIGNALS: &str = "datastar-patch-signals";

pub struct Target {
    pub base_url: String,
    pub delay_ms: u64,
    pub timeout: Duration,
    pub verbose: bool,
}

impl Target {
    async fn events(&self, path: &str) -> Result<Vec<Event>> {
        let events = sse_client::collect(&self.base_url, path, self.delay_ms, self.timeout).await?;
        if self.verbose {
            for event in &events {
                print_event(path, event);
            }
        }
        Ok(events)
    }
}

pub async fn test_element_patches(target: &Target) -> TestResult {
    run("Stream element patches", element_patches(target)).await
}

async fn element_patches(target: &Target) -> Result<String> {
    let events = target.events("/stream-element-patches").await?;
    let (first, rest) = events.split_first().context("no events received")?;

    ensure!(first.event_type == PATCH_SIGNALS, "first event should patch signals");
    let texts = rest
        .iter()
        .map(|event| {
            ensure!(event.event_type == PATCH_ELEMENTS, "unexpected {}", event.event_type);
            let fragment = event.field("elements").context("missing elements line")?;
            fragment
                .strip_prefix(r#"<div id="message">"#)
                .and_then(|rest| rest.strip_suffix("</div>"))
                .map(String::from)
                .context("unexpected fragment")
        })
        .collect::<Result<Vec<_>>>()?;

    check_typed_out(&texts)?;
    check_pacing(rest, target.delay_ms)?;
    Ok(format!("{} element patches", texts.len()))
}

pub async fn test_signal_patches(target: &Target) -> TestResult {
    run("Stream signal patches", signal_patches(target)).await
}

async fn signal_patches(target: &Target) -> Result<String> {
    let events = target.events("/stream-signal-patches").await?;
    let (first, rest) = events.split_first().context("no events received")?;

    ensure!(first.event_type == PATCH_SIGNALS, "first event should patch signals");
    let texts = rest
        .iter()
        .map(|event| {
            ensure!(event.event_type == PATCH_SIGNALS, "unexpected {}", event.event_type);
            let json: Value = serde_json::from_str(event.field("signals").context("missing signals line")?)?;
            json["signals_message"]
                .as_str()
                .map(String::from)
                .context("missing signals_message")
        })
        .collect::<Result<Vec<_>>>()?;

    check_typed_out(&texts)?;
    check_pacing(rest, target.delay_ms)?;
    Ok(format!("{} signal patches", texts.len()))
}

pub async fn test_execute_script(target: &Target) -> TestResult {
    run("Execute script", execute_script(target)).await
}

async fn execute_script(target: &Target) -> Result<String> {
    let events = target.events("/execute-script").await?;

    ensure!(events.len() == 1, "expected exactly one event, got {}", events.len());
    let script = events[0].field("elements").context("missing elements line")?;
    ensure!(script.starts_with("<script"), "expected a script tag, got {script}");
    Ok("one script event".to_string())
}

pub async fn test_index(target: &Target) -> TestResult {
    run("Serve index.html", index(target)).await
}

async fn index(target: &Target) -> Result<String> {
    let response = reqwest::get(format!("{}/index.html", target.base_url)).await?;
    let status = response.status();
    let body = response.text().await?;

    ensure!(status.is_success(), "status {status}: {body}");
    Ok(format!("{} bytes", body.len()))
}

/// Every prefix, one character longer each time, then the full message again.
fn check_typed_out(texts: &[String]) -> Result<()> {
    let message = texts.last().context("no patches received")?;
    let length = message.chars().count();

    ensure!(
        texts.len() == length + 1,
        "expected {} patches for {message:?}, got {}",
        length + 1,
        texts.len()
    );
    for (k, text) in texts[..length].iter().enumerate() {
        let expected: String = message.chars().take(k + 1).collect();
        ensure!(text == &expected, "patch {k} was {text:?}, expected {expected:?}");
    }
    Ok(())
}

fn check_pacing(events: &[Event], delay_ms: u64) -> Result<()> {
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return Ok(());
    };
    let minimum = Duration::from_millis(delay_ms) * (events.len().saturating_sub(1) as u32);
    let elapsed = last.received_at.duration_since(first.received_at);

    // The client clock only sees arrival times; allow a little network jitter
    ensure!(
        elapsed + Duration::from_millis(delay_ms) >= minimum,
        "stream took {elapsed:?}, expected at least {minimum:?}"
    );
    Ok(())
}

async fn run(scenario: &str, check: impl Future<Output = Result<String>>) -> TestResult {
    println!("\n{} {}", "→".blue(), scenario.bold());
    let started = Instant::now();
    let outcome = check.await;

    TestResult {
        scenario: scenario.to_string(),
        passed: outcome.is_ok(),
        message: Some(match outcome {
            Ok(summary) => summary,
            Err(e) => format!("{e:#}"),
        }),
        duration: started.elapsed(),
    }
}
