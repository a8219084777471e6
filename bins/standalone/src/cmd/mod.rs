pub mod check;
pub mod publish;

use std::io::{BufRead, BufReader, Write};
use std::sync::{Arc, Mutex};

use relay_api::{CloudEvent, OnExceptionContext, SendCallback, SendResult};
use relay_producer::Producer;
use relay_store::Broker;

use crate::config::{RelayConfig, SendMode};
use crate::error::StandaloneError;

/// Build a broker from `config` and a started producer on it.
fn start_producer(config: &RelayConfig) -> Producer {
    let broker = Arc::new(Broker::new(config.broker.clone()));
    let producer = Producer::new(broker, config.producer.clone());
    producer.start();
    tracing::info!(group = %config.producer.group, "producer started");
    producer
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, StandaloneError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file = std::fs::File::open(path).map_err(|source| StandaloneError::Input {
        path: path.to_string(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReplayReport {
    total: usize,
    failed: usize,
}

impl ReplayReport {
    fn into_result(self) -> Result<(), StandaloneError> {
        if self.failed > 0 {
            Err(StandaloneError::Failed {
                failed: self.failed,
                total: self.total,
            })
        } else {
            Ok(())
        }
    }
}

/// Holds the single outcome of a callback-shaped publish.
#[derive(Default)]
struct Outcome(Mutex<Option<Result<SendResult, OnExceptionContext>>>);

impl Outcome {
    fn take(&self) -> Option<Result<SendResult, OnExceptionContext>> {
        match self.0.lock() {
            Ok(mut g) => g.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    fn set(&self, outcome: Result<SendResult, OnExceptionContext>) {
        match self.0.lock() {
            Ok(mut g) => *g = Some(outcome),
            Err(poisoned) => *poisoned.into_inner() = Some(outcome),
        }
    }
}

impl SendCallback for Outcome {
    fn on_success(&self, result: SendResult) {
        self.set(Ok(result));
    }

    fn on_exception(&self, context: OnExceptionContext) {
        self.set(Err(context));
    }
}

/// Publish every JSON line of `input` through `producer`.
///
/// Successful sync/async sends are written to `out` as `topic<TAB>message_id`.
/// Unparseable lines (bad UTF-8 or JSON) and failed sends are logged and
/// counted, not fatal. Only a failing read of `input` aborts the replay.
fn replay<R: BufRead, W: Write>(
    producer: &Producer,
    input: R,
    input_name: &str,
    mode: SendMode,
    out: &mut W,
) -> Result<ReplayReport, StandaloneError> {
    let mut report = ReplayReport::default();

    for (index, raw) in input.split(b'\n').enumerate() {
        let raw = raw.map_err(|source| StandaloneError::Input {
            path: input_name.to_string(),
            source,
        })?;
        let line_no = index + 1;
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping non UTF-8 line");
                report.total += 1;
                report.failed += 1;
                continue;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        report.total += 1;

        let event: CloudEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed event");
                report.failed += 1;
                continue;
            }
        };

        match mode {
            SendMode::Sync => match producer.publish(&event) {
                Ok(result) => writeln!(out, "{}\t{}", result.topic, result.message_id)?,
                Err(e) => {
                    tracing::warn!(line = line_no, event_id = %event.id, error = %e, "publish failed");
                    report.failed += 1;
                }
            },
            SendMode::Oneway => {
                if let Err(e) = producer.send_oneway(&event) {
                    tracing::warn!(line = line_no, event_id = %event.id, error = %e, "oneway send failed");
                    report.failed += 1;
                }
            }
            SendMode::Async => {
                let outcome = Outcome::default();
                if let Err(e) = producer.send_async(&event, &outcome) {
                    tracing::warn!(line = line_no, event_id = %event.id, error = %e, "async send rejected");
                    report.failed += 1;
                    continue;
                }
                match outcome.take() {
                    Some(Ok(result)) => writeln!(out, "{}\t{}", result.topic, result.message_id)?,
                    Some(Err(context)) => {
                        tracing::warn!(
                            line = line_no,
                            event_id = %context.message_id,
                            topic = %context.topic,
                            error = %context.exception,
                            "async send failed"
                        );
                        report.failed += 1;
                    }
                    None => {
                        tracing::error!(line = line_no, event_id = %event.id, "send callback never fired");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    Ok(report)
}

fn log_summary(broker: &Broker) {
    for topic in broker.topic_names() {
        if let Some(stats) = broker.topic_stats(&topic) {
            tracing::info!(
                topic = %stats.topic,
                head = stats.head_offset,
                next = stats.next_offset,
                retained = stats.retained,
                "topic summary"
            );
        }
    }
}
