use crate::config::{CheckArgs, RelayConfig, SendMode};
use crate::error::StandaloneError;

pub fn run(config: RelayConfig, args: CheckArgs) -> Result<(), StandaloneError> {
    let producer = super::start_producer(&config);

    if let Some(path) = &args.input {
        let input = super::open_input(path)?;
        let report = super::replay(&producer, input, path, SendMode::Sync, &mut std::io::sink())?;
        if report.failed > 0 {
            tracing::warn!(failed = report.failed, total = report.total, "some events were not published");
        }
    }

    let result = producer.check_topic_exist(&args.topic);
    producer.shutdown();
    result?;

    println!("topic '{}' exists", args.topic);
    Ok(())
}
