use crate::config::{PublishArgs, RelayConfig};
use crate::error::StandaloneError;

pub fn run(config: RelayConfig, args: PublishArgs) -> Result<(), StandaloneError> {
    let producer = super::start_producer(&config);
    let input = super::open_input(&args.input)?;

    let mut stdout = std::io::stdout().lock();
    let report = super::replay(&producer, input, &args.input, args.mode, &mut stdout)?;
    tracing::info!(
        input = %args.input,
        mode = ?args.mode,
        total = report.total,
        failed = report.failed,
        "publish finished"
    );
    super::log_summary(producer.broker());

    producer.shutdown();
    report.into_result()
}
