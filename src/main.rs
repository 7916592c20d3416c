use std::path::Path;
use std::process::ExitCode;

use bubble_frames::config::DEFAULT_CONFIG_FILE;
use bubble_frames::PipelineConfig;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = PipelineConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))
        .and_then(|config| bubble_frames::run(&config));

    match result {
        Ok(summary) => {
            log::info!("Wrote: {}", summary.output_path.display());
            log::info!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to build bubble data: {e:#}");
            ExitCode::FAILURE
        }
    }
}
