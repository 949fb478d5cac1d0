/// Headless dashboard run.
///
/// Loads configuration, runs the pipeline once with the `[view]` parameters
/// from the config file, and writes the resulting view to stdout as JSON.
/// Logs go to stderr.

use std::collections::HashSet;
use std::process::ExitCode;

use curve_service::config::{self, CurveConfig};
use curve_service::logging::{self, DataSource};
use curve_service::model::PipelineError;
use curve_service::pipeline;
use curve_service::view::ViewParams;

fn view_params(config: &CurveConfig) -> ViewParams {
    ViewParams {
        group_size: config
            .view
            .group_size
            .unwrap_or(config.pipeline.default_group_size),
        page_index: config.view.page_index,
        chart_type: config.view.chart_type,
        hidden_states: config.view.hidden_states.iter().cloned().collect::<HashSet<_>>(),
    }
}

fn run() -> Result<(), PipelineError> {
    let path = config::config_path();
    let config = config::load_config(&path)?;

    logging::init_logger(
        config.logging.level,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    logging::info(
        DataSource::System,
        None,
        &format!("Using configuration {}", path.display()),
    );

    let view = pipeline::render(&config, &view_params(&config))?;
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| PipelineError::ParseError(format!("view serialization: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            eprintln!("curve_service: {}", e);
            ExitCode::FAILURE
        }
    }
}
