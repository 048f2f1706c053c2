use crate::cli::EvaluateArgs;
use crate::config::builder::build_config;
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::process::{ProcessEngine, SetupFiles};
use amberbridge::core::energy::result::EnergyResult;
use amberbridge::engine::backend::context::BackendContext;
use amberbridge::engine::backend::live::LiveProcessSession;
use amberbridge::workflows::geometry_manager::GeometryManager;
use tracing::info;

pub fn run(args: EvaluateArgs) -> Result<()> {
    info!("Building job configuration from {:?}", &args.job.config);
    let config = build_config(&args.job, Some(&args))?;

    println!("Evaluating {} site(s)...", config.sites.len());
    let result = evaluate_job(&config)?;

    print!("{}", result.show());
    if result.compute_gradients() {
        println!("    gradient RMS: {:.6}", result.gradient_rms());
    }
    if result.normalization() {
        println!("    normalized target: {:.6}", result.target());
    }
    Ok(())
}

fn setup_files(config: &AppConfig) -> Result<SetupFiles> {
    if !config.amber.use_amber {
        return Err(CliError::Config(
            "Amber restraints are disabled. Set `amber.use-amber = true` to evaluate.".to_string(),
        ));
    }
    if !config.amber.use_sander {
        return Err(CliError::Config(
            "Only the live sander process backend can be driven from the command line. Set `amber.use-sander = true`.".to_string(),
        ));
    }
    let topology = config.amber.topology_file_name.clone().ok_or_else(|| {
        CliError::Config(
            "`amber.topology-file-name` is required either in the job file or via --topology."
                .to_string(),
        )
    })?;
    Ok(SetupFiles {
        topology,
        coordinates: config.amber.coordinate_file_name.clone(),
    })
}

/// Runs one `energies_sites` evaluation of the job against a freshly launched process.
pub fn evaluate_job(config: &AppConfig) -> Result<EnergyResult> {
    let files = setup_files(config)?;
    let command = config.backend_command.as_deref().ok_or_else(|| {
        CliError::Config(
            "`backend.command` is required either in the job file or via --backend-command."
                .to_string(),
        )
    })?;

    let engine = ProcessEngine::spawn(command, &files)?;
    let context = BackendContext::select(Some(LiveProcessSession::acquire(engine)), None)?;

    let mut manager = GeometryManager::new(config.sites.clone(), context)
        .with_number_of_restraints(config.number_of_restraints)
        .with_config(config.adapter);
    let result = manager.energies_sites(&config.symmetry, config.compute_gradients)?;
    manager.release()?;

    info!(
        "Evaluation finished with total energy {:.4}.",
        result.residual_sum()
    );
    Ok(result)
}
