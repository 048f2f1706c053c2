use crate::cli::ExpandArgs;
use crate::config::builder::build_config;
use crate::config::models::AppConfig;
use crate::error::Result;
use amberbridge::core::geometry::sites::format_sites;
use amberbridge::core::symmetry::expand::expand;
use tracing::info;

pub fn run(args: ExpandArgs) -> Result<()> {
    info!("Building job configuration from {:?}", &args.job.config);
    let config = build_config(&args.job, None)?;

    let text = expanded_sites_text(&config);

    match &args.output {
        Some(path) => {
            info!("Writing expanded sites to {:?}", path);
            std::fs::write(path, text)?;
            println!("Expanded sites written to: {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn expanded_sites_text(config: &AppConfig) -> String {
    let expanded = expand(&config.sites, &config.symmetry);
    info!(
        "Expanded {} asymmetric-unit site(s) to {} unit-cell site(s) under {} operation(s).",
        config.sites.len(),
        expanded.len(),
        config.symmetry.space_group().n_operations()
    );
    format_sites(&expanded)
}
