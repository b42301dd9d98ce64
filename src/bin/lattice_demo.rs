use lattice_denoise::config::load_config;
use lattice_denoise::io::{load_points, write_json_file};
use lattice_denoise::{DenoiseReport, LatticeDenoiser};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "lattice_demo".to_string());
    let config_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;

    let config = load_config(&config_path).map_err(|e| e.to_string())?;
    let points = load_points(&config.input).map_err(|e| e.to_string())?;

    let denoiser = LatticeDenoiser::new(config.params.clone());
    let report = denoiser.process_with_diagnostics(&points);
    print_text_summary(&report);

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &report).map_err(|e| e.to_string())?;
            println!("\nJSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("\nJSON report:\n{json}");
        }
    }
    Ok(())
}

fn print_text_summary(report: &DenoiseReport) {
    let fit = &report.fit;
    println!("Lattice summary");
    println!("  points: {}", fit.coords.len());
    println!("  origin: ({:.4}, {:.4})", fit.origin().x, fit.origin().y);
    println!("  v1: ({:.4}, {:.4})", fit.v1().x, fit.v1().y);
    println!("  v2: ({:.4}, {:.4})", fit.v2().x, fit.v2().y);
    println!("  total_sq_err: {:.6e}", fit.total_sq_err);
    println!("  coord range: {}", format_range(fit.coordinate_range()));

    println!(
        "\nSeed: origin_index={} neighbor_index={}",
        report.seed.origin_index,
        report
            .seed
            .neighbor_index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    println!(
        "\nGrowth: iterations={} degenerate={} budget_exhausted={}",
        report.iterations.len(),
        report.degenerate_fallbacks(),
        report.budget_exhaustions()
    );
    for trace in &report.iterations {
        println!(
            "  it={}: reassigned={} err={:.6e} status={:?} evals={} elapsed_ms={:.3}",
            trace.active,
            trace.reassigned,
            trace.total_sq_err,
            trace.status,
            trace.evaluations,
            trace.elapsed_ms
        );
    }

    let stages: Vec<String> = report
        .timing
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "\nTimings (ms): {} total={:.3}",
        stages.join(" "),
        report.timing.total_ms
    );
}

fn format_range(range: Option<(i32, i32, i32, i32)>) -> String {
    range
        .map(|(imin, imax, jmin, jmax)| format!("i=[{imin}, {imax}] j=[{jmin}, {jmax}]"))
        .unwrap_or_else(|| "-".to_string())
}
