use docaudit::suggest::suggest_improvements;
use docaudit::{analyze_project, analyze_to_file, orchestrator, version};
use log::{error, info};
use std::fs;
use std::path::Path;
use std::time::Instant;

fn print_usage(program: &str) {
    eprintln!("Usage: {} <project_path> [output_path]", program);
    eprintln!("       {} suggest <doc_file>", program);
    eprintln!("Version: {}", version());
}

fn main() -> std::io::Result<()> {
    // Initialize logger
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("docaudit");

    if args.len() < 2 {
        error!("Not enough arguments provided");
        print_usage(program);
        return Ok(());
    }

    info!("docaudit v{}", version());

    if args[1] == "suggest" {
        let Some(doc_path) = args.get(2) else {
            error!("suggest needs a documentation file");
            print_usage(program);
            return Ok(());
        };
        let doc_text = fs::read_to_string(doc_path)?;
        let collaborator = orchestrator::shared_analyzer().collaborator();
        let suggestion = suggest_improvements(&doc_text, collaborator);
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
        return Ok(());
    }

    let project_path = Path::new(&args[1]);
    info!("Auditing project at: {:?}", project_path);

    let start_time = Instant::now();

    match args.get(2) {
        Some(output) => {
            let output_path = Path::new(output);
            analyze_to_file(project_path, output_path)?;
            info!("Output saved to: {:?}", output_path);
        }
        None => {
            let report = analyze_project(project_path);
            println!("{}", docaudit::utils::io::report_to_json(&report)?);
        }
    }

    info!("Audit completed in {:.2?}", start_time.elapsed());

    Ok(())
}
