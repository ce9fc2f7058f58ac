use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use spin_vmc::exact::lanczos_ed;
use spin_vmc::io::{read_run_config, RunConfig};
use spin_vmc::{transverse_field_ising, RuntimeLog, SpinHilbert, Vmc};
use spin_vmc::vqs::MCState;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML run configuration, built-in defaults when absent
    #[arg(short, long)]
    config: Option<String>,
    /// Override the number of training steps
    #[arg(short, long)]
    n_steps: Option<usize>,
    /// Write the training history to this YAML file
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // read the config file, with command line argument
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => read_run_config(path)
            .with_context(|| format!("failed to read run config {}", path))?,
        None => RunConfig::default(),
    };
    if let Some(n_steps) = args.n_steps {
        config.training.n_steps = n_steps;
    }

    // Set up the graph and the Hamiltonian
    let graph = config.graph.build().context("failed to build graph")?;
    info!("graph: {} nodes, {} edges", graph.n_nodes(), graph.n_edges());
    if !graph.is_connected() {
        warn!("graph is not connected");
    }
    let hilbert = SpinHilbert::from_graph(&graph);
    let hamiltonian = transverse_field_ising(
        hilbert,
        &graph,
        config.hamiltonian.field,
        config.hamiltonian.coupling,
    )
    .context("failed to build Hamiltonian")?;

    let exact = if config.exact.applies_to(hilbert.size()) {
        let eigenvalues = lanczos_ed(&hamiltonian, &config.exact.lanczos_params())
            .context("exact diagonalization failed")?;
        let e0 = eigenvalues.first().copied();
        if let Some(e0) = e0 {
            info!("exact ground state energy: {:.8}", e0);
        }
        e0
    } else {
        info!("skipping exact diagonalization for {} sites", hilbert.size());
        None
    };

    // Create and run the VMC optimization
    let seed = config.training.seed;
    let state = MCState::new(
        config.model.build(hilbert.size()),
        config.sampler.build(hilbert, seed),
        seed,
    );
    let mut driver = Vmc::new(
        &hamiltonian,
        state,
        config.optimizer.build(),
        config.preconditioner.build(),
    );
    let mut history = RuntimeLog::new();
    driver
        .run(config.training.n_steps, config.training.logging_interval, &mut history)
        .context("training failed")?;
    let energy = driver.estimate().context("final energy estimate failed")?;

    // Print results
    println!("VMC Results for the Transverse-Field Ising Model");
    println!("------------------------------------------------");
    println!("Sites:          {}", hilbert.size());
    println!("Parameters:     {}", driver.state().n_params());
    println!("Steps:          {}", driver.step_count());
    println!("Final energy:   {}", energy);
    if let Some(e0) = exact {
        println!("Exact energy:   {:.8}", e0);
        println!("Relative error: {:.3e}", ((energy.mean - e0) / e0).abs());
    }

    if let Some(path) = &args.output {
        history
            .save(path)
            .with_context(|| format!("failed to write training history to {}", path))?;
        info!("training history written to {}", path);
    }
    Ok(())
}
