pub mod simulation;

pub use simulation::{
    run_simulation, terminal_values, SimulationConfig, SimulationEngine, SimulationResult,
};
