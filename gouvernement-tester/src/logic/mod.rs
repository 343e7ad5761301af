pub mod assets;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use assets::TesterAssets;
pub use policy::GameplayStrategy;
pub use seeds::resolve_seed_inputs;
pub use simulation::{GameTester, SimulationPlan, SimulationSummary};
pub use tester::*;
