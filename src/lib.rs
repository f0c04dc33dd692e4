pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod lookup;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Settings;
pub use error::{PipelineError, Result};
pub use filter::RestaurantFilter;
pub use lookup::{CodeTables, PricePolicy, PriceType};
pub use parser::Restaurant;
pub use pipeline::{Pipeline, PrepReport, PreparedDataset};
pub use ui::{LogUi, Phase, SilentUi, Ui};
