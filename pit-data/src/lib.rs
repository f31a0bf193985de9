pub mod config;
pub mod ledger_csv;
pub mod logging;
pub mod rules_loader;

pub use config::{ConfigError, EstimatorConfig};
pub use ledger_csv::{CsvLedger, EntryKind, LedgerRecord};
pub use rules_loader::{RuleSetLoader, RuleSetLoaderError, TaxBandRecord};
