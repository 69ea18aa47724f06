pub mod results_store;

pub use results_store::{InMemoryResultsStore, ResultsStore};
