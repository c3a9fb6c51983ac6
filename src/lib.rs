pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::HttpTrialApi;
pub use config::ConsoleSettings;
pub use core::{
    detail_page::TrialDetailPage, filter_form::FilterForm, list_page::TrialListPage,
    session::ConsoleSession,
};
pub use core::table::{PageSize, ResultTable, SortState};
pub use utils::error::{ConsoleError, Result};
