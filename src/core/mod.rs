pub mod detail_page;
pub mod filter_form;
pub mod list_page;
pub mod notice;
pub mod query;
pub mod render;
pub mod session;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Template, TrialRecord};
pub use crate::domain::ports::{ConfigProvider, TrialApi};
pub use crate::utils::error::Result;
