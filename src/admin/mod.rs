//! 管理界面的声明式配置

mod model_admin;
mod site;

pub use model_admin::{Fieldset, ID_COLUMN, ModelAdmin};
pub use site::{AdminSite, IndexEntry};
