//! 领域模型：记录类型、字段混入、选项枚举和纯函数校验

pub mod activities;
mod actor;
pub mod choices;
pub mod directory;
pub mod kind;
pub mod mixins;
pub mod parties;
pub mod pipeline;
pub mod record;
pub mod validation;

pub use actor::ActingUser;
pub use activities::{DOCUMENTS_DIR, Document, Meeting, NOTES_DIR, Note, PhoneCall, Task};
pub use choices::{Choice, ChoiceSet};
pub use directory::{Address, EmailContact};
pub use kind::{EntityKind, RelatedTo};
pub use mixins::{AuditStamp, Desc, EmailDestination, GeoDestination, Named, Responsible, WithSrc};
pub use parties::{Contact, Contractor, PreliminaryContact};
pub use pipeline::{Circulation, Deal, MarketingCampaign, Project};
pub use record::{FieldKind, FieldSpec, Record};
pub use validation::{Checker, Validate, Violation, ViolationCode};
