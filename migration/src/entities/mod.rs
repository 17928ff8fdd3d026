pub mod address;
pub mod circulation;
pub mod contact;
pub mod contact_address;
pub mod contact_email;
pub mod contractor;
pub mod contractor_address;
pub mod contractor_email;
pub mod deal;
pub mod document;
pub mod email_contact;
pub mod marketing_campaign;
pub mod meeting;
pub mod note;
pub mod phone_call;
pub mod preliminary_contact;
pub mod project;
pub mod task;
pub mod user;

pub use address::Entity as AddressEntity;
pub use circulation::Entity as CirculationEntity;
pub use contact::Entity as ContactEntity;
pub use contact_address::Entity as ContactAddressEntity;
pub use contact_email::Entity as ContactEmailEntity;
pub use contractor::Entity as ContractorEntity;
pub use contractor_address::Entity as ContractorAddressEntity;
pub use contractor_email::Entity as ContractorEmailEntity;
pub use deal::Entity as DealEntity;
pub use document::Entity as DocumentEntity;
pub use email_contact::Entity as EmailContactEntity;
pub use marketing_campaign::Entity as MarketingCampaignEntity;
pub use meeting::Entity as MeetingEntity;
pub use note::Entity as NoteEntity;
pub use phone_call::Entity as PhoneCallEntity;
pub use preliminary_contact::Entity as PreliminaryContactEntity;
pub use project::Entity as ProjectEntity;
pub use task::Entity as TaskEntity;
pub use user::Entity as UserEntity;
