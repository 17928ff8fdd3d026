//! 管理站点：所有记录类型的 [`ModelAdmin`] 注册表

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::model_admin::{Fieldset, ModelAdmin};
use crate::domain::{
    Address, Circulation, Contact, Contractor, Deal, Document, EmailContact, EntityKind,
    MarketingCampaign, Meeting, Note, PhoneCall, PreliminaryContact, Project, Task,
};

/// 管理首页的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub kind: EntityKind,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    models: BTreeMap<EntityKind, Arc<ModelAdmin>>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一类型重复注册时后者覆盖前者
    pub fn register(&mut self, admin: ModelAdmin) -> &mut Self {
        self.models.insert(admin.kind, Arc::new(admin));
        self
    }

    pub fn get(&self, kind: EntityKind) -> Option<Arc<ModelAdmin>> {
        self.models.get(&kind).cloned()
    }

    pub fn is_registered(&self, kind: EntityKind) -> bool {
        self.models.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// 首页可见的类型
    pub fn index(&self) -> Vec<IndexEntry> {
        self.models
            .values()
            .filter(|admin| admin.show_in_index)
            .map(|admin| IndexEntry {
                kind: admin.kind,
                verbose_name: admin.verbose_name,
                verbose_name_plural: admin.verbose_name_plural,
            })
            .collect()
    }

    /// 启动时检查全部配置，任何问题都应中止启动
    pub fn check(&self) -> Result<(), Vec<String>> {
        let problems: Vec<String> = self.models.values().flat_map(|admin| admin.check()).collect();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// 注册全部 CRM 记录类型
    pub fn crm() -> Self {
        let mut site = Self::new();
        site.register(
            ModelAdmin::new::<Address>("address", "addresses")
                .fieldsets(vec![
                    Fieldset::untitled(&["street", "city", "region", "zipcode", "country"]),
                    Fieldset::new("Location", &["latitude", "longitude", "desc"]),
                ])
                .list_display(&["id", "street", "city", "country"]),
        )
        .register(
            ModelAdmin::new::<EmailContact>("email", "emails")
                .list_display(&["id", "email", "do_not_contact", "invalid"])
                .hidden(),
        )
        .register(
            ModelAdmin::new::<Contractor>("contractor", "contractors")
                .fieldsets(vec![
                    Fieldset::untitled(&["name", "phone", "fax", "website", "desc"]),
                    Fieldset::new(
                        "Company",
                        &["industry", "kind", "rating", "annual_revenue", "employees", "parent"],
                    ),
                    Fieldset::new(
                        "Destinations",
                        &["addresses", "primary_address", "emails", "primary_email"],
                    ),
                    Fieldset::new("Marketing", &["campaign", "source", "responsible"]),
                ])
                .list_display(&["id", "name", "phone", "industry", "responsible", "updated_at"]),
        )
        .register(
            ModelAdmin::new::<Contact>("contact", "contacts")
                .fieldsets(vec![
                    Fieldset::untitled(&["salutation", "first_name", "last_name", "birthday", "desc"]),
                    Fieldset::new("Work", &["contractor", "role", "department", "head"]),
                    Fieldset::new(
                        "Phones",
                        &["phone_work", "phone_mobile", "phone_home", "fax", "skype"],
                    ),
                    Fieldset::new(
                        "Destinations",
                        &["addresses", "primary_address", "emails", "primary_email"],
                    ),
                    Fieldset::new("Marketing", &["campaign", "source", "responsible"]),
                ])
                .list_display(&["id", "last_name", "first_name", "contractor", "phone_work"]),
        )
        .register(
            ModelAdmin::new::<PreliminaryContact>("preliminary contact", "preliminary contacts")
                .fieldsets(vec![
                    Fieldset::untitled(&["salutation", "first_name", "last_name", "desc"]),
                    Fieldset::new("Lead", &["status", "estimated_amount", "source", "campaign"]),
                    Fieldset::new("Work", &["contractor", "role", "department", "head"]),
                    Fieldset::new("Phones", &["phone_work", "phone_mobile", "phone_home"]),
                    Fieldset::new(
                        "Destinations",
                        &["addresses", "primary_address", "emails", "primary_email"],
                    ),
                    Fieldset::new("Ownership", &["responsible"]),
                ])
                .list_display(&["id", "last_name", "first_name", "status", "estimated_amount"]),
        )
        .register(
            ModelAdmin::new::<MarketingCampaign>("marketing campaign", "marketing campaigns")
                .fieldsets(vec![
                    Fieldset::untitled(&["name", "status", "kind", "desc"]),
                    Fieldset::new("Schedule", &["start_date", "end_date"]),
                    Fieldset::new(
                        "Budget",
                        &["budget", "expected_cost", "actual_cost", "expected_revenue"],
                    ),
                    Fieldset::new("Ownership", &["responsible"]),
                ])
                .list_display(&["id", "name", "status", "kind", "start_date", "end_date"]),
        )
        .register(
            ModelAdmin::new::<Deal>("deal", "deals")
                .fieldsets(vec![
                    Fieldset::untitled(&["name", "contractor", "amount", "stage", "desc"]),
                    Fieldset::new("Forecast", &["probability", "closing_date", "next_step"]),
                    Fieldset::new("Marketing", &["campaign", "source", "responsible"]),
                ])
                .list_display(&["id", "name", "contractor", "amount", "stage", "closing_date"]),
        )
        .register(
            ModelAdmin::new::<Circulation>("circulation", "circulations")
                .fieldsets(vec![
                    Fieldset::untitled(&["name", "contractor", "kind", "priority", "status", "desc"]),
                    Fieldset::new("Outcome", &["resolution", "responsible"]),
                ])
                .list_display(&["id", "name", "contractor", "priority", "status"]),
        )
        .register(
            ModelAdmin::new::<PhoneCall>("phone call", "phone calls")
                .list_display(&["id", "name", "direction", "status", "start_at"]),
        )
        .register(
            ModelAdmin::new::<Meeting>("meeting", "meetings")
                .list_display(&["id", "name", "status", "location", "start_at"]),
        )
        .register(
            ModelAdmin::new::<Task>("task", "tasks")
                .list_display(&["id", "name", "status", "priority", "due_at"]),
        )
        .register(
            ModelAdmin::new::<Note>("note", "notes")
                .list_display(&["id", "name", "attach", "updated_at"]),
        )
        .register(
            ModelAdmin::new::<Document>("document", "documents")
                .fieldsets(vec![
                    Fieldset::untitled(&["name", "attach", "version", "status", "desc"]),
                    Fieldset::new("Validity", &["publish_date", "expiration_date"]),
                    Fieldset::new("Ownership", &["responsible"]),
                ])
                .list_display(&["id", "name", "version", "status", "publish_date"]),
        )
        .register(
            ModelAdmin::new::<Project>("project", "projects")
                .fieldsets(vec![
                    Fieldset::untitled(&["name", "status", "priority", "contractor", "desc"]),
                    Fieldset::new("Schedule", &["start_date", "end_date", "responsible"]),
                ])
                .list_display(&["id", "name", "status", "priority", "end_date"]),
        );
        site
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_crm_site_registers_every_kind_and_passes_check() {
        let site = AdminSite::crm();
        for kind in EntityKind::iter() {
            assert!(site.is_registered(kind), "{} not registered", kind);
        }
        assert_eq!(site.check(), Ok(()));
    }

    #[test]
    fn test_email_contacts_are_hidden_from_index() {
        let site = AdminSite::crm();
        let index = site.index();
        assert_eq!(index.len(), site.len() - 1);
        assert!(index.iter().all(|e| e.kind != EntityKind::EmailContact));
        assert!(site.get(EntityKind::EmailContact).is_some());
    }

    #[test]
    fn test_check_collects_problems_from_all_models() {
        let mut site = AdminSite::new();
        site.register(ModelAdmin::new::<Deal>("deal", "deals").list_filter(&["color"]))
            .register(ModelAdmin::new::<Task>("task", "tasks").list_display(&["owner"]));
        let problems = site.check().unwrap_err();
        assert_eq!(problems.len(), 2);
    }
}
