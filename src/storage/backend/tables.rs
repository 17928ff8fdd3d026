//! 每种记录类型到表的映射
//!
//! 普通记录由 `stored_record!` 生成；关联表和预备联系人手写。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use super::converters::*;
use crate::domain::{
    Address, Circulation, Contact, Contractor, Deal, Document, EmailContact, EntityKind,
    MarketingCampaign, Meeting, Note, PhoneCall, PreliminaryContact, Project, Record, Task,
};
use crate::errors::{CrmError, Result};
use crate::storage::{FilterKind, FilterSpec, ListQuery};
use migration::entities::{
    address, circulation, contact, contact_address, contact_email, contractor,
    contractor_address, contractor_email, deal, document, email_contact, marketing_campaign,
    meeting, note, phone_call, preliminary_contact, project, task,
};

/// 主表之外的多对多集合
#[async_trait]
pub trait Linked: Sized + Send + Sync {
    /// 在同一事务中用当前集合整体替换关联行
    async fn save_links(&self, _txn: &DatabaseTransaction, _id: i64) -> std::result::Result<(), DbErr> {
        Ok(())
    }

    async fn load_links(
        _db: &DatabaseConnection,
        _records: &mut [Self],
    ) -> std::result::Result<(), DbErr> {
        Ok(())
    }
}

/// 记录在关系库中的读写方式
#[async_trait]
pub trait StoredRecord: Record + Linked {
    const SEARCH_FIELDS: &'static [&'static str];
    const FILTERS: &'static [FilterSpec];

    /// 把搜索词和过滤器翻译为查询条件，未知过滤器返回 InvalidQuery
    fn condition(query: &ListQuery) -> Result<Condition>;

    async fn fetch(db: &DatabaseConnection, id: i64) -> std::result::Result<Option<Self>, DbErr>;

    async fn count(db: &DatabaseConnection, condition: Condition) -> std::result::Result<u64, DbErr>;

    /// 按 id 倒序分页，page 从 1 开始
    async fn fetch_page(
        db: &DatabaseConnection,
        condition: Condition,
        page: u64,
        page_size: u64,
    ) -> std::result::Result<Vec<Self>, DbErr>;

    async fn insert_row(&self, txn: &DatabaseTransaction) -> std::result::Result<i64, DbErr>;

    async fn update_row(&self, txn: &DatabaseTransaction) -> std::result::Result<(), DbErr>;

    async fn delete_row(db: &DatabaseConnection, id: i64) -> std::result::Result<u64, DbErr>;
}

fn unknown_filter(kind: EntityKind, name: &str, allowed: &[FilterSpec]) -> CrmError {
    let names: Vec<&str> = allowed.iter().map(|f| f.name).collect();
    CrmError::invalid_query(format!(
        "unknown filter '{}' for {}; supported: {}",
        name,
        kind,
        names.join(", ")
    ))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn filter_condition<C: ColumnTrait>(
    column: C,
    kind: FilterKind,
    name: &str,
    value: &str,
) -> Result<Condition> {
    let value = value.trim();
    let expr = match kind {
        FilterKind::Exact => column.eq(value),
        FilterKind::Id => match value {
            "none" | "null" => column.is_null(),
            other => column.eq(other.parse::<i64>().map_err(|_| {
                CrmError::invalid_query(format!(
                    "filter '{}' expects an id or 'none', got '{}'",
                    name, other
                ))
            })?),
        },
        FilterKind::Flag => column.eq(parse_flag(value).ok_or_else(|| {
            CrmError::invalid_query(format!(
                "filter '{}' expects true or false, got '{}'",
                name, value
            ))
        })?),
    };
    Ok(Condition::all().add(expr))
}

fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn group_pairs(pairs: impl IntoIterator<Item = (i64, i64)>) -> HashMap<i64, Vec<i64>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for (owner, target) in pairs {
        grouped.entry(owner).or_default().push(target);
    }
    grouped
}

macro_rules! stored_record {
    (
        $record:ty => $entity:ident {
            to_active: $to_active:path,
            from_model: $from_model:path,
            search: { $($sname:literal => $scol:ident),* $(,)? },
            filters: { $($fname:literal => $fcol:ident : $fkind:ident),* $(,)? } $(,)?
        }
    ) => {
        #[async_trait]
        impl StoredRecord for $record {
            const SEARCH_FIELDS: &'static [&'static str] = &[$($sname),*];
            const FILTERS: &'static [FilterSpec] = &[
                $(FilterSpec { name: $fname, kind: FilterKind::$fkind }),*
            ];

            fn condition(query: &ListQuery) -> Result<Condition> {
                let mut condition = Condition::all();
                if let Some(term) = query.search_term() {
                    condition = condition.add(
                        Condition::any()$(.add($entity::Column::$scol.contains(term)))*,
                    );
                }
                for (name, value) in &query.filters {
                    let filter = match name.as_str() {
                        $($fname => filter_condition(
                            $entity::Column::$fcol,
                            FilterKind::$fkind,
                            name,
                            value,
                        )?,)*
                        _ => {
                            return Err(unknown_filter(
                                <$record as Record>::KIND,
                                name,
                                Self::FILTERS,
                            ));
                        }
                    };
                    condition = condition.add(filter);
                }
                Ok(condition)
            }

            async fn fetch(
                db: &DatabaseConnection,
                id: i64,
            ) -> std::result::Result<Option<Self>, DbErr> {
                let Some(model) = $entity::Entity::find_by_id(id).one(db).await? else {
                    return Ok(None);
                };
                let mut records = vec![$from_model(model)];
                Self::load_links(db, &mut records).await?;
                Ok(records.pop())
            }

            async fn count(
                db: &DatabaseConnection,
                condition: Condition,
            ) -> std::result::Result<u64, DbErr> {
                $entity::Entity::find().filter(condition).count(db).await
            }

            async fn fetch_page(
                db: &DatabaseConnection,
                condition: Condition,
                page: u64,
                page_size: u64,
            ) -> std::result::Result<Vec<Self>, DbErr> {
                let models = $entity::Entity::find()
                    .filter(condition)
                    .order_by_desc($entity::Column::Id)
                    .paginate(db, page_size)
                    .fetch_page(page.saturating_sub(1))
                    .await?;
                let mut records: Vec<Self> = models.into_iter().map($from_model).collect();
                Self::load_links(db, &mut records).await?;
                Ok(records)
            }

            async fn insert_row(
                &self,
                txn: &DatabaseTransaction,
            ) -> std::result::Result<i64, DbErr> {
                let model = $to_active(self, true).insert(txn).await?;
                Ok(model.id)
            }

            async fn update_row(
                &self,
                txn: &DatabaseTransaction,
            ) -> std::result::Result<(), DbErr> {
                $to_active(self, false).update(txn).await?;
                Ok(())
            }

            async fn delete_row(
                db: &DatabaseConnection,
                id: i64,
            ) -> std::result::Result<u64, DbErr> {
                let result = $entity::Entity::delete_by_id(id).exec(db).await?;
                Ok(result.rows_affected)
            }
        }
    };
}

/// 带地址、邮箱集合的记录（Contractor / Contact）
macro_rules! linked_destinations {
    (
        $record:ty,
        addresses: $addr:ident ($addr_owner:ident . $addr_owner_field:ident, $addr_target:ident . $addr_target_field:ident),
        emails: $mail:ident ($mail_owner:ident . $mail_owner_field:ident, $mail_target:ident . $mail_target_field:ident) $(,)?
    ) => {
        #[async_trait]
        impl Linked for $record {
            async fn save_links(
                &self,
                txn: &DatabaseTransaction,
                id: i64,
            ) -> std::result::Result<(), DbErr> {
                $addr::Entity::delete_many()
                    .filter($addr::Column::$addr_owner.eq(id))
                    .exec(txn)
                    .await?;
                for target in unique_ids(&self.geo.addresses) {
                    $addr::Entity::insert($addr::ActiveModel {
                        $addr_owner_field: Set(id),
                        $addr_target_field: Set(target),
                    })
                    .exec_without_returning(txn)
                    .await?;
                }

                $mail::Entity::delete_many()
                    .filter($mail::Column::$mail_owner.eq(id))
                    .exec(txn)
                    .await?;
                for target in unique_ids(&self.email.emails) {
                    $mail::Entity::insert($mail::ActiveModel {
                        $mail_owner_field: Set(id),
                        $mail_target_field: Set(target),
                    })
                    .exec_without_returning(txn)
                    .await?;
                }
                Ok(())
            }

            async fn load_links(
                db: &DatabaseConnection,
                records: &mut [Self],
            ) -> std::result::Result<(), DbErr> {
                let ids: Vec<i64> = records.iter().filter_map(|r| r.id).collect();
                if ids.is_empty() {
                    return Ok(());
                }

                let mut addresses = group_pairs(
                    $addr::Entity::find()
                        .filter($addr::Column::$addr_owner.is_in(ids.clone()))
                        .order_by_asc($addr::Column::$addr_target)
                        .all(db)
                        .await?
                        .into_iter()
                        .map(|row| (row.$addr_owner_field, row.$addr_target_field)),
                );
                let mut emails = group_pairs(
                    $mail::Entity::find()
                        .filter($mail::Column::$mail_owner.is_in(ids))
                        .order_by_asc($mail::Column::$mail_target)
                        .all(db)
                        .await?
                        .into_iter()
                        .map(|row| (row.$mail_owner_field, row.$mail_target_field)),
                );

                for record in records.iter_mut() {
                    if let Some(id) = record.id {
                        record.geo.addresses = addresses.remove(&id).unwrap_or_default();
                        record.email.emails = emails.remove(&id).unwrap_or_default();
                    }
                }
                Ok(())
            }
        }
    };
}

linked_destinations!(
    Contractor,
    addresses: contractor_address(ContractorId.contractor_id, AddressId.address_id),
    emails: contractor_email(ContractorId.contractor_id, EmailId.email_id),
);

linked_destinations!(
    Contact,
    addresses: contact_address(ContactId.contact_id, AddressId.address_id),
    emails: contact_email(ContactId.contact_id, EmailId.email_id),
);

impl Linked for Address {}
impl Linked for EmailContact {}
impl Linked for MarketingCampaign {}
impl Linked for Deal {}
impl Linked for Circulation {}
impl Linked for Project {}
impl Linked for PhoneCall {}
impl Linked for Meeting {}
impl Linked for Task {}
impl Linked for Note {}
impl Linked for Document {}

stored_record! {
    Address => address {
        to_active: address_to_active_model,
        from_model: model_to_address,
        search: { "street" => Street, "city" => City, "zipcode" => Zipcode },
        filters: { "country" => Country: Exact, "region" => Region: Exact, "city" => City: Exact },
    }
}

stored_record! {
    EmailContact => email_contact {
        to_active: email_contact_to_active_model,
        from_model: model_to_email_contact,
        search: { "email" => Email },
        filters: { "do_not_contact" => DoNotContact: Flag, "invalid" => Invalid: Flag },
    }
}

stored_record! {
    Contractor => contractor {
        to_active: contractor_to_active_model,
        from_model: model_to_contractor,
        search: { "name" => Name, "phone" => Phone, "website" => Website },
        filters: {
            "industry" => Industry: Exact,
            "kind" => Kind: Exact,
            "rating" => Rating: Exact,
            "source" => Source: Exact,
            "parent" => ParentId: Id,
            "campaign" => CampaignId: Id,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Contact => contact {
        to_active: contact_to_active_model,
        from_model: model_to_contact,
        search: {
            "first_name" => FirstName,
            "last_name" => LastName,
            "phone_work" => PhoneWork,
            "phone_mobile" => PhoneMobile,
        },
        filters: {
            "salutation" => Salutation: Exact,
            "source" => Source: Exact,
            "contractor" => ContractorId: Id,
            "head" => HeadId: Id,
            "campaign" => CampaignId: Id,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    MarketingCampaign => marketing_campaign {
        to_active: marketing_campaign_to_active_model,
        from_model: model_to_marketing_campaign,
        search: { "name" => Name, "desc" => Description },
        filters: {
            "status" => Status: Exact,
            "kind" => Kind: Exact,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Deal => deal {
        to_active: deal_to_active_model,
        from_model: model_to_deal,
        search: { "name" => Name, "next_step" => NextStep },
        filters: {
            "stage" => Stage: Exact,
            "source" => Source: Exact,
            "contractor" => ContractorId: Id,
            "campaign" => CampaignId: Id,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Circulation => circulation {
        to_active: circulation_to_active_model,
        from_model: model_to_circulation,
        search: { "name" => Name, "desc" => Description },
        filters: {
            "priority" => Priority: Exact,
            "status" => Status: Exact,
            "kind" => Kind: Exact,
            "contractor" => ContractorId: Id,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Project => project {
        to_active: project_to_active_model,
        from_model: model_to_project,
        search: { "name" => Name, "desc" => Description },
        filters: {
            "status" => Status: Exact,
            "priority" => Priority: Exact,
            "contractor" => ContractorId: Id,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    PhoneCall => phone_call {
        to_active: phone_call_to_active_model,
        from_model: model_to_phone_call,
        search: { "name" => Name, "desc" => Description },
        filters: {
            "direction" => Direction: Exact,
            "status" => Status: Exact,
            "related_kind" => RelatedKind: Exact,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Meeting => meeting {
        to_active: meeting_to_active_model,
        from_model: model_to_meeting,
        search: { "name" => Name, "location" => Location },
        filters: {
            "status" => Status: Exact,
            "related_kind" => RelatedKind: Exact,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Task => task {
        to_active: task_to_active_model,
        from_model: model_to_task,
        search: { "name" => Name, "desc" => Description },
        filters: {
            "status" => Status: Exact,
            "priority" => Priority: Exact,
            "related_kind" => RelatedKind: Exact,
            "responsible" => ResponsibleId: Id,
        },
    }
}

stored_record! {
    Note => note {
        to_active: note_to_active_model,
        from_model: model_to_note,
        search: { "name" => Name, "desc" => Description },
        filters: { "related_kind" => RelatedKind: Exact },
    }
}

stored_record! {
    Document => document {
        to_active: document_to_active_model,
        from_model: model_to_document,
        search: { "name" => Name, "version" => Version },
        filters: {
            "status" => Status: Exact,
            "responsible" => ResponsibleId: Id,
        },
    }
}

// 预备联系人 = contacts 行 + preliminary_contacts 行，查询以 contacts 为主表

#[async_trait]
impl Linked for PreliminaryContact {
    async fn save_links(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<(), DbErr> {
        self.contact.save_links(txn, id).await
    }
}

#[async_trait]
impl StoredRecord for PreliminaryContact {
    const SEARCH_FIELDS: &'static [&'static str] = Contact::SEARCH_FIELDS;
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec {
            name: "status",
            kind: FilterKind::Exact,
        },
        FilterSpec {
            name: "source",
            kind: FilterKind::Exact,
        },
        FilterSpec {
            name: "contractor",
            kind: FilterKind::Id,
        },
        FilterSpec {
            name: "responsible",
            kind: FilterKind::Id,
        },
    ];

    fn condition(query: &ListQuery) -> Result<Condition> {
        if let Some(name) = query
            .filters
            .keys()
            .find(|name| !Self::FILTERS.iter().any(|f| f.name == name.as_str()))
        {
            return Err(unknown_filter(Self::KIND, name, Self::FILTERS));
        }

        let mut contact_query = query.clone();
        let status = contact_query.filters.remove("status");
        let condition = Contact::condition(&contact_query)?;

        let mut rows = Query::select();
        rows.column(preliminary_contact::Column::ContactId)
            .from(preliminary_contact::Entity);
        if let Some(status) = status {
            rows.and_where(preliminary_contact::Column::Status.eq(status.trim()));
        }
        Ok(condition.add(contact::Column::Id.in_subquery(rows.to_owned())))
    }

    async fn fetch(db: &DatabaseConnection, id: i64) -> std::result::Result<Option<Self>, DbErr> {
        let Some(row) = preliminary_contact::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        let contact = Contact::fetch(db, id).await?;
        Ok(contact.map(|contact| models_to_preliminary_contact(contact, row)))
    }

    async fn count(db: &DatabaseConnection, condition: Condition) -> std::result::Result<u64, DbErr> {
        Contact::count(db, condition).await
    }

    async fn fetch_page(
        db: &DatabaseConnection,
        condition: Condition,
        page: u64,
        page_size: u64,
    ) -> std::result::Result<Vec<Self>, DbErr> {
        let contacts = Contact::fetch_page(db, condition, page, page_size).await?;
        let ids: Vec<i64> = contacts.iter().filter_map(|c| c.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut rows: HashMap<i64, preliminary_contact::Model> = preliminary_contact::Entity::find()
            .filter(preliminary_contact::Column::ContactId.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|row| (row.contact_id, row))
            .collect();

        Ok(contacts
            .into_iter()
            .filter_map(|contact| {
                let row = rows.remove(&contact.id?)?;
                Some(models_to_preliminary_contact(contact, row))
            })
            .collect())
    }

    async fn insert_row(&self, txn: &DatabaseTransaction) -> std::result::Result<i64, DbErr> {
        let id = self.contact.insert_row(txn).await?;
        preliminary_contact::Entity::insert(preliminary_to_active_model(self, id))
            .exec_without_returning(txn)
            .await?;
        Ok(id)
    }

    async fn update_row(&self, txn: &DatabaseTransaction) -> std::result::Result<(), DbErr> {
        self.contact.update_row(txn).await?;
        let id = self.contact.id.unwrap_or_default();
        preliminary_to_active_model(self, id).update(txn).await?;
        Ok(())
    }

    async fn delete_row(db: &DatabaseConnection, id: i64) -> std::result::Result<u64, DbErr> {
        if preliminary_contact::Entity::find_by_id(id)
            .one(db)
            .await?
            .is_none()
        {
            return Ok(0);
        }
        // 预备行随联系人级联删除
        let result = contact::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
