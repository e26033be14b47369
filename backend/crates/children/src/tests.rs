//! Crate-level tests
//!
//! Use cases are exercised against an in-memory repository so the tests
//! cover batch atomicity, link idempotence and ownership checks without
//! a database.

#![cfg(test)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use auth::AuthError;
use kernel::id::{ChildId, CompanyId, UserId};

use crate::application::{
    BulkOnboardUseCase, ChildInput, ChildPatch, ChildrenQueryUseCase, LinkChildUseCase,
    UpdateChildUseCase,
};
use crate::domain::entity::{child::Child, company::Company, link::ParentChildLink};
use crate::domain::repository::ChildrenRepository;
use crate::domain::value_object::{gender::Gender, unique_code::UniqueCode};
use crate::error::{ChildrenError, ChildrenResult};

// ============================================================================
// In-Memory Repository
// ============================================================================

#[derive(Default)]
struct InMemoryChildrenStore {
    children: Mutex<HashMap<Uuid, Child>>,
    links: Mutex<HashMap<(Uuid, Uuid), ParentChildLink>>,
    companies: Mutex<HashMap<Uuid, Company>>,
    /// When set, create_batch fails after this many inserts
    fail_batch_after: Mutex<Option<usize>>,
    /// Number of create_batch calls to fail with a code collision
    code_collisions: Mutex<usize>,
}

impl InMemoryChildrenStore {
    fn child_count(&self) -> usize {
        self.children.lock().unwrap().len()
    }

    fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    fn insert_company(&self, company: Company) {
        self.companies
            .lock()
            .unwrap()
            .insert(company.company_id.into_uuid(), company);
    }
}

impl ChildrenRepository for InMemoryChildrenStore {
    async fn create_batch(&self, children: &[Child]) -> ChildrenResult<()> {
        // Mirrors transactional behavior: a mid-batch failure leaves
        // nothing behind.
        if let Some(limit) = *self.fail_batch_after.lock().unwrap() {
            if children.len() > limit {
                return Err(ChildrenError::Internal("Simulated batch failure".into()));
            }
        }
        {
            let mut forced = self.code_collisions.lock().unwrap();
            if *forced > 0 {
                *forced -= 1;
                return Err(ChildrenError::CodeCollision);
            }
        }
        let mut map = self.children.lock().unwrap();
        if children
            .iter()
            .any(|c| map.values().any(|existing| existing.unique_code == c.unique_code))
        {
            return Err(ChildrenError::CodeCollision);
        }
        for child in children {
            map.insert(child.child_id.into_uuid(), child.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, child_id: &ChildId) -> ChildrenResult<Option<Child>> {
        Ok(self
            .children
            .lock()
            .unwrap()
            .get(child_id.as_uuid())
            .cloned())
    }

    async fn find_by_code(&self, code: &UniqueCode) -> ChildrenResult<Option<Child>> {
        Ok(self
            .children
            .lock()
            .unwrap()
            .values()
            .find(|c| c.unique_code == *code)
            .cloned())
    }

    async fn find_by_parent(&self, parent_id: &UserId) -> ChildrenResult<Vec<Child>> {
        let links = self.links.lock().unwrap();
        let children = self.children.lock().unwrap();
        let mut out: Vec<Child> = links
            .values()
            .filter(|l| l.parent_id == *parent_id)
            .filter_map(|l| children.get(l.child_id.as_uuid()).cloned())
            .collect();
        out.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(out)
    }

    async fn update(&self, child: &Child) -> ChildrenResult<()> {
        self.children
            .lock()
            .unwrap()
            .insert(child.child_id.into_uuid(), child.clone());
        Ok(())
    }

    async fn link(
        &self,
        parent_id: &UserId,
        child_id: &ChildId,
    ) -> ChildrenResult<ParentChildLink> {
        let mut links = self.links.lock().unwrap();
        let key = (parent_id.into_uuid(), child_id.into_uuid());
        let link = links.entry(key).or_insert_with(|| ParentChildLink {
            parent_id: *parent_id,
            child_id: *child_id,
            linked_at: Utc::now(),
        });
        Ok(link.clone())
    }

    async fn find_link(
        &self,
        parent_id: &UserId,
        child_id: &ChildId,
    ) -> ChildrenResult<Option<ParentChildLink>> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .get(&(parent_id.into_uuid(), child_id.into_uuid()))
            .cloned())
    }

    async fn find_company(&self, company_id: &CompanyId) -> ChildrenResult<Option<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .get(company_id.as_uuid())
            .cloned())
    }
}

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    store: Arc<InMemoryChildrenStore>,
    company_id: CompanyId,
}

impl Fixture {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryChildrenStore::default()),
            company_id: CompanyId::new(),
        }
    }

    fn bulk_onboard(&self) -> BulkOnboardUseCase<InMemoryChildrenStore> {
        BulkOnboardUseCase::new(self.store.clone())
    }

    fn link_child(&self) -> LinkChildUseCase<InMemoryChildrenStore> {
        LinkChildUseCase::new(self.store.clone())
    }

    fn query(&self) -> ChildrenQueryUseCase<InMemoryChildrenStore> {
        ChildrenQueryUseCase::new(self.store.clone())
    }

    fn update_child(&self) -> UpdateChildUseCase<InMemoryChildrenStore> {
        UpdateChildUseCase::new(self.store.clone())
    }

    async fn onboard_one(&self, first: &str, last: &str) -> Child {
        let children = self
            .bulk_onboard()
            .execute(self.company_id, vec![valid_input(first, last)])
            .await
            .unwrap();
        children.into_iter().next().unwrap()
    }
}

fn valid_input(first: &str, last: &str) -> ChildInput {
    ChildInput {
        first_name: first.to_string(),
        last_name: last.to_string(),
        dob: NaiveDate::from_ymd_opt(2018, 4, 12).unwrap(),
        gender: Gender::Female,
        grade: "2".to_string(),
    }
}

// ============================================================================
// Bulk Onboard Tests
// ============================================================================

mod bulk_onboard_tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_all_records_with_unique_codes() {
        let fx = Fixture::new();
        let inputs = vec![
            valid_input("Aya", "Hassan"),
            valid_input("Omar", "Hassan"),
            valid_input("Lina", "Saleh"),
        ];

        let children = fx
            .bulk_onboard()
            .execute(fx.company_id, inputs)
            .await
            .unwrap();

        assert_eq!(children.len(), 3);
        assert_eq!(fx.store.child_count(), 3);

        let codes: std::collections::HashSet<&str> =
            children.iter().map(|c| c.unique_code.as_str()).collect();
        assert_eq!(codes.len(), 3);
        for child in &children {
            assert_eq!(child.company_id.as_uuid(), fx.company_id.as_uuid());
        }
    }

    #[tokio::test]
    async fn test_invalid_record_aborts_whole_batch() {
        let fx = Fixture::new();
        let mut bad = valid_input("Aya", "Hassan");
        bad.first_name = "   ".to_string();
        let inputs = vec![valid_input("Omar", "Hassan"), bad];

        let err = fx
            .bulk_onboard()
            .execute(fx.company_id, inputs)
            .await
            .unwrap_err();

        match err {
            ChildrenError::Validation { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "first_name");
            }
            other => panic!("Unexpected error: {other:?}"),
        }
        assert_eq!(fx.store.child_count(), 0);
    }

    #[tokio::test]
    async fn test_future_dob_rejected() {
        let fx = Fixture::new();
        let mut bad = valid_input("Aya", "Hassan");
        bad.dob = Utc::now().date_naive() + chrono::Duration::days(1);

        let err = fx
            .bulk_onboard()
            .execute(fx.company_id, vec![bad])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ChildrenError::Validation { field: "dob", .. }
        ));
        assert_eq!(fx.store.child_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let fx = Fixture::new();
        let err = fx
            .bulk_onboard()
            .execute(fx.company_id, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ChildrenError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_persistence_failure_creates_nothing() {
        let fx = Fixture::new();
        *fx.store.fail_batch_after.lock().unwrap() = Some(1);

        let inputs = vec![valid_input("Aya", "Hassan"), valid_input("Omar", "Hassan")];
        let result = fx.bulk_onboard().execute(fx.company_id, inputs).await;

        assert!(result.is_err());
        assert_eq!(fx.store.child_count(), 0);
    }

    #[tokio::test]
    async fn test_code_collision_retried_with_fresh_codes() {
        let fx = Fixture::new();
        *fx.store.code_collisions.lock().unwrap() = 2;

        let inputs = vec![valid_input("Aya", "Hassan"), valid_input("Omar", "Hassan")];
        let children = fx
            .bulk_onboard()
            .execute(fx.company_id, inputs)
            .await
            .unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(fx.store.child_count(), 2);
    }

    #[tokio::test]
    async fn test_code_collision_retries_exhausted() {
        let fx = Fixture::new();
        *fx.store.code_collisions.lock().unwrap() = 10;

        let err = fx
            .bulk_onboard()
            .execute(fx.company_id, vec![valid_input("Aya", "Hassan")])
            .await
            .unwrap_err();

        assert!(matches!(err, ChildrenError::Internal(_)));
        assert_eq!(fx.store.child_count(), 0);
    }

    #[tokio::test]
    async fn test_names_are_trimmed() {
        let fx = Fixture::new();
        let mut input = valid_input("  Aya ", " Hassan  ");
        input.grade = " KG2 ".to_string();

        let children = fx
            .bulk_onboard()
            .execute(fx.company_id, vec![input])
            .await
            .unwrap();

        assert_eq!(children[0].first_name, "Aya");
        assert_eq!(children[0].last_name, "Hassan");
        assert_eq!(children[0].grade, "KG2");
    }
}

// ============================================================================
// Link Tests
// ============================================================================

mod link_tests {
    use super::*;

    #[tokio::test]
    async fn test_link_by_code() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;
        let parent = UserId::new();

        let output = fx
            .link_child()
            .execute(parent, child.unique_code.as_str())
            .await
            .unwrap();

        assert_eq!(output.child.child_id.as_uuid(), child.child_id.as_uuid());
        assert_eq!(output.link.parent_id.as_uuid(), parent.as_uuid());
        assert_eq!(fx.store.link_count(), 1);
    }

    #[tokio::test]
    async fn test_link_is_case_insensitive() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;
        let parent = UserId::new();

        let lowered = child.unique_code.as_str().to_lowercase();
        let output = fx.link_child().execute(parent, &lowered).await.unwrap();

        assert_eq!(output.child.child_id.as_uuid(), child.child_id.as_uuid());
    }

    #[tokio::test]
    async fn test_relink_is_idempotent() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;
        let parent = UserId::new();

        let first = fx
            .link_child()
            .execute(parent, child.unique_code.as_str())
            .await
            .unwrap();
        let second = fx
            .link_child()
            .execute(parent, child.unique_code.as_str())
            .await
            .unwrap();

        assert_eq!(fx.store.link_count(), 1);
        assert_eq!(first.link.linked_at, second.link.linked_at);
    }

    #[tokio::test]
    async fn test_two_parents_can_link_same_child() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;

        fx.link_child()
            .execute(UserId::new(), child.unique_code.as_str())
            .await
            .unwrap();
        fx.link_child()
            .execute(UserId::new(), child.unique_code.as_str())
            .await
            .unwrap();

        assert_eq!(fx.store.link_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_code_not_found() {
        let fx = Fixture::new();
        let err = fx
            .link_child()
            .execute(UserId::new(), "ZZZZZZZZ")
            .await
            .unwrap_err();
        assert!(matches!(err, ChildrenError::CodeNotFound));
    }

    #[tokio::test]
    async fn test_malformed_code_reported_as_not_found() {
        let fx = Fixture::new();

        // Wrong length and bad alphabet both look like an unknown code
        let err = fx.link_child().execute(UserId::new(), "ABC").await.unwrap_err();
        assert!(matches!(err, ChildrenError::CodeNotFound));

        let err = fx
            .link_child()
            .execute(UserId::new(), "ABCDEF01")
            .await
            .unwrap_err();
        assert!(matches!(err, ChildrenError::CodeNotFound));
    }
}

// ============================================================================
// Query Tests
// ============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_children_of_parent_lists_only_linked() {
        let fx = Fixture::new();
        let linked = fx.onboard_one("Aya", "Hassan").await;
        let _unlinked = fx.onboard_one("Omar", "Saleh").await;
        let parent = UserId::new();

        fx.link_child()
            .execute(parent, linked.unique_code.as_str())
            .await
            .unwrap();

        let children = fx.query().children_of_parent(&parent).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].child_id.as_uuid(), linked.child_id.as_uuid());
    }

    #[tokio::test]
    async fn test_children_of_parent_empty_without_links() {
        let fx = Fixture::new();
        let children = fx
            .query()
            .children_of_parent(&UserId::new())
            .await
            .unwrap();
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn test_company_lookup() {
        let fx = Fixture::new();
        let now = Utc::now();
        fx.store.insert_company(Company {
            company_id: fx.company_id,
            name: "Sunrise Transport".to_string(),
            contact_email: Some("ops@sunrise.example".to_string()),
            created_at: now,
            updated_at: now,
        });

        let company = fx.query().company(&fx.company_id).await.unwrap();
        assert_eq!(company.name, "Sunrise Transport");
    }

    #[tokio::test]
    async fn test_missing_company_not_found() {
        let fx = Fixture::new();
        let err = fx.query().company(&CompanyId::new()).await.unwrap_err();
        assert!(matches!(err, ChildrenError::CompanyNotFound));
    }
}

// ============================================================================
// Update Tests
// ============================================================================

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_linked_parent_can_patch() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;
        let parent = UserId::new();
        fx.link_child()
            .execute(parent, child.unique_code.as_str())
            .await
            .unwrap();

        let patch = ChildPatch {
            grade: Some("3".to_string()),
            ..Default::default()
        };
        let updated = fx
            .update_child()
            .execute(parent, child.child_id, patch, false)
            .await
            .unwrap();

        assert_eq!(updated.grade, "3");
        assert_eq!(updated.first_name, "Aya");
        // The linking code never changes
        assert_eq!(updated.unique_code, child.unique_code);
        assert!(updated.updated_at > child.updated_at);
    }

    #[tokio::test]
    async fn test_unlinked_parent_forbidden() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;

        let err = fx
            .update_child()
            .execute(UserId::new(), child.child_id, ChildPatch::default(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, ChildrenError::Auth(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn test_platform_admin_bypasses_ownership() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;

        let patch = ChildPatch {
            first_name: Some("Aisha".to_string()),
            ..Default::default()
        };
        let updated = fx
            .update_child()
            .execute(UserId::new(), child.child_id, patch, true)
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Aisha");
    }

    #[tokio::test]
    async fn test_unknown_child_not_found() {
        let fx = Fixture::new();
        let err = fx
            .update_child()
            .execute(UserId::new(), ChildId::new(), ChildPatch::default(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ChildrenError::ChildNotFound));
    }

    #[tokio::test]
    async fn test_invalid_patch_rejected() {
        let fx = Fixture::new();
        let child = fx.onboard_one("Aya", "Hassan").await;
        let parent = UserId::new();
        fx.link_child()
            .execute(parent, child.unique_code.as_str())
            .await
            .unwrap();

        let patch = ChildPatch {
            dob: Some(Utc::now().date_naive() + chrono::Duration::days(30)),
            ..Default::default()
        };
        let err = fx
            .update_child()
            .execute(parent, child.child_id, patch, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ChildrenError::Validation { field: "dob", .. }
        ));

        // Stored record untouched
        let stored = fx
            .query()
            .children_of_parent(&parent)
            .await
            .unwrap()
            .remove(0);
        assert_eq!(stored.dob, child.dob);
    }
}

// ============================================================================
// Error Tests
// ============================================================================

mod error_tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let validation = ChildrenError::Validation {
            index: 0,
            field: "dob",
            message: "bad".to_string(),
        };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ChildrenError::CodeNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ChildrenError::ChildNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ChildrenError::CompanyNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ChildrenError::Auth(AuthError::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_message_names_record() {
        let err = ChildrenError::Validation {
            index: 2,
            field: "first_name",
            message: "First name cannot be empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("index 2"));
        assert!(msg.contains("first_name"));
    }
}
