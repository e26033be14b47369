//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ChildId, CompanyId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{child::Child, company::Company, link::ParentChildLink};
use crate::domain::repository::ChildrenRepository;
use crate::domain::value_object::{gender::Gender, unique_code::UniqueCode};
use crate::error::{ChildrenError, ChildrenResult};

/// PostgreSQL-backed children repository
#[derive(Clone)]
pub struct PgChildrenRepository {
    pool: PgPool,
}

impl PgChildrenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ChildrenRepository for PgChildrenRepository {
    async fn create_batch(&self, children: &[Child]) -> ChildrenResult<()> {
        // One transaction: a failure on any row rolls back the whole batch
        let mut tx = self.pool.begin().await?;

        for child in children {
            let result = sqlx::query(
                r#"
                INSERT INTO children (
                    child_id, company_id, first_name, last_name,
                    dob, gender, grade, unique_code, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(child.child_id.as_uuid())
            .bind(child.company_id.as_uuid())
            .bind(&child.first_name)
            .bind(&child.last_name)
            .bind(child.dob)
            .bind(child.gender.id())
            .bind(&child.grade)
            .bind(child.unique_code.as_str())
            .bind(child.created_at)
            .bind(child.updated_at)
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                // A duplicate generated code is retryable by the caller
                return Err(match e.as_database_error() {
                    Some(db)
                        if db.is_unique_violation()
                            && db.constraint() == Some("children_unique_code_key") =>
                    {
                        ChildrenError::CodeCollision
                    }
                    _ => e.into(),
                });
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, child_id: &ChildId) -> ChildrenResult<Option<Child>> {
        let row = sqlx::query_as::<_, ChildRow>(
            r#"
            SELECT child_id, company_id, first_name, last_name,
                   dob, gender, grade, unique_code, created_at, updated_at
            FROM children
            WHERE child_id = $1
            "#,
        )
        .bind(child_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_child()).transpose()
    }

    async fn find_by_code(&self, code: &UniqueCode) -> ChildrenResult<Option<Child>> {
        let row = sqlx::query_as::<_, ChildRow>(
            r#"
            SELECT child_id, company_id, first_name, last_name,
                   dob, gender, grade, unique_code, created_at, updated_at
            FROM children
            WHERE unique_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_child()).transpose()
    }

    async fn find_by_parent(&self, parent_id: &UserId) -> ChildrenResult<Vec<Child>> {
        let rows = sqlx::query_as::<_, ChildRow>(
            r#"
            SELECT c.child_id, c.company_id, c.first_name, c.last_name,
                   c.dob, c.gender, c.grade, c.unique_code, c.created_at, c.updated_at
            FROM children c
            JOIN parent_child_links l ON l.child_id = c.child_id
            WHERE l.parent_id = $1
            ORDER BY c.last_name, c.first_name
            "#,
        )
        .bind(parent_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_child()).collect()
    }

    async fn update(&self, child: &Child) -> ChildrenResult<()> {
        sqlx::query(
            r#"
            UPDATE children SET
                first_name = $2,
                last_name = $3,
                dob = $4,
                gender = $5,
                grade = $6,
                updated_at = $7
            WHERE child_id = $1
            "#,
        )
        .bind(child.child_id.as_uuid())
        .bind(&child.first_name)
        .bind(&child.last_name)
        .bind(child.dob)
        .bind(child.gender.id())
        .bind(&child.grade)
        .bind(child.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn link(
        &self,
        parent_id: &UserId,
        child_id: &ChildId,
    ) -> ChildrenResult<ParentChildLink> {
        // Idempotent: conflicting insert is a no-op, read-back returns
        // whichever row is now there (ours or the pre-existing one)
        sqlx::query(
            r#"
            INSERT INTO parent_child_links (parent_id, child_id, linked_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (parent_id, child_id) DO NOTHING
            "#,
        )
        .bind(parent_id.as_uuid())
        .bind(child_id.as_uuid())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT parent_id, child_id, linked_at
            FROM parent_child_links
            WHERE parent_id = $1 AND child_id = $2
            "#,
        )
        .bind(parent_id.as_uuid())
        .bind(child_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_link())
    }

    async fn find_link(
        &self,
        parent_id: &UserId,
        child_id: &ChildId,
    ) -> ChildrenResult<Option<ParentChildLink>> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT parent_id, child_id, linked_at
            FROM parent_child_links
            WHERE parent_id = $1 AND child_id = $2
            "#,
        )
        .bind(parent_id.as_uuid())
        .bind(child_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_link()))
    }

    async fn find_company(&self, company_id: &CompanyId) -> ChildrenResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT company_id, name, contact_email, created_at, updated_at
            FROM companies
            WHERE company_id = $1
            "#,
        )
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_company()))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ChildRow {
    child_id: Uuid,
    company_id: Uuid,
    first_name: String,
    last_name: String,
    dob: NaiveDate,
    gender: i16,
    grade: String,
    unique_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChildRow {
    fn into_child(self) -> ChildrenResult<Child> {
        let gender = Gender::from_id(self.gender)
            .ok_or_else(|| ChildrenError::Internal(format!("Invalid gender id: {}", self.gender)))?;

        Ok(Child {
            child_id: ChildId::from_uuid(self.child_id),
            company_id: CompanyId::from_uuid(self.company_id),
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender,
            grade: self.grade,
            unique_code: UniqueCode::from_db(self.unique_code),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    parent_id: Uuid,
    child_id: Uuid,
    linked_at: DateTime<Utc>,
}

impl LinkRow {
    fn into_link(self) -> ParentChildLink {
        ParentChildLink {
            parent_id: UserId::from_uuid(self.parent_id),
            child_id: ChildId::from_uuid(self.child_id),
            linked_at: self.linked_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CompanyRow {
    company_id: Uuid,
    name: String,
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_company(self) -> Company {
        Company {
            company_id: CompanyId::from_uuid(self.company_id),
            name: self.name,
            contact_email: self.contact_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
