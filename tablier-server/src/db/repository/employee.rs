//! Employee Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use chrono::Utc;
use shared::Money;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "employee";

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY name")
            .await?
            .take(0)?;
        Ok(employees)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Employee>> {
        let id = record_id(TABLE, id)?;
        let employee: Option<Employee> = self.base.db().select(id).await?;
        Ok(employee)
    }

    /// Look up the employee signing in with an identity-service user id
    pub async fn find_by_identity_id(&self, identity_id: &str) -> RepoResult<Option<Employee>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE identity_id = $identity LIMIT 1")
            .bind(("identity", identity_id.to_string()))
            .await?;
        let employees: Vec<Employee> = result.take(0)?;
        Ok(employees.into_iter().next())
    }

    pub async fn create(&self, data: EmployeeCreate) -> RepoResult<Employee> {
        if self.find_by_identity_id(&data.identity_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Employee with identity {} already exists",
                data.identity_id
            )));
        }

        let salary = Money::from_decimal(data.salary)
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let employee = Employee {
            id: None,
            name: data.name,
            role: data.role,
            salary,
            hired_at: Utc::now(),
            identity_id: data.identity_id,
        };

        let created: Option<Employee> = self.base.db().create(TABLE).content(employee).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
    }

    /// Update an employee — the role is immutable, only salary moves
    pub async fn update(&self, id: &str, data: EmployeeUpdate) -> RepoResult<Employee> {
        let thing = record_id(TABLE, id)?;
        let salary = Money::from_decimal(data.salary)
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET salary = $salary RETURN AFTER")
            .bind(("thing", thing))
            .bind(("salary", salary))
            .await?;
        let employees: Vec<Employee> = result.take(0)?;
        employees
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }
}
