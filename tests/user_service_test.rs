//! User service unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use stockroom::domain::{AdCost, Actor, Charge, IdentityField, Salary, User, UserRole};
use stockroom::dto::user::{CreateUserRequest, UpdateUserRequest};
use stockroom::errors::{AppError, AppResult};
use stockroom::infra::repositories::{
    DashboardRepository, FinanceRepository, MockUserRepository, OrderRepository,
    ProductRepository, ScanRepository, StockRepository,
};
use stockroom::infra::{TransactionContext, UnitOfWork, UserRepository};
use stockroom::services::{UserManager, UserService};

fn create_test_user(id: Uuid, role: UserRole) -> User {
    User {
        id,
        name: "Test User".to_string(),
        email: Some("test@example.com".to_string()),
        phone: None,
        password_hash: "hashed".to_string(),
        role,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Test UnitOfWork that only backs the user repository
struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
}

impl TestUnitOfWork {
    fn new(user_repo: MockUserRepository) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        unimplemented!("user service never touches products")
    }

    fn stock(&self) -> Arc<dyn StockRepository> {
        unimplemented!("user service never touches stock")
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        unimplemented!("user service never touches orders")
    }

    fn scans(&self) -> Arc<dyn ScanRepository> {
        unimplemented!("user service never touches scans")
    }

    fn dashboard(&self) -> Arc<dyn DashboardRepository> {
        unimplemented!("user service never touches the dashboard")
    }

    fn salaries(&self) -> Arc<dyn FinanceRepository<Salary>> {
        unimplemented!("user service never touches salaries")
    }

    fn charges(&self) -> Arc<dyn FinanceRepository<Charge>> {
        unimplemented!("user service never touches charges")
    }

    fn ad_costs(&self) -> Arc<dyn FinanceRepository<AdCost>> {
        unimplemented!("user service never touches ad costs")
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn service(repo: MockUserRepository) -> UserManager<TestUnitOfWork> {
    UserManager::new(Arc::new(TestUnitOfWork::new(repo)), IdentityField::Email)
}

fn create_request(role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        name: "  Karim  ".to_string(),
        email: Some("Karim@Example.com".to_string()),
        phone: None,
        password: "SecurePass123!".to_string(),
        role,
    }
}

fn empty_update() -> UpdateUserRequest {
    UpdateUserRequest {
        name: None,
        email: None,
        phone: None,
        password: None,
        role: None,
        is_active: None,
    }
}

#[tokio::test]
async fn test_get_user_success() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(user_id))
        .returning(|id| Ok(Some(create_test_user(id, UserRole::Confirmer))));

    let result = service(repo).get_user(user_id).await;

    assert_eq!(result.unwrap().id, user_id);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let result = service(repo).get_user(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_admin_creates_agent_with_normalized_fields() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .withf(|new_user| {
            new_user.name == "Karim"
                && new_user.email.as_deref() == Some("karim@example.com")
                && new_user.password_hash.starts_with("$argon2")
        })
        .returning(|new_user| {
            let mut user = create_test_user(Uuid::new_v4(), new_user.role);
            user.email = new_user.email;
            Ok(user)
        });

    let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
    let user = service(repo)
        .create_user(admin, create_request(UserRole::ShopAgent))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::ShopAgent);
    assert_eq!(user.email.as_deref(), Some("karim@example.com"));
}

#[tokio::test]
async fn test_admin_cannot_create_admin() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
    let result = service(repo)
        .create_user(admin, create_request(UserRole::Admin))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_create_requires_configured_identity() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let mut request = create_request(UserRole::Confirmer);
    request.email = None;
    request.phone = Some("+213555000111".to_string());

    let super_admin = Actor::new(Uuid::new_v4(), UserRole::SuperAdmin);
    let result = service(repo).create_user(super_admin, request).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_cannot_delete_self() {
    let mut repo = MockUserRepository::new();
    repo.expect_deactivate().never();

    let id = Uuid::new_v4();
    let actor = Actor::new(id, UserRole::SuperAdmin);
    let result = service(repo).delete_user(actor, id).await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_last_super_admin_is_protected() {
    let target = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::SuperAdmin))));
    repo.expect_count_by_role()
        .withf(|role| role == "SUPER_ADMIN")
        .returning(|_| Ok(1));
    repo.expect_deactivate().never();

    let actor = Actor::new(Uuid::new_v4(), UserRole::SuperAdmin);
    let result = service(repo).delete_user(actor, target).await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_super_admin_deleted_when_another_remains() {
    let target = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::SuperAdmin))));
    repo.expect_count_by_role().returning(|_| Ok(2));
    repo.expect_deactivate()
        .with(eq(target))
        .times(1)
        .returning(|_| Ok(()));

    let actor = Actor::new(Uuid::new_v4(), UserRole::SuperAdmin);
    let result = service(repo).delete_user(actor, target).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_admin_cannot_delete_peer_admin() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::Admin))));
    repo.expect_deactivate().never();

    let actor = Actor::new(Uuid::new_v4(), UserRole::Admin);
    let result = service(repo).delete_user(actor, Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_cannot_deactivate_self() {
    let id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::Admin))));
    repo.expect_update().never();

    let mut request = empty_update();
    request.is_active = Some(false);

    let actor = Actor::new(id, UserRole::Admin);
    let result = service(repo).update_user(actor, id, request).await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_update_cannot_clear_login_identity() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::Confirmer))));
    repo.expect_update().never();

    let mut request = empty_update();
    request.email = Some("   ".to_string());

    let actor = Actor::new(Uuid::new_v4(), UserRole::Admin);
    let result = service(repo)
        .update_user(actor, Uuid::new_v4(), request)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_renames_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, UserRole::WarehouseAgent))));
    repo.expect_update()
        .withf(|_, changes| changes.name.as_deref() == Some("Nadia") && changes.role.is_none())
        .returning(|id, _| {
            let mut user = create_test_user(id, UserRole::WarehouseAgent);
            user.name = "Nadia".to_string();
            Ok(user)
        });

    let mut request = empty_update();
    request.name = Some(" Nadia ".to_string());

    let actor = Actor::new(Uuid::new_v4(), UserRole::Admin);
    let user = service(repo)
        .update_user(actor, Uuid::new_v4(), request)
        .await
        .unwrap();

    assert_eq!(user.name, "Nadia");
}
