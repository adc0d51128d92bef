//! 자격증명 저장소 및 도메인 저장소.
//!
//! 핸들러는 [`Storage`] trait만 사용합니다. 구현은 두 가지입니다:
//! - [`PgStorage`]: PostgreSQL (운영)
//! - [`MemStorage`]: 인메모리 (테스트/로컬 개발)
//!
//! PostgreSQL 쿼리는 엔티티별 저장소에 static methods 패턴으로 둡니다.

mod clients;
mod contacts;
mod documents;
mod error;
mod memory;
mod messages;
mod postgres;
mod projects;
mod users;

pub use clients::ClientRepository;
pub use contacts::ContactRepository;
pub use documents::DocumentRepository;
pub use error::{StoreError, StoreResult};
pub use memory::MemStorage;
pub use messages::MessageRepository;
pub use postgres::PgStorage;
pub use projects::ProjectRepository;
pub use users::UserRepository;

use async_trait::async_trait;
use portfolio_core::{
    Client, Contact, Document, Message, NewClient, NewContact, NewDocument, NewMessage,
    NewProject, NewUser, Project, ProjectStatus, User,
};

/// 저장소 인터페이스.
///
/// 목록 조회는 모두 최신순(생성 시각 내림차순)입니다.
/// 단일 필드 변경 연산은 대상이 없으면 `Ok(None)`을 반환합니다.
#[async_trait]
pub trait Storage: Send + Sync {
    // ==================== Users ====================

    async fn get_user(&self, id: i32) -> StoreResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// 사용자를 생성합니다. 이름이 중복이면 `DuplicateUsername`.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    // ==================== Clients ====================

    async fn create_client(&self, client: NewClient) -> StoreResult<Client>;

    async fn get_client(&self, id: i32) -> StoreResult<Option<Client>>;

    /// 주어진 사용자에게 연결된 고객 조회.
    async fn get_client_by_user(&self, user_id: i32) -> StoreResult<Option<Client>>;

    async fn list_clients(&self) -> StoreResult<Vec<Client>>;

    /// 고객용 로그인 계정을 만들고 고객에 연결합니다 (원자적).
    ///
    /// 고객이 없거나 이미 연결되어 있으면 사용자도 남기지 않고 `Ok(None)`.
    /// 이름이 중복이면 `DuplicateUsername`.
    async fn create_linked_client_user(
        &self,
        client_id: i32,
        user: NewUser,
    ) -> StoreResult<Option<(User, Client)>>;

    /// 고객과 첫 프로젝트를 하나의 원자적 단위로 생성합니다.
    async fn create_client_with_project(
        &self,
        client: NewClient,
        project: NewProject,
    ) -> StoreResult<(Client, Project)>;

    // ==================== Projects ====================

    async fn create_project(&self, client_id: i32, project: NewProject) -> StoreResult<Project>;

    async fn get_project(&self, id: i32) -> StoreResult<Option<Project>>;

    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    async fn list_projects_by_client(&self, client_id: i32) -> StoreResult<Vec<Project>>;

    async fn update_project_status(
        &self,
        id: i32,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>>;

    // ==================== Documents ====================

    async fn create_document(&self, document: NewDocument) -> StoreResult<Document>;

    async fn get_document(&self, id: i32) -> StoreResult<Option<Document>>;

    async fn list_documents_by_project(&self, project_id: i32) -> StoreResult<Vec<Document>>;

    // ==================== Messages ====================

    async fn create_message(&self, message: NewMessage) -> StoreResult<Message>;

    async fn get_message(&self, id: i32) -> StoreResult<Option<Message>>;

    async fn list_messages_by_project(&self, project_id: i32) -> StoreResult<Vec<Message>>;

    /// 읽음 표시. 이미 읽은 메시지는 그대로 반환합니다.
    async fn mark_message_read(&self, id: i32) -> StoreResult<Option<Message>>;

    // ==================== Contacts ====================

    async fn create_contact(&self, contact: NewContact) -> StoreResult<Contact>;

    async fn list_contacts(&self) -> StoreResult<Vec<Contact>>;

    // ==================== Health ====================

    /// 저장소 연결 확인.
    async fn ping(&self) -> bool;

    /// 구현 이름 ("postgres" | "memory").
    fn backend(&self) -> &'static str;
}
