//! PostgreSQL 저장소 구현.

use async_trait::async_trait;
use portfolio_core::{
    Client, Contact, Document, Message, NewClient, NewContact, NewDocument, NewMessage,
    NewProject, NewUser, Project, ProjectStatus, User,
};
use sqlx::PgPool;

use super::{
    ClientRepository, ContactRepository, DocumentRepository, MessageRepository,
    ProjectRepository, Storage, StoreResult, UserRepository,
};

/// sqlx 커넥션 풀 기반 저장소.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 내장 마이그레이션을 적용합니다.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        UserRepository::find_by_id(&self.pool, id).await
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        UserRepository::find_by_username(&self.pool, username).await
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        UserRepository::create(&self.pool, user).await
    }

    async fn create_client(&self, client: NewClient) -> StoreResult<Client> {
        ClientRepository::create(&self.pool, client).await
    }

    async fn get_client(&self, id: i32) -> StoreResult<Option<Client>> {
        ClientRepository::find_by_id(&self.pool, id).await
    }

    async fn get_client_by_user(&self, user_id: i32) -> StoreResult<Option<Client>> {
        ClientRepository::find_by_user(&self.pool, user_id).await
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        ClientRepository::list(&self.pool).await
    }

    async fn create_linked_client_user(
        &self,
        client_id: i32,
        user: NewUser,
    ) -> StoreResult<Option<(User, Client)>> {
        ClientRepository::create_linked_user(&self.pool, client_id, user).await
    }

    async fn create_client_with_project(
        &self,
        client: NewClient,
        project: NewProject,
    ) -> StoreResult<(Client, Project)> {
        ClientRepository::create_with_project(&self.pool, client, project).await
    }

    async fn create_project(&self, client_id: i32, project: NewProject) -> StoreResult<Project> {
        ProjectRepository::create(&self.pool, client_id, project).await
    }

    async fn get_project(&self, id: i32) -> StoreResult<Option<Project>> {
        ProjectRepository::find_by_id(&self.pool, id).await
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        ProjectRepository::list(&self.pool).await
    }

    async fn list_projects_by_client(&self, client_id: i32) -> StoreResult<Vec<Project>> {
        ProjectRepository::list_by_client(&self.pool, client_id).await
    }

    async fn update_project_status(
        &self,
        id: i32,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>> {
        ProjectRepository::update_status(&self.pool, id, status).await
    }

    async fn create_document(&self, document: NewDocument) -> StoreResult<Document> {
        DocumentRepository::create(&self.pool, document).await
    }

    async fn get_document(&self, id: i32) -> StoreResult<Option<Document>> {
        DocumentRepository::find_by_id(&self.pool, id).await
    }

    async fn list_documents_by_project(&self, project_id: i32) -> StoreResult<Vec<Document>> {
        DocumentRepository::list_by_project(&self.pool, project_id).await
    }

    async fn create_message(&self, message: NewMessage) -> StoreResult<Message> {
        MessageRepository::create(&self.pool, message).await
    }

    async fn get_message(&self, id: i32) -> StoreResult<Option<Message>> {
        MessageRepository::find_by_id(&self.pool, id).await
    }

    async fn list_messages_by_project(&self, project_id: i32) -> StoreResult<Vec<Message>> {
        MessageRepository::list_by_project(&self.pool, project_id).await
    }

    async fn mark_message_read(&self, id: i32) -> StoreResult<Option<Message>> {
        MessageRepository::mark_read(&self.pool, id).await
    }

    async fn create_contact(&self, contact: NewContact) -> StoreResult<Contact> {
        ContactRepository::create(&self.pool, contact).await
    }

    async fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        ContactRepository::list(&self.pool).await
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
