//! 인메모리 저장소.
//!
//! 테스트 및 데이터베이스 없는 로컬 개발용입니다. 하나의 락이 모든 테이블을 보호하므로
//! 복합 연산도 원자적으로 처리되며, 유니크/외래 키 제약은 PostgreSQL 스키마와 동일하게 검사합니다.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use portfolio_core::{
    Client, Contact, Document, Message, NewClient, NewContact, NewDocument, NewMessage,
    NewProject, NewUser, Project, ProjectStatus, User,
};
use tokio::sync::RwLock;

use super::{Storage, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    clients: BTreeMap<i32, Client>,
    projects: BTreeMap<i32, Project>,
    documents: BTreeMap<i32, Document>,
    messages: BTreeMap<i32, Message>,
    contacts: BTreeMap<i32, Contact>,
    next_user_id: i32,
    next_client_id: i32,
    next_project_id: i32,
    next_document_id: i32,
    next_message_id: i32,
    next_contact_id: i32,
}

/// 다음 ID를 발급합니다 (1부터 단조 증가).
fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// 최신순 정렬 (ID가 단조 증가하므로 역순 순회).
fn newest_first<'a, T: Clone + 'a>(rows: impl DoubleEndedIterator<Item = &'a T>) -> Vec<T> {
    rows.rev().cloned().collect()
}

impl Tables {
    fn insert_user(&mut self, input: NewUser) -> StoreResult<User> {
        if self.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::DuplicateUsername);
        }

        let user = User {
            id: next_id(&mut self.next_user_id),
            username: input.username,
            password_hash: input.password_hash,
            role: input.role,
            is_active: input.is_active,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn build_project(&mut self, client_id: i32, input: NewProject) -> Project {
        Project {
            id: next_id(&mut self.next_project_id),
            client_id,
            project_type: input.project_type,
            description: input.description,
            features: input.features,
            budget: input.budget,
            timeline: input.timeline,
            start_date: input.start_date,
            deadline: input.deadline,
            additional_requirements: input.additional_requirements,
            status: ProjectStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn build_client(&mut self, input: NewClient) -> Client {
        Client {
            id: next_id(&mut self.next_client_id),
            user_id: None,
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            address: input.address,
            created_at: Utc::now(),
        }
    }

    fn require_project(&self, project_id: i32) -> StoreResult<()> {
        if self.projects.contains_key(&project_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference {
                entity: "project",
                id: project_id,
            })
        }
    }
}

/// 인메모리 저장소.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
    fail_next_project_insert: AtomicBool,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 다음 프로젝트 삽입을 실패시킵니다 (장애 주입).
    pub fn fail_next_project_insert(&self) {
        self.fail_next_project_insert.store(true, Ordering::SeqCst);
    }

    fn take_project_failure(&self) -> StoreResult<()> {
        if self.fail_next_project_insert.swap(false, Ordering::SeqCst) {
            Err(StoreError::Unavailable(
                "injected project insert failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// 저장된 고객 수.
    pub async fn client_count(&self) -> usize {
        self.tables.read().await.clients.len()
    }

    /// 저장된 문서 수.
    pub async fn document_count(&self) -> usize {
        self.tables.read().await.documents.len()
    }

    /// 저장된 사용자 수.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.tables.write().await.insert_user(user)
    }

    async fn create_client(&self, client: NewClient) -> StoreResult<Client> {
        let mut tables = self.tables.write().await;
        let created = tables.build_client(client);
        tables.clients.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_client(&self, id: i32) -> StoreResult<Option<Client>> {
        Ok(self.tables.read().await.clients.get(&id).cloned())
    }

    async fn get_client_by_user(&self, user_id: i32) -> StoreResult<Option<Client>> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .values()
            .find(|c| c.is_linked_to(user_id))
            .cloned())
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(newest_first(self.tables.read().await.clients.values()))
    }

    async fn create_linked_client_user(
        &self,
        client_id: i32,
        user: NewUser,
    ) -> StoreResult<Option<(User, Client)>> {
        let mut tables = self.tables.write().await;

        let tables = &mut *tables;
        let created = tables.insert_user(user)?;

        match tables.clients.get_mut(&client_id) {
            Some(client) if client.user_id.is_none() => {
                client.user_id = Some(created.id);
                Ok(Some((created, client.clone())))
            }
            _ => {
                // 트랜잭션 롤백과 같게 사용자 삽입을 되돌림
                tables.users.remove(&created.id);
                Ok(None)
            }
        }
    }

    async fn create_client_with_project(
        &self,
        client: NewClient,
        project: NewProject,
    ) -> StoreResult<(Client, Project)> {
        let mut tables = self.tables.write().await;

        let client = tables.build_client(client);
        tables.clients.insert(client.id, client.clone());

        if let Err(e) = self.take_project_failure() {
            // 트랜잭션 롤백과 같게 고객 삽입을 되돌림
            tables.clients.remove(&client.id);
            return Err(e);
        }

        let project = tables.build_project(client.id, project);
        tables.projects.insert(project.id, project.clone());

        Ok((client, project))
    }

    async fn create_project(&self, client_id: i32, project: NewProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        if !tables.clients.contains_key(&client_id) {
            return Err(StoreError::MissingReference {
                entity: "client",
                id: client_id,
            });
        }
        self.take_project_failure()?;

        let created = tables.build_project(client_id, project);
        tables.projects.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_project(&self, id: i32) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(newest_first(self.tables.read().await.projects.values()))
    }

    async fn list_projects_by_client(&self, client_id: i32) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.projects.values().filter(|p| p.client_id == client_id),
        ))
    }

    async fn update_project_status(
        &self,
        id: i32,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.get_mut(&id).map(|project| {
            project.status = status;
            project.clone()
        }))
    }

    async fn create_document(&self, document: NewDocument) -> StoreResult<Document> {
        let mut tables = self.tables.write().await;
        tables.require_project(document.project_id)?;

        let created = Document {
            id: next_id(&mut tables.next_document_id),
            project_id: document.project_id,
            file_name: document.file_name,
            file_type: document.file_type,
            file_url: document.file_url,
            uploaded_by: document.uploaded_by,
            uploader_role: document.uploader_role,
            description: document.description,
            created_at: Utc::now(),
        };
        tables.documents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_document(&self, id: i32) -> StoreResult<Option<Document>> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn list_documents_by_project(&self, project_id: i32) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .documents
                .values()
                .filter(|d| d.project_id == project_id),
        ))
    }

    async fn create_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut tables = self.tables.write().await;
        tables.require_project(message.project_id)?;

        let created = Message {
            id: next_id(&mut tables.next_message_id),
            project_id: message.project_id,
            sender_id: message.sender_id,
            sender_role: message.sender_role,
            content: message.content,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.messages.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_message(&self, id: i32) -> StoreResult<Option<Message>> {
        Ok(self.tables.read().await.messages.get(&id).cloned())
    }

    async fn list_messages_by_project(&self, project_id: i32) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .messages
                .values()
                .filter(|m| m.project_id == project_id),
        ))
    }

    async fn mark_message_read(&self, id: i32) -> StoreResult<Option<Message>> {
        let mut tables = self.tables.write().await;
        Ok(tables.messages.get_mut(&id).map(|message| {
            message.is_read = true;
            message.clone()
        }))
    }

    async fn create_contact(&self, contact: NewContact) -> StoreResult<Contact> {
        let mut tables = self.tables.write().await;
        let created = Contact {
            id: next_id(&mut tables.next_contact_id),
            name: contact.name,
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            created_at: Utc::now(),
        };
        tables.contacts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        Ok(newest_first(self.tables.read().await.contacts.values()))
    }

    async fn ping(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::Role;

    fn new_client(name: &str) -> NewClient {
        NewClient {
            full_name: name.to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-0100".to_string(),
            ..Default::default()
        }
    }

    fn new_project() -> NewProject {
        NewProject {
            project_type: "website".to_string(),
            description: "Need a 10-page site".to_string(),
            features: vec!["blog".to_string(), "contact-form".to_string()],
            budget: "1000-3000".to_string(),
            timeline: "2-4-weeks".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let storage = MemStorage::new();
        storage
            .create_user(NewUser::new("jane", "hash", Role::Client))
            .await
            .unwrap();

        let result = storage
            .create_user(NewUser::new("jane", "other", Role::Admin))
            .await;

        assert!(matches!(result, Err(StoreError::DuplicateUsername)));
        assert_eq!(storage.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_client_with_project_is_atomic() {
        let storage = MemStorage::new();
        storage.fail_next_project_insert();

        let result = storage
            .create_client_with_project(new_client("Jane"), new_project())
            .await;
        assert!(result.is_err());
        assert_eq!(storage.client_count().await, 0);

        // 장애 주입은 한 번만 적용
        let (client, project) = storage
            .create_client_with_project(new_client("Jane"), new_project())
            .await
            .unwrap();
        assert_eq!(project.client_id, client.id);
        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.features, vec!["blog", "contact-form"]);
    }

    #[tokio::test]
    async fn test_project_requires_client() {
        let storage = MemStorage::new();
        let result = storage.create_project(99, new_project()).await;

        assert!(matches!(
            result,
            Err(StoreError::MissingReference { entity: "client", id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let storage = MemStorage::new();
        let first = storage.create_client(new_client("First")).await.unwrap();
        let second = storage.create_client(new_client("Second")).await.unwrap();

        let clients = storage.list_clients().await.unwrap();
        assert_eq!(
            clients.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[tokio::test]
    async fn test_narrow_updates_on_missing_rows() {
        let storage = MemStorage::new();

        assert!(storage
            .update_project_status(404, ProjectStatus::Completed)
            .await
            .unwrap()
            .is_none());
        assert!(storage.mark_message_read(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_linked_client_user_rolls_back_when_link_fails() {
        let storage = MemStorage::new();
        let client = storage.create_client(new_client("Jane")).await.unwrap();

        let (user, linked) = storage
            .create_linked_client_user(client.id, NewUser::new("jane", "hash", Role::Client))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.user_id, Some(user.id));
        assert_eq!(storage.user_count().await, 1);

        // 이미 연결된 고객, 존재하지 않는 고객
        for client_id in [client.id, 404] {
            let outcome = storage
                .create_linked_client_user(client_id, NewUser::new("late", "hash", Role::Client))
                .await
                .unwrap();
            assert!(outcome.is_none());
        }
        assert_eq!(storage.user_count().await, 1);
        assert!(storage.get_user_by_username("late").await.unwrap().is_none());

        let duplicate = storage
            .create_linked_client_user(client.id, NewUser::new("jane", "hash", Role::Client))
            .await;
        assert!(matches!(duplicate, Err(StoreError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_message_requires_project_and_marks_read() {
        let storage = MemStorage::new();
        let missing = storage
            .create_message(NewMessage {
                project_id: 7,
                sender_id: 1,
                sender_role: Role::Admin,
                content: "hi".to_string(),
            })
            .await;
        assert!(matches!(
            missing,
            Err(StoreError::MissingReference { entity: "project", id: 7 })
        ));

        let (_, project) = storage
            .create_client_with_project(new_client("Jane"), new_project())
            .await
            .unwrap();
        let message = storage
            .create_message(NewMessage {
                project_id: project.id,
                sender_id: 1,
                sender_role: Role::Admin,
                content: "hi".to_string(),
            })
            .await
            .unwrap();
        assert!(!message.is_read);

        let read = storage.mark_message_read(message.id).await.unwrap().unwrap();
        assert!(read.is_read);
        let again = storage.mark_message_read(message.id).await.unwrap().unwrap();
        assert!(again.is_read);
    }
}
