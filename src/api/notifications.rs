//! Notifications service

use serde_json::json;

use super::client::{segment, ApiClient, Service};
use super::error::ApiResult;
use crate::models::{Notification, NotificationDraft, NotificationStatus};

#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Notification>> {
        self.client.get(Service::Notifications, "/notifications").await
    }

    /// `GET /notifications/notifications/{userId}`
    pub async fn for_user(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        self.client
            .get(
                Service::Notifications,
                &format!("/notifications/notifications/{}", segment(user_id)),
            )
            .await
    }

    /// `GET /notifications/search?status=…`
    pub async fn search_by_status(
        &self,
        status: NotificationStatus,
    ) -> ApiResult<Vec<Notification>> {
        self.client
            .get_with_query(
                Service::Notifications,
                "/notifications/search",
                &[("status", status.as_str())],
            )
            .await
    }

    pub async fn create(&self, draft: &NotificationDraft) -> ApiResult<Notification> {
        self.client
            .post(Service::Notifications, "/notifications", draft)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(
                Service::Notifications,
                &format!("/notifications/{}", segment(id)),
            )
            .await
    }

    pub async fn mark_as_read(&self, id: &str) -> ApiResult<Notification> {
        self.action(id, "mark-as-read").await
    }

    pub async fn archive(&self, id: &str) -> ApiResult<Notification> {
        self.action(id, "archive").await
    }

    pub async fn unarchive(&self, id: &str) -> ApiResult<Notification> {
        self.action(id, "unarchive").await
    }

    async fn action(&self, id: &str, action: &str) -> ApiResult<Notification> {
        self.client
            .post(
                Service::Notifications,
                &format!("/notifications/{}/{action}", segment(id)),
                &json!({}),
            )
            .await
    }
}
