//! IAM service: sign-in, sign-up, accounts and roles

use super::client::{ApiClient, Service};
use super::error::ApiResult;
use crate::models::{AuthenticatedUser, IamRole, IamUser, SignInRequest, SignUpRequest};

#[derive(Debug, Clone)]
pub struct IamApi {
    client: ApiClient,
}

impl IamApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /authentication/sign-in`
    pub async fn sign_in(&self, request: &SignInRequest) -> ApiResult<AuthenticatedUser> {
        self.client
            .post(Service::Iam, "/authentication/sign-in", request)
            .await
    }

    /// `POST /authentication/sign-up`
    pub async fn sign_up(&self, request: &SignUpRequest) -> ApiResult<IamUser> {
        self.client
            .post(Service::Iam, "/authentication/sign-up", request)
            .await
    }

    /// `GET /users`
    pub async fn users(&self) -> ApiResult<Vec<IamUser>> {
        self.client.get(Service::Iam, "/users").await
    }

    /// `GET /roles`
    pub async fn roles(&self) -> ApiResult<Vec<IamRole>> {
        self.client.get(Service::Iam, "/roles").await
    }
}
