use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::{HttpError, HttpResult};
use crate::request::{HttpClient, HttpRequest};

pub const CURRENT_USER_PATH: &str = "/apis/users/current";

// =========================================================
// 领域模型
// =========================================================

/// HadithHouse API 中的当前用户
///
/// 传输格式中 `permissions` 是列表，这里规范化为集合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default, deserialize_with = "permission_set")]
    pub permissions: HashSet<String>,
}

impl ApiUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_superuser || self.permissions.contains(permission)
    }
}

fn permission_set<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(list.unwrap_or_default().into_iter().collect())
}

// =========================================================
// API 客户端
// =========================================================

/// HadithHouse REST API 客户端
///
/// 接受任何实现了 HttpClient 的客户端；生产环境传入挂好拦截管线的客户端，
/// 令牌注入与挂起计数由管线负责。
pub struct HadithHouseApi<C> {
    client: C,
}

impl<C: HttpClient> HadithHouseApi<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, req: HttpRequest) -> HttpResult<T> {
        let resp = self.client.send(req).await?;
        if !resp.ok() {
            return Err(HttpError::Status {
                status: resp.status,
                body: resp.body,
            });
        }
        resp.json()
    }

    /// 获取当前登录的 API 用户
    pub async fn current_user(&self) -> HttpResult<ApiUser> {
        self.get_json(HttpRequest::get(CURRENT_USER_PATH)).await
    }
}
