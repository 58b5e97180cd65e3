use serde::{Deserialize, Serialize};

/// 新建与修改共用；缺失字段按空字符串处理，由存储层统一校验
#[derive(Debug, Deserialize, Serialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub blog_id: i64,
}
