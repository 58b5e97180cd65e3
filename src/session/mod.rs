//! 基于 cookie 的会话
//!
//! cookie 中保存一个 HS256 签名的 JWT，`sub` 为用户 id。签名错误、过期、
//! 用户已不存在，一律视为未登录。

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::{RepoError, UserEntity, UserRepository};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户ID
    pub exp: i64,    // 过期时间
    pub iat: i64,    // 签发时间
}

#[derive(Clone)]
pub struct SessionManager {
    users: UserRepository,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    max_age_secs: i64,
    secure: bool,
}

impl SessionManager {
    pub fn new(users: UserRepository, config: &Config) -> Self {
        Self {
            users,
            encoding_key: EncodingKey::from_secret(config.session_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            max_age_secs: i64::try_from(config.session_expiration().as_secs()).unwrap_or(i64::MAX),
            secure: !config.is_local(),
        }
    }

    /// 写入会话 cookie
    pub fn issue(&self, jar: CookieJar, user_id: i64) -> Result<CookieJar, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let token = self.sign(&Claims {
            sub: user_id.to_string(),
            exp: now.saturating_add(self.max_age_secs),
            iat: now,
        })?;

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.max_age_secs));

        tracing::debug!("Issued session for user {}", user_id);
        Ok(jar.add(cookie))
    }

    /// 解析当前会话；无 cookie 或 token 无效返回 None，只有数据库错误才返回 Err
    pub async fn resolve(&self, jar: &CookieJar) -> Result<Option<UserEntity>, RepoError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };

        let claims = match decode::<Claims>(cookie.value(), &self.decoding_key, &Validation::default()) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                return Ok(None);
            }
        };

        let Ok(user_id) = claims.sub.parse::<i64>() else {
            return Ok(None);
        };

        // 用户已被删除的旧会话按未登录处理
        self.users.find_by_id(user_id).await
    }

    /// 删除会话 cookie，可重复调用
    ///
    /// 不论请求是否带了 cookie，都下发一个过期的 `session`
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
        cookie.make_removal();
        jar.add(cookie)
    }

    fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding_key)
    }
}
