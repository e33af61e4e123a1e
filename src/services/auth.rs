// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, CreateUserPayload, UpdateUserPayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // =========================================================================
    //  GESTÃO DE USUÁRIOS (somente admin)
    // =========================================================================

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let hashed = hash_password(payload.password).await?;
        self.user_repo
            .insert(&payload.name, &payload.email, payload.role, &hashed)
            .await
    }

    pub async fn update_user(&self, id: i32, payload: UpdateUserPayload) -> Result<User, AppError> {
        let hashed = match payload.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        self.user_repo
            .update(
                id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                payload.role,
                hashed.as_deref(),
            )
            .await
    }

    pub async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        self.user_repo.delete(id).await
    }
}

// Hashing fora do executor async (bcrypt é intencionalmente caro)
async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}
