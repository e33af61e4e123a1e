// src/db/user_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Diretório de vendedores. A ordem crescente de id é um contrato: o
    /// rodízio de atribuição percorre a lista nessa ordem.
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY id ASC")
                .bind(role)
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    // Cria um novo usuário no banco de dados
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, role, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Atualização parcial: campos ausentes mantêm o valor atual
    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
        role: Option<Role>,
        password_hash: Option<&str>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name          = COALESCE($2, name),
                email         = COALESCE($3, email),
                role          = COALESCE($4, role),
                password_hash = COALESCE($5, password_hash),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::UserNotFound,
            e => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                AppError::DatabaseError(e)
            }
        })
    }

    // Os leads do vendedor removido ficam com vendedor_id NULL (FK SET NULL)
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}
