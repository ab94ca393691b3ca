// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, User, UserRole},
};

// El token expira a las 8 horas de emitido
const TOKEN_HOURS: i64 = 8;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<AuthResponse, AppError> {
        // El hashing es costoso: fuera del runtime async
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Fallo en la tarea de hashing: {}", e))??;

        let user = self
            .user_repo
            .create_user(name, email, &hashed_password, role.unwrap_or(UserRole::Vendedor))
            .await?;

        let token = create_token(&self.jwt_secret, &user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        // E-mail desconocido y contraseña incorrecta devuelven exactamente
        // el mismo error, para no revelar qué cuentas existen.
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Fallo en la tarea de verificación: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = create_token(&self.jwt_secret, &user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(&self.jwt_secret, token)?;
        self.user_repo.find_by_id(claims.sub).await?.ok_or(AppError::UserNotFound)
    }
}

pub fn create_token(jwt_secret: &str, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(TOKEN_HOURS);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(jwt_secret.as_ref()))?)
}

pub fn decode_claims(jwt_secret: &str, token: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn usuario(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@ejemplo.com".to_string(),
            password_hash: "x".to_string(),
            phone: String::new(),
            profile_image: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_va_y_vuelve_con_rol() {
        let user = usuario(UserRole::Admin);
        let token = create_token("secreto", &user).expect("token");
        let claims = decode_claims("secreto", &token).expect("claims");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Admin);
        // Expira 8 horas después de emitido
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn secreto_distinto_invalida_el_token() {
        let user = usuario(UserRole::Vendedor);
        let token = create_token("secreto", &user).expect("token");
        assert!(matches!(decode_claims("otro", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn basura_no_es_token() {
        assert!(matches!(decode_claims("secreto", "no-es-un-jwt"), Err(AppError::InvalidToken)));
    }
}
