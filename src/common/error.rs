use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// El tipo de error de la aplicación, con `thiserror` para mejor ergonomía.
// Todos los mensajes visibles por el cliente van en español; nunca se
// exponen trazas internas.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("El usuario ya existe")]
    EmailAlreadyExists,

    #[error("Ese email ya está registrado por otro usuario")]
    EmailTakenByOther,

    #[error("El SKU ya existe")]
    SkuAlreadyExists,

    #[error("La categoría ya existe")]
    CategoryAlreadyExists,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acceso denegado: Se requiere rol de Admin")]
    AdminRequired,

    #[error("Producto no encontrado")]
    ProductNotFound,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("No se recibió ninguna imagen válida")]
    InvalidImage,

    #[error("La imagen supera el tamaño máximo de 5MB")]
    ImageTooLarge,

    // Fallo en la llamada a la API del modelo (transporte o respuesta).
    // El detalle queda en el log; el cliente recibe un mensaje genérico.
    #[error("Error del proveedor de IA: {0}")]
    Upstream(String),

    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Error de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devuelve todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Duplicados y credenciales responden 400, igual que el resto de
            // errores de entrada del cliente.
            AppError::EmailAlreadyExists => (StatusCode::BAD_REQUEST, "El usuario ya existe"),
            AppError::EmailTakenByOther => {
                (StatusCode::BAD_REQUEST, "Ese email ya está registrado por otro usuario")
            }
            AppError::SkuAlreadyExists => (StatusCode::BAD_REQUEST, "El SKU ya existe"),
            AppError::CategoryAlreadyExists => (StatusCode::BAD_REQUEST, "La categoría ya existe"),
            AppError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Credenciales inválidas"),
            AppError::InvalidImage => {
                (StatusCode::BAD_REQUEST, "No se recibió ninguna imagen válida")
            }
            AppError::ImageTooLarge => {
                (StatusCode::BAD_REQUEST, "La imagen supera el tamaño máximo de 5MB")
            }

            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticación inválido o ausente.")
            }
            AppError::AdminRequired => {
                (StatusCode::FORBIDDEN, "Acceso denegado: Se requiere rol de Admin")
            }

            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Producto no encontrado"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuario no encontrado"),

            AppError::Upstream(ref detail) => {
                tracing::error!("Error del proveedor de IA: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Hubo un error al procesar tu solicitud con la IA.",
                )
            }

            // Todos los demás (DatabaseError, InternalServerError, ...) son 500.
            // `tracing` registra el detalle que `thiserror` nos da.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.")
            }
        };

        // Respuesta estándar para errores simples que solo llevan un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn mapeo_de_codigos_http() {
        assert_eq!(status_of(AppError::EmailAlreadyExists), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::SkuAlreadyExists), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::CategoryAlreadyExists), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::InvalidCredentials), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::AdminRequired), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::ProductNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::Upstream("timeout".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn credenciales_invalidas_es_un_solo_mensaje() {
        // E-mail desconocido y contraseña errónea comparten esta variante,
        // así que el cliente recibe siempre el mismo texto.
        assert_eq!(AppError::InvalidCredentials.to_string(), "Credenciales inválidas");
    }
}
