// src/services/profile_service.rs
//
// Perfil propio: edición de campos y reemplazo de la imagen. Las imágenes
// viven en disco bajo UPLOADS_DIR y se sirven estáticas en /uploads.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::User,
        profile::{ProfileImageResponse, UpdateProfilePayload},
    },
};

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

#[derive(Clone)]
pub struct ProfileService {
    user_repo: UserRepository,
    uploads_dir: PathBuf,
}

impl ProfileService {
    pub fn new(user_repo: UserRepository, uploads_dir: PathBuf) -> Self {
        Self { user_repo, uploads_dir }
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<User, AppError> {
        let name = payload.name.as_deref().map(str::trim);
        let phone = payload.phone.as_deref().map(str::trim);
        let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());

        // El e-mail nuevo no puede pertenecer a otro usuario
        if let Some(email) = &email {
            if self.user_repo.email_taken_by_other(email, user_id).await? {
                return Err(AppError::EmailTakenByOther);
            }
        }

        self.user_repo.update_profile(user_id, name, email.as_deref(), phone).await
    }

    // Guarda la imagen nueva, borra la anterior y persiste la ruta pública.
    pub async fn save_image(
        &self,
        user: &User,
        original_filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<ProfileImageResponse, AppError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::ImageTooLarge);
        }

        let ext = image_extension(original_filename, content_type)
            .ok_or(AppError::InvalidImage)?;

        let filename = format!("profile_{}_{}.{ext}", user.id, Utc::now().timestamp_millis());
        let dir = self.uploads_dir.join("profiles");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("No se pudo crear el directorio de uploads: {}", e))?;
        tokio::fs::write(dir.join(&filename), bytes)
            .await
            .map_err(|e| anyhow::anyhow!("No se pudo guardar la imagen: {}", e))?;

        // Borra la imagen anterior; si ya no existe, no pasa nada
        if !user.profile_image.is_empty() {
            if let Some(old) = self.fs_path_for(&user.profile_image) {
                let _ = tokio::fs::remove_file(old).await;
            }
        }

        let public_path = format!("/uploads/profiles/{filename}");
        let updated = self.user_repo.update_profile_image(user.id, &public_path).await?;

        Ok(ProfileImageResponse { profile_image: public_path, user: updated })
    }

    // "/uploads/profiles/x.png" -> "{uploads_dir}/profiles/x.png"
    fn fs_path_for(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path.strip_prefix("/uploads/")?;
        Some(self.uploads_dir.join(relative))
    }
}

// Extensión permitida, validando nombre de archivo y content-type a la vez
fn image_extension(filename: &str, content_type: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    let ext_ok = ALLOWED_EXTENSIONS.contains(&ext.as_str());
    let mime_ok = ALLOWED_EXTENSIONS.iter().any(|e| content_type.ends_with(e))
        || (content_type == "image/jpeg" && (ext == "jpg" || ext == "jpeg"));
    if ext_ok && mime_ok { Some(ext) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acepta_formatos_de_imagen_conocidos() {
        assert_eq!(image_extension("foto.PNG", "image/png").as_deref(), Some("png"));
        assert_eq!(image_extension("yo.jpg", "image/jpeg").as_deref(), Some("jpg"));
        assert_eq!(image_extension("anim.webp", "image/webp").as_deref(), Some("webp"));
    }

    #[test]
    fn rechaza_extensiones_y_mimes_ajenos() {
        assert_eq!(image_extension("script.svg", "image/svg+xml"), None);
        assert_eq!(image_extension("doc.pdf", "application/pdf"), None);
        // Extensión válida con content-type que no corresponde
        assert_eq!(image_extension("foto.png", "text/html"), None);
        assert_eq!(image_extension("sin_extension", "image/png"), None);
    }
}
