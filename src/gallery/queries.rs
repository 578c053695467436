//! Database queries for galleries

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{Gallery, GalleryStatus};

const GALLERY_COLUMNS: &str = r#"
    id, booking_id, title, client_email, access_code,
    preview_images, selected_images, final_images,
    status, created_at, updated_at
"#;

pub async fn insert_gallery(
    pool: &PgPool,
    booking_id: Option<Uuid>,
    title: &str,
    client_email: &str,
    access_code: &str,
    preview_images: &[String],
) -> Result<Gallery, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO galleries (id, booking_id, title, client_email, access_code, preview_images)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {GALLERY_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(title)
        .bind(client_email)
        .bind(access_code)
        .bind(preview_images)
        .fetch_one(pool)
        .await
}

pub async fn get_gallery_by_code(pool: &PgPool, code: &str) -> Result<Option<Gallery>, sqlx::Error> {
    let sql = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE access_code = $1");
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await
}

/// Lock a gallery row by access code for the rest of the transaction
pub async fn get_gallery_by_code_for_update(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
) -> Result<Option<Gallery>, sqlx::Error> {
    let sql = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE access_code = $1 FOR UPDATE");
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(code)
        .fetch_optional(&mut **tx)
        .await
}

/// Lock a gallery row by id for the rest of the transaction
pub async fn get_gallery_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Gallery>, sqlx::Error> {
    let sql = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Store the client's picks and move to editing
pub async fn save_selection(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    selected_images: &[String],
) -> Result<Gallery, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE galleries
        SET selected_images = $2, status = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {GALLERY_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(id)
        .bind(selected_images)
        .bind(GalleryStatus::Editing)
        .fetch_one(&mut **tx)
        .await
}

/// Set status, and replace final images when some are given
pub async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: GalleryStatus,
    final_images: Option<&[String]>,
) -> Result<Gallery, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE galleries
        SET status = $2,
            final_images = COALESCE($3, final_images),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {GALLERY_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Gallery>(&sql)
        .bind(id)
        .bind(status)
        .bind(final_images)
        .fetch_one(&mut **tx)
        .await
}
